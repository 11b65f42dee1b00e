//! In-memory storage backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory storage backend.
///
/// Clones share the same buffer, so a test can hand one clone to a
/// workout table and keep another to inspect or damage the journal bytes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend preloaded with `data`, e.g. a journal captured from
    /// an earlier run.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Returns a copy of the stored bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Overwrites the stored bytes wholesale.
    pub fn replace_bytes(&self, data: Vec<u8>) {
        *self.data.write() = data;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let data = self.data.read();
        let size = data.len() as u64;
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let end = start.saturating_add(len);

        if offset > size || end > data.len() {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        Ok(data[start..end].to_vec())
    }

    fn append(&mut self, bytes: &[u8]) -> StorageResult<u64> {
        let mut data = self.data.write();
        let offset = data.len() as u64;
        data.extend_from_slice(bytes);
        Ok(offset)
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        let mut data = self.data.write();
        let size = data.len() as u64;
        if new_size > size {
            return Err(StorageError::TruncatePastEnd {
                requested: new_size,
                size,
            });
        }
        data.truncate(new_size as usize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_running_offsets() {
        let mut backend = InMemoryBackend::new();
        assert_eq!(backend.append(b"bench").unwrap(), 0);
        assert_eq!(backend.append(b"press").unwrap(), 5);
        assert_eq!(backend.size().unwrap(), 10);
        assert_eq!(backend.read_at(5, 5).unwrap(), b"press");
    }

    #[test]
    fn read_past_end_fails() {
        let mut backend = InMemoryBackend::new();
        backend.append(b"squat").unwrap();

        assert!(matches!(
            backend.read_at(3, 10),
            Err(StorageError::ReadPastEnd { .. })
        ));
        assert!(matches!(
            backend.read_at(9, 0),
            Err(StorageError::ReadPastEnd { .. })
        ));
        assert!(backend.read_at(5, 0).unwrap().is_empty());
    }

    #[test]
    fn clones_share_the_buffer() {
        let mut writer = InMemoryBackend::new();
        let observer = writer.clone();

        writer.append(b"deadlift").unwrap();
        assert_eq!(observer.bytes(), b"deadlift");

        observer.replace_bytes(b"dead".to_vec());
        assert_eq!(writer.size().unwrap(), 4);
    }

    #[test]
    fn truncate_only_shrinks() {
        let mut backend = InMemoryBackend::with_data(b"overhead".to_vec());
        backend.truncate(4).unwrap();
        assert_eq!(backend.read_all().unwrap(), b"over");

        assert!(matches!(
            backend.truncate(100),
            Err(StorageError::TruncatePastEnd { requested: 100, size: 4 })
        ));
    }
}
