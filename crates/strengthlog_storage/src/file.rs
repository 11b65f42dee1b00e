//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A single-file storage backend.
///
/// The file is locked exclusively for the lifetime of the backend, so two
/// processes can never append to the same journal. The lock is released when
/// the backend is dropped.
///
/// # Example
///
/// ```no_run
/// use strengthlog_storage::{FileBackend, StorageBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("workouts.journal")).unwrap();
/// backend.append(b"record").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: Mutex<File>,
    size: u64,
}

impl FileBackend {
    /// Opens or creates the file at `path` and takes an exclusive lock on it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another process holds the lock,
    /// or an I/O error if the file cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        file.try_lock_exclusive().map_err(|_| StorageError::Locked {
            path: path.display().to_string(),
        })?;

        let size = file.metadata()?.len();
        tracing::debug!(path = %path.display(), size, "opened file backend");

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            size,
        })
    }

    /// Like [`FileBackend::open`], creating missing parent directories first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created or the file
    /// cannot be opened and locked.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let end = offset.saturating_add(len as u64);
        if offset > self.size || end > self.size {
            return Err(StorageError::ReadPastEnd {
                offset,
                len,
                size: self.size,
            });
        }
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        let offset = self.size;
        if data.is_empty() {
            return Ok(offset);
        }

        let mut file = self.file.lock();
        let written = file
            .seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(data))
            .and_then(|()| file.flush());
        if let Err(err) = written {
            // A partial write may have grown the file; keep `size` honest so
            // the caller can truncate back to `offset`.
            if let Ok(metadata) = file.metadata() {
                self.size = metadata.len();
            }
            return Err(err.into());
        }
        self.size += data.len() as u64;
        Ok(offset)
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.size)
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        if new_size > self.size {
            return Err(StorageError::TruncatePastEnd {
                requested: new_size,
                size: self.size,
            });
        }

        let file = self.file.lock();
        file.set_len(new_size)?;
        file.sync_all()?;
        self.size = new_size;
        Ok(())
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&*self.file.lock());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reopen_keeps_appended_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workouts.journal");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.append(b"front ").unwrap();
            backend.append(b"squat").unwrap();
            backend.sync().unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(backend.read_all().unwrap(), b"front squat");
        assert_eq!(backend.read_at(6, 5).unwrap(), b"squat");
    }

    #[test]
    fn second_open_is_locked_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workouts.journal");

        let _held = FileBackend::open(&path).unwrap();
        assert!(matches!(
            FileBackend::open(&path),
            Err(StorageError::Locked { .. })
        ));
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workouts.journal");

        drop(FileBackend::open(&path).unwrap());
        assert!(FileBackend::open(&path).is_ok());
    }

    #[test]
    fn truncate_discards_tail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workouts.journal");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"good|torn").unwrap();
        backend.truncate(4).unwrap();
        assert_eq!(backend.read_all().unwrap(), b"good");
        assert_eq!(backend.append(b"!").unwrap(), 4);

        assert!(matches!(
            backend.truncate(50),
            Err(StorageError::TruncatePastEnd { .. })
        ));
    }

    #[test]
    fn create_dirs_for_nested_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("strengthlog").join("workouts.journal");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        assert_eq!(backend.path(), path);
        assert!(path.exists());
    }
}
