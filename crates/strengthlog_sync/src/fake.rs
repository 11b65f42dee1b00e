//! In-memory test double for the remote mirror.

use crate::error::{SyncError, SyncResult};
use crate::network::NetworkDataSource;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use strengthlog_core::NetworkWorkout;

/// A zero-latency remote whose collection tests can inspect and replace.
#[derive(Debug)]
pub struct FakeNetworkDataSource {
    workouts: Mutex<Option<Vec<NetworkWorkout>>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl FakeNetworkDataSource {
    /// Creates an available, empty remote.
    pub fn new() -> Self {
        Self::with_workouts(Vec::new())
    }

    /// Creates a remote holding `workouts`.
    pub fn with_workouts(workouts: Vec<NetworkWorkout>) -> Self {
        Self {
            workouts: Mutex::new(Some(workouts)),
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        }
    }

    /// Creates a remote that fails every call.
    pub fn unavailable() -> Self {
        let source = Self::new();
        source.set_workouts(None);
        source
    }

    /// Replaces the collection. `None` makes the remote unavailable.
    pub fn set_workouts(&self, workouts: Option<Vec<NetworkWorkout>>) {
        *self.workouts.lock() = workouts;
    }

    /// The current collection.
    pub fn workouts(&self) -> Option<Vec<NetworkWorkout>> {
        self.workouts.lock().clone()
    }

    /// Number of `load_workouts` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of `save_workouts` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for FakeNetworkDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkDataSource for FakeNetworkDataSource {
    async fn load_workouts(&self) -> SyncResult<Vec<NetworkWorkout>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.workouts
            .lock()
            .clone()
            .ok_or(SyncError::RemoteUnavailable)
    }

    async fn save_workouts(&self, workouts: Vec<NetworkWorkout>) -> SyncResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        match self.workouts.lock().as_mut() {
            Some(slot) => {
                *slot = workouts;
                Ok(())
            }
            None => Err(SyncError::RemoteUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_calls() {
        let source = FakeNetworkDataSource::new();
        source.load_workouts().await.unwrap();
        source.save_workouts(vec![]).await.unwrap();
        source.save_workouts(vec![]).await.unwrap();
        assert_eq!(source.load_count(), 1);
        assert_eq!(source.save_count(), 2);
    }

    #[tokio::test]
    async fn unavailable_fails_both_ways() {
        let source = FakeNetworkDataSource::unavailable();
        assert!(source.load_workouts().await.unwrap_err().is_remote());
        assert!(source.save_workouts(vec![]).await.unwrap_err().is_remote());
        assert_eq!(source.workouts(), None);
    }
}
