//! The remote mirror of the workout collection.

use crate::config::NetworkConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use strengthlog_core::NetworkWorkout;
use tokio::sync::Mutex;

/// A remote source holding the authoritative copy of the workout list.
///
/// Both operations move the whole collection; there is no per-row
/// protocol.
#[async_trait]
pub trait NetworkDataSource: Send + Sync {
    /// Loads the full remote collection.
    ///
    /// Fails with [`SyncError::RemoteUnavailable`] if the collection is
    /// absent. An empty collection is not a failure.
    async fn load_workouts(&self) -> SyncResult<Vec<NetworkWorkout>>;

    /// Replaces the remote collection with `workouts`.
    async fn save_workouts(&self, workouts: Vec<NetworkWorkout>) -> SyncResult<()>;
}

/// The demo entries the mirror starts with.
pub fn seed_workouts() -> Vec<NetworkWorkout> {
    vec![
        NetworkWorkout::new(
            "PISA",
            "Build tower in Pisa",
            "Ground looks good, no foundation work required.",
        ),
        NetworkWorkout::new(
            "TACOMA",
            "Finish bridge in Tacoma",
            "Found awesome girders at half the cost!",
        ),
    ]
}

/// In-process stand-in for a network service.
///
/// Every call sleeps for the configured latency while holding the
/// collection lock, so a load never observes a half-applied save.
#[derive(Debug)]
pub struct WorkoutNetworkDataSource {
    config: NetworkConfig,
    /// `None` models an unreachable remote.
    workouts: Mutex<Option<Vec<NetworkWorkout>>>,
}

impl WorkoutNetworkDataSource {
    /// Creates a mirror seeded with the demo entries.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_workouts(config, seed_workouts())
    }

    /// Creates a mirror holding `workouts`.
    #[must_use]
    pub fn with_workouts(config: NetworkConfig, workouts: Vec<NetworkWorkout>) -> Self {
        Self {
            config,
            workouts: Mutex::new(Some(workouts)),
        }
    }

    /// Replaces the collection without latency. `None` makes the mirror
    /// unavailable.
    pub async fn set_workouts(&self, workouts: Option<Vec<NetworkWorkout>>) {
        *self.workouts.lock().await = workouts;
    }

    /// Makes the mirror unavailable, or available again with an empty
    /// collection if it was unavailable.
    pub async fn set_available(&self, available: bool) {
        let mut workouts = self.workouts.lock().await;
        match (available, workouts.is_some()) {
            (false, _) => *workouts = None,
            (true, false) => *workouts = Some(Vec::new()),
            (true, true) => {}
        }
    }

    /// The current collection, without latency.
    pub async fn snapshot(&self) -> Option<Vec<NetworkWorkout>> {
        self.workouts.lock().await.clone()
    }

    /// The configured latency.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait]
impl NetworkDataSource for WorkoutNetworkDataSource {
    async fn load_workouts(&self) -> SyncResult<Vec<NetworkWorkout>> {
        let workouts = self.workouts.lock().await;
        tokio::time::sleep(self.config.latency).await;
        workouts.clone().ok_or(SyncError::RemoteUnavailable)
    }

    async fn save_workouts(&self, workouts: Vec<NetworkWorkout>) -> SyncResult<()> {
        let mut current = self.workouts.lock().await;
        tokio::time::sleep(self.config.latency).await;
        match current.as_mut() {
            Some(slot) => {
                *slot = workouts;
                Ok(())
            }
            None => Err(SyncError::RemoteUnavailable),
        }
    }
}
