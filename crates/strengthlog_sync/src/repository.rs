//! The offline-first workout repository.
//!
//! Reads are served from the local store. A forced read first pulls the
//! remote collection and replaces the local contents with it. Every
//! mutation is applied locally, then pushed to the remote in the background;
//! push failures are logged and dropped.

use crate::error::{SyncError, SyncResult};
use crate::network::NetworkDataSource;
use crate::scope::BackgroundScope;
use crate::stream::{WorkoutStream, WorkoutsStream};
use async_trait::async_trait;
use std::sync::Arc;
use strengthlog_core::{
    convert_all, new_workout_id, LocalWorkout, NetworkWorkout, Workout, WorkoutDao,
};

/// Single entry point for workout data.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Streams the workout list. Never touches the network.
    fn get_workouts_stream(&self) -> WorkoutsStream;

    /// Returns all workouts, pulling from the remote first if `force_update`.
    async fn get_workouts(&self, force_update: bool) -> SyncResult<Vec<Workout>>;

    /// Pulls the remote collection into the local store.
    async fn refresh(&self) -> SyncResult<()>;

    /// Streams one workout. Never touches the network.
    fn get_workout_stream(&self, workout_id: &str) -> WorkoutStream;

    /// Returns one workout, pulling from the remote first if `force_update`.
    async fn get_workout(&self, workout_id: &str, force_update: bool)
        -> SyncResult<Option<Workout>>;

    /// Refreshes one workout. The remote only supports full loads, so this
    /// is a full pull.
    async fn refresh_workout(&self, workout_id: &str) -> SyncResult<()>;

    /// Creates an active workout and returns its new id.
    async fn create_workout(&self, title: &str, description: &str) -> SyncResult<String>;

    /// Changes a workout's title and description, keeping its completion
    /// state. Fails with [`SyncError::NotFound`] if it does not exist.
    async fn update_workout(
        &self,
        workout_id: &str,
        title: &str,
        description: &str,
    ) -> SyncResult<()>;

    /// Marks a workout completed. A missing id is not an error.
    async fn complete_workout(&self, workout_id: &str) -> SyncResult<()>;

    /// Marks a workout active. A missing id is not an error.
    async fn activate_workout(&self, workout_id: &str) -> SyncResult<()>;

    /// Deletes all completed workouts.
    async fn clear_completed_workouts(&self) -> SyncResult<()>;

    /// Deletes every workout.
    async fn delete_all_workouts(&self) -> SyncResult<()>;

    /// Deletes one workout.
    async fn delete_workout(&self, workout_id: &str) -> SyncResult<()>;
}

/// [`WorkoutRepository`] over a local store and a remote mirror.
pub struct DefaultWorkoutRepository {
    network: Arc<dyn NetworkDataSource>,
    local: Arc<dyn WorkoutDao>,
    scope: BackgroundScope,
}

impl DefaultWorkoutRepository {
    /// Creates a repository. Pushes are launched on `scope`.
    pub fn new(
        network: Arc<dyn NetworkDataSource>,
        local: Arc<dyn WorkoutDao>,
        scope: BackgroundScope,
    ) -> Self {
        Self {
            network,
            local,
            scope,
        }
    }

    /// The scope pushes run on.
    pub fn scope(&self) -> &BackgroundScope {
        &self.scope
    }

    /// Replaces the local contents with the remote collection.
    ///
    /// The local store is only touched once the load has finished, so
    /// dropping this future mid-load leaves it unchanged.
    async fn pull(&self) -> SyncResult<()> {
        let remote = self.network.load_workouts().await?;
        let count = remote.len();
        let local: Vec<LocalWorkout> =
            tokio::task::spawn_blocking(move || convert_all(remote)).await?;

        self.local.delete_all()?;
        self.local.upsert_all(local)?;
        tracing::info!(count, "pulled workouts from remote");
        Ok(())
    }

    /// Sends the local contents to the remote in the background.
    fn push(&self) {
        let network = Arc::clone(&self.network);
        let local = Arc::clone(&self.local);
        self.scope.launch(async move {
            match push_local(network.as_ref(), local.as_ref()).await {
                Ok(count) => tracing::debug!(count, "pushed workouts to remote"),
                Err(err) => tracing::debug!(error = %err, "push to remote failed"),
            }
        });
    }
}

async fn push_local(network: &dyn NetworkDataSource, local: &dyn WorkoutDao) -> SyncResult<usize> {
    let rows = local.get_all()?;
    let workouts: Vec<NetworkWorkout> =
        tokio::task::spawn_blocking(move || convert_all(rows)).await?;
    let count = workouts.len();
    network.save_workouts(workouts).await?;
    Ok(count)
}

#[async_trait]
impl WorkoutRepository for DefaultWorkoutRepository {
    fn get_workouts_stream(&self) -> WorkoutsStream {
        WorkoutsStream::new(self.local.observe_all())
    }

    async fn get_workouts(&self, force_update: bool) -> SyncResult<Vec<Workout>> {
        if force_update {
            self.pull().await?;
        }
        Ok(convert_all(self.local.get_all()?))
    }

    async fn refresh(&self) -> SyncResult<()> {
        self.pull().await
    }

    fn get_workout_stream(&self, workout_id: &str) -> WorkoutStream {
        WorkoutStream::new(self.local.observe_by_id(workout_id))
    }

    async fn get_workout(
        &self,
        workout_id: &str,
        force_update: bool,
    ) -> SyncResult<Option<Workout>> {
        if force_update {
            self.pull().await?;
        }
        Ok(self.local.get_by_id(workout_id)?.map(Workout::from))
    }

    async fn refresh_workout(&self, _workout_id: &str) -> SyncResult<()> {
        self.pull().await
    }

    async fn create_workout(&self, title: &str, description: &str) -> SyncResult<String> {
        let id = tokio::task::spawn_blocking(new_workout_id).await?;
        self.local
            .upsert(LocalWorkout::new(id.clone(), title, description))?;
        tracing::debug!(id = %id, "created workout");
        self.push();
        Ok(id)
    }

    async fn update_workout(
        &self,
        workout_id: &str,
        title: &str,
        description: &str,
    ) -> SyncResult<()> {
        let existing = self
            .local
            .get_by_id(workout_id)?
            .ok_or_else(|| SyncError::not_found(workout_id))?;

        self.local.upsert(LocalWorkout {
            title: title.to_string(),
            description: description.to_string(),
            ..existing
        })?;
        self.push();
        Ok(())
    }

    async fn complete_workout(&self, workout_id: &str) -> SyncResult<()> {
        self.local.update_completed(workout_id, true)?;
        self.push();
        Ok(())
    }

    async fn activate_workout(&self, workout_id: &str) -> SyncResult<()> {
        self.local.update_completed(workout_id, false)?;
        self.push();
        Ok(())
    }

    async fn clear_completed_workouts(&self) -> SyncResult<()> {
        let removed = self.local.delete_completed()?;
        tracing::debug!(removed, "cleared completed workouts");
        self.push();
        Ok(())
    }

    async fn delete_all_workouts(&self) -> SyncResult<()> {
        self.local.delete_all()?;
        self.push();
        Ok(())
    }

    async fn delete_workout(&self, workout_id: &str) -> SyncResult<()> {
        self.local.delete_by_id(workout_id)?;
        self.push();
        Ok(())
    }
}

impl std::fmt::Debug for DefaultWorkoutRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultWorkoutRepository")
            .field("in_flight", &self.scope.in_flight())
            .finish_non_exhaustive()
    }
}
