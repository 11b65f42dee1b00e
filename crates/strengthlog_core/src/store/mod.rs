//! The local workout store.
//!
//! [`WorkoutDao`] is the contract the repository layer codes against;
//! [`WorkoutTable`] is the journaled implementation shipped with the crate.
//! Test doubles implement the same trait.

mod journal;
mod table;

pub use journal::{JournalRecord, JOURNAL_MAGIC, JOURNAL_VERSION};
pub use table::WorkoutTable;

use crate::change_feed::{WorkoutObserver, WorkoutsObserver};
use crate::error::StoreResult;
use crate::model::LocalWorkout;

/// Data access object for the workout table.
///
/// All operations except the observers fail with
/// [`crate::StoreError::Unavailable`] once the store has been torn down.
pub trait WorkoutDao: Send + Sync {
    /// Observes the full table.
    ///
    /// The observer yields the current contents first and then every later
    /// state. It never ends on its own while the store is alive.
    fn observe_all(&self) -> WorkoutsObserver;

    /// Observes a single workout, `None` while it is absent.
    fn observe_by_id(&self, workout_id: &str) -> WorkoutObserver;

    /// Selects all workouts, ordered by id.
    fn get_all(&self) -> StoreResult<Vec<LocalWorkout>>;

    /// Selects a workout by id. A missing id is `Ok(None)`, not an error.
    fn get_by_id(&self, workout_id: &str) -> StoreResult<Option<LocalWorkout>>;

    /// Inserts a workout, replacing any existing row with the same id.
    fn upsert(&self, workout: LocalWorkout) -> StoreResult<()>;

    /// Inserts or replaces a batch of workouts as one mutation.
    ///
    /// Readers and observers see either none or all of the batch.
    fn upsert_all(&self, workouts: Vec<LocalWorkout>) -> StoreResult<()>;

    /// Updates the completion flag. A missing id is a no-op.
    fn update_completed(&self, workout_id: &str, completed: bool) -> StoreResult<()>;

    /// Deletes a workout by id and returns the number of rows removed (0 or 1).
    fn delete_by_id(&self, workout_id: &str) -> StoreResult<usize>;

    /// Deletes every workout.
    fn delete_all(&self) -> StoreResult<()>;

    /// Deletes every completed workout and returns how many were removed.
    fn delete_completed(&self) -> StoreResult<usize>;
}
