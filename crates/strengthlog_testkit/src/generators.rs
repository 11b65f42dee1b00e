//! Property-based test generators using proptest.

use proptest::prelude::*;
use std::collections::BTreeMap;
use strengthlog_core::{LocalWorkout, NetworkWorkout, WorkoutDao, WorkoutStatus};

/// Strategy for workout ids drawn from a small pool, so operations in a
/// sequence often hit the same rows.
pub fn workout_id_strategy() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|n| format!("w{n}"))
}

/// Strategy for free text, including empty strings and non-ASCII.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ]{1,24}",
        "\\PC{0,16}",
    ]
}

/// Strategy for local workouts.
pub fn local_workout_strategy() -> impl Strategy<Value = LocalWorkout> {
    (workout_id_strategy(), text_strategy(), text_strategy(), any::<bool>()).prop_map(
        |(id, title, description, completed)| {
            LocalWorkout::new(id, title, description).with_completed(completed)
        },
    )
}

/// Strategy for remote workouts.
pub fn network_workout_strategy() -> impl Strategy<Value = NetworkWorkout> {
    (workout_id_strategy(), text_strategy(), text_strategy(), any::<bool>()).prop_map(
        |(id, title, short_description, completed)| NetworkWorkout {
            status: WorkoutStatus::from_completed(completed),
            ..NetworkWorkout::new(id, title, short_description)
        },
    )
}

/// A single store mutation.
#[derive(Debug, Clone)]
pub enum WorkoutOperation {
    /// Insert or replace a batch.
    Upsert(Vec<LocalWorkout>),
    /// Set the completion flag.
    SetCompleted {
        /// Workout id
        id: String,
        /// New flag
        completed: bool,
    },
    /// Delete by id.
    Delete(String),
    /// Delete completed workouts.
    DeleteCompleted,
    /// Delete everything.
    Clear,
}

impl WorkoutOperation {
    /// Applies the operation to a store.
    pub fn apply(&self, dao: &dyn WorkoutDao) -> strengthlog_core::StoreResult<()> {
        match self {
            Self::Upsert(workouts) => dao.upsert_all(workouts.clone()),
            Self::SetCompleted { id, completed } => dao.update_completed(id, *completed),
            Self::Delete(id) => dao.delete_by_id(id).map(|_| ()),
            Self::DeleteCompleted => dao.delete_completed().map(|_| ()),
            Self::Clear => dao.delete_all(),
        }
    }

    /// Applies the operation to a plain map, the reference model for a
    /// store.
    pub fn apply_to_model(&self, model: &mut BTreeMap<String, LocalWorkout>) {
        match self {
            Self::Upsert(workouts) => {
                for workout in workouts {
                    model.insert(workout.id.clone(), workout.clone());
                }
            }
            Self::SetCompleted { id, completed } => {
                if let Some(workout) = model.get_mut(id) {
                    workout.is_completed = *completed;
                }
            }
            Self::Delete(id) => {
                model.remove(id);
            }
            Self::DeleteCompleted => model.retain(|_, w| !w.is_completed),
            Self::Clear => model.clear(),
        }
    }
}

/// Strategy for store mutations.
pub fn workout_operation_strategy() -> impl Strategy<Value = WorkoutOperation> {
    prop_oneof![
        4 => prop::collection::vec(local_workout_strategy(), 0..4).prop_map(WorkoutOperation::Upsert),
        3 => (workout_id_strategy(), any::<bool>())
            .prop_map(|(id, completed)| WorkoutOperation::SetCompleted { id, completed }),
        2 => workout_id_strategy().prop_map(WorkoutOperation::Delete),
        1 => Just(WorkoutOperation::DeleteCompleted),
        1 => Just(WorkoutOperation::Clear),
    ]
}

/// Strategy for a sequence of mutations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<WorkoutOperation>> {
    prop::collection::vec(workout_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn ids_come_from_the_pool(id in workout_id_strategy()) {
            prop_assert!(id.starts_with('w'));
            prop_assert!(id.len() == 2);
        }

        #[test]
        fn network_status_matches_flag(workout in network_workout_strategy()) {
            let local = LocalWorkout::from(workout.clone());
            prop_assert_eq!(local.is_completed, workout.status.is_complete());
        }
    }
}
