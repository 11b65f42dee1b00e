//! Conversions between the workout representations.
//!
//! Every mapping is total and lossless for the fields it carries, so any
//! chain of conversions ending where it started yields an equal value.

use crate::model::{LocalWorkout, NetworkWorkout, Workout, WorkoutStatus};

/// Converts every item of `items` into `U`.
///
/// ```rust
/// use strengthlog_core::{convert_all, LocalWorkout, NetworkWorkout};
///
/// let rows = vec![LocalWorkout::new("w1", "Squat", "5x5")];
/// let remote: Vec<NetworkWorkout> = convert_all(&rows);
/// assert_eq!(remote[0].short_description, "5x5");
/// ```
pub fn convert_all<T, U>(items: impl IntoIterator<Item = T>) -> Vec<U>
where
    U: From<T>,
{
    items.into_iter().map(U::from).collect()
}

impl From<&Workout> for LocalWorkout {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id.clone(),
            title: workout.title.clone(),
            description: workout.description.clone(),
            is_completed: workout.is_completed,
        }
    }
}

impl From<Workout> for LocalWorkout {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            title: workout.title,
            description: workout.description,
            is_completed: workout.is_completed,
        }
    }
}

impl From<&LocalWorkout> for Workout {
    fn from(local: &LocalWorkout) -> Self {
        Self {
            id: local.id.clone(),
            title: local.title.clone(),
            description: local.description.clone(),
            is_completed: local.is_completed,
        }
    }
}

impl From<LocalWorkout> for Workout {
    fn from(local: LocalWorkout) -> Self {
        Self {
            id: local.id,
            title: local.title,
            description: local.description,
            is_completed: local.is_completed,
        }
    }
}

impl From<&NetworkWorkout> for LocalWorkout {
    fn from(remote: &NetworkWorkout) -> Self {
        Self {
            id: remote.id.clone(),
            title: remote.title.clone(),
            description: remote.short_description.clone(),
            is_completed: remote.status.is_complete(),
        }
    }
}

impl From<NetworkWorkout> for LocalWorkout {
    fn from(remote: NetworkWorkout) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            description: remote.short_description,
            is_completed: remote.status.is_complete(),
        }
    }
}

impl From<&LocalWorkout> for NetworkWorkout {
    fn from(local: &LocalWorkout) -> Self {
        Self {
            id: local.id.clone(),
            title: local.title.clone(),
            short_description: local.description.clone(),
            status: WorkoutStatus::from_completed(local.is_completed),
        }
    }
}

impl From<LocalWorkout> for NetworkWorkout {
    fn from(local: LocalWorkout) -> Self {
        Self {
            id: local.id,
            title: local.title,
            short_description: local.description,
            status: WorkoutStatus::from_completed(local.is_completed),
        }
    }
}

// External <-> network goes through the local row.

impl From<&Workout> for NetworkWorkout {
    fn from(workout: &Workout) -> Self {
        LocalWorkout::from(workout).into()
    }
}

impl From<Workout> for NetworkWorkout {
    fn from(workout: Workout) -> Self {
        LocalWorkout::from(workout).into()
    }
}

impl From<&NetworkWorkout> for Workout {
    fn from(remote: &NetworkWorkout) -> Self {
        LocalWorkout::from(remote).into()
    }
}

impl From<NetworkWorkout> for Workout {
    fn from(remote: NetworkWorkout) -> Self {
        LocalWorkout::from(remote).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn workout_strategy() -> impl Strategy<Value = Workout> {
        ("[a-z0-9-]{1,36}", ".{0,40}", ".{0,80}", any::<bool>()).prop_map(
            |(id, title, description, done)| Workout::new(id, title, description).with_completed(done),
        )
    }

    #[test]
    fn network_renames_description_and_status() {
        let workout = Workout::new("PISA", "Build tower", "No foundation work").with_completed(true);
        let remote = NetworkWorkout::from(&workout);

        assert_eq!(remote.short_description, "No foundation work");
        assert_eq!(remote.status, WorkoutStatus::Complete);
    }

    #[test]
    fn convert_all_keeps_order() {
        let rows = vec![
            LocalWorkout::new("b", "Bench", ""),
            LocalWorkout::new("a", "Row", ""),
        ];
        let external: Vec<Workout> = convert_all(&rows);
        assert_eq!(external[0].id, "b");
        assert_eq!(external[1].id, "a");
    }

    proptest! {
        #[test]
        fn network_round_trip_is_lossless(workout in workout_strategy()) {
            let remote = NetworkWorkout::from(&workout);
            prop_assert_eq!(Workout::from(remote), workout);
        }

        #[test]
        fn local_round_trip_is_lossless(workout in workout_strategy()) {
            let local = LocalWorkout::from(workout.clone());
            prop_assert_eq!(Workout::from(&local), workout);
        }
    }
}
