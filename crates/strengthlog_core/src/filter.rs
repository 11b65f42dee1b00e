//! Filtering workout lists by completion state.

use crate::model::Workout;
use std::fmt;
use std::str::FromStr;

/// Which workouts a list should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkoutsFilterType {
    /// Every workout.
    #[default]
    AllWorkouts,
    /// Only workouts that are not completed.
    ActiveWorkouts,
    /// Only completed workouts.
    CompletedWorkouts,
}

impl WorkoutsFilterType {
    /// Whether `workout` passes this filter.
    #[must_use]
    pub fn matches(self, workout: &Workout) -> bool {
        match self {
            Self::AllWorkouts => true,
            Self::ActiveWorkouts => workout.is_active(),
            Self::CompletedWorkouts => workout.is_completed,
        }
    }

    /// Short name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllWorkouts => "all",
            Self::ActiveWorkouts => "active",
            Self::CompletedWorkouts => "completed",
        }
    }
}

impl fmt::Display for WorkoutsFilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutsFilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::AllWorkouts),
            "active" => Ok(Self::ActiveWorkouts),
            "completed" => Ok(Self::CompletedWorkouts),
            other => Err(format!(
                "unknown filter '{other}', expected one of: all, active, completed"
            )),
        }
    }
}

/// Returns the workouts passing `filter`, in their original order.
#[must_use]
pub fn filter_workouts(workouts: &[Workout], filter: WorkoutsFilterType) -> Vec<Workout> {
    workouts
        .iter()
        .filter(|workout| filter.matches(workout))
        .cloned()
        .collect()
}
