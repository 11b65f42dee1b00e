//! Active/completed statistics over a list of workouts.

use crate::model::Workout;
use serde::Serialize;

/// Share of active and completed workouts, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsResult {
    /// Percentage of workouts that are active.
    pub active_workouts_percent: f32,
    /// Percentage of workouts that are completed.
    pub completed_workouts_percent: f32,
}

/// Computes the active/completed split of `workouts`.
///
/// An empty list yields `0` for both percentages.
#[must_use]
pub fn active_and_completed_stats(workouts: &[Workout]) -> StatsResult {
    if workouts.is_empty() {
        return StatsResult::default();
    }

    let total = workouts.len() as f32;
    let active = workouts.iter().filter(|w| w.is_active()).count() as f32;

    StatsResult {
        active_workouts_percent: 100.0 * active / total,
        completed_workouts_percent: 100.0 * (total - active) / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workouts(active: usize, completed: usize) -> Vec<Workout> {
        let mut list = Vec::new();
        for i in 0..active {
            list.push(Workout::new(format!("a{i}"), "title", "desc"));
        }
        for i in 0..completed {
            list.push(Workout::new(format!("c{i}"), "title", "desc").with_completed(true));
        }
        list
    }

    #[test]
    fn no_completed() {
        let result = active_and_completed_stats(&workouts(1, 0));
        assert_eq!(result.active_workouts_percent, 100.0);
        assert_eq!(result.completed_workouts_percent, 0.0);
    }

    #[test]
    fn no_active() {
        let result = active_and_completed_stats(&workouts(0, 1));
        assert_eq!(result.active_workouts_percent, 0.0);
        assert_eq!(result.completed_workouts_percent, 100.0);
    }

    #[test]
    fn both() {
        let result = active_and_completed_stats(&workouts(3, 2));
        assert_eq!(result.active_workouts_percent, 60.0);
        assert_eq!(result.completed_workouts_percent, 40.0);
    }

    #[test]
    fn empty() {
        assert_eq!(active_and_completed_stats(&[]), StatsResult::default());
    }
}
