//! Workout model in its three representations.
//!
//! - [`Workout`]: the external model handed to application code
//! - [`LocalWorkout`]: the row persisted by the local store
//! - [`NetworkWorkout`]: the shape held by the remote mirror, which renames
//!   `description` to `short_description` and carries a [`WorkoutStatus`]
//!   instead of a completion flag
//!
//! Conversions between them live in [`crate::mapping`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a fresh workout id (random UUID v4, hyphenated).
#[must_use]
pub fn new_workout_id() -> String {
    Uuid::new_v4().to_string()
}

/// A workout as seen by application code.
///
/// The `id` is assigned once by whoever creates the workout and is never
/// reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Workout {
    /// Unique id.
    pub id: String,
    /// User-supplied title, may be empty.
    pub title: String,
    /// User-supplied description, may be empty.
    pub description: String,
    /// Whether the workout has been completed.
    pub is_completed: bool,
}

impl Workout {
    /// Creates an active workout.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Returns a copy with the completion flag set to `completed`.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.is_completed = completed;
        self
    }

    /// The label shown in a list: the title, or the description when the
    /// title is empty.
    #[must_use]
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    /// Whether the workout is still active (not completed).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// Whether either the title or the description is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() || self.description.is_empty()
    }
}

/// A workout row in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalWorkout {
    /// Primary key.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Completion flag.
    pub is_completed: bool,
}

impl LocalWorkout {
    /// Creates an active row.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Returns a copy with the completion flag set to `completed`.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.is_completed = completed;
        self
    }
}

/// Remote status of a workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutStatus {
    /// Not yet completed.
    #[default]
    Active,
    /// Completed.
    Complete,
}

impl WorkoutStatus {
    /// Maps a completion flag onto a status.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Complete
        } else {
            Self::Active
        }
    }

    /// Whether this status means completed.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A workout as held by the remote mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkWorkout {
    /// Id shared with the local row.
    pub id: String,
    /// Title.
    pub title: String,
    /// The local `description`.
    pub short_description: String,
    /// The local completion flag.
    #[serde(default)]
    pub status: WorkoutStatus,
}

impl NetworkWorkout {
    /// Creates an active remote workout.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        short_description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: short_description.into(),
            status: WorkoutStatus::Active,
        }
    }
}
