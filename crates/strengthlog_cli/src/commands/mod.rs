//! CLI command implementations.

pub mod compact;
pub mod stats;
pub mod workouts;

use serde::Serialize;
use std::error::Error;
use strengthlog_core::WorkoutTable;
use strengthlog_sync::{SyncError, WorkoutRepository};

/// Result type shared by the commands.
pub type CommandResult = Result<(), Box<dyn Error>>;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// One JSON document per command
    Json,
}

/// What every command runs against.
pub struct Context<'a> {
    /// Workout reads and writes
    pub repository: &'a dyn WorkoutRepository,
    /// The local table, for maintenance commands
    pub table: &'a WorkoutTable,
    /// Output format
    pub format: OutputFormat,
}

impl Context<'_> {
    /// Prints `message` in text mode or `value` in JSON mode.
    pub fn emit<T: Serialize>(&self, message: &str, value: &T) -> CommandResult {
        match self.format {
            OutputFormat::Text => println!("{message}"),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }
}

/// Turns an error into the message shown to the user.
pub fn describe(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::NotFound { id }) => format!("workout not found: {id}"),
        Some(SyncError::RemoteUnavailable) => {
            "error while loading workouts: the remote is unavailable".to_string()
        }
        Some(other) => other.to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_sync_errors() {
        let err: Box<dyn Error> = Box::new(SyncError::not_found("w1"));
        assert_eq!(describe(err.as_ref()), "workout not found: w1");

        let err: Box<dyn Error> = Box::new(SyncError::RemoteUnavailable);
        assert!(describe(err.as_ref()).contains("remote is unavailable"));
    }

    #[test]
    fn describes_other_errors() {
        let err: Box<dyn Error> = "disk on fire".into();
        assert_eq!(describe(err.as_ref()), "disk on fire");
    }
}
