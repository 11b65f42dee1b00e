//! # StrengthLog Core
//!
//! The local half of the StrengthLog data layer.
//!
//! This crate provides:
//! - The workout model in its three representations (external, local,
//!   network) and the lossless mappings between them
//! - List filtering and active/completed statistics
//! - The [`WorkoutDao`] store contract and [`WorkoutTable`], a journaled
//!   implementation over a `strengthlog_storage` backend
//! - A change feed that drives the store's `observe_*` subscriptions
//!
//! ## Example
//!
//! ```rust
//! use strengthlog_core::{LocalWorkout, WorkoutDao, WorkoutTable};
//!
//! let table = WorkoutTable::in_memory().unwrap();
//! table.upsert(LocalWorkout::new("w1", "Squat", "5x5")).unwrap();
//! table.update_completed("w1", true).unwrap();
//!
//! assert_eq!(table.delete_completed().unwrap(), 1);
//! assert!(table.get_all().unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod change_feed;
mod config;
mod error;
mod filter;
mod mapping;
mod model;
mod stats;
mod store;
mod types;

pub use change_feed::{ChangeFeed, Snapshot, WorkoutObserver, WorkoutsObserver};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use filter::{filter_workouts, WorkoutsFilterType};
pub use mapping::convert_all;
pub use model::{new_workout_id, LocalWorkout, NetworkWorkout, Workout, WorkoutStatus};
pub use stats::{active_and_completed_stats, StatsResult};
pub use store::{JournalRecord, WorkoutDao, WorkoutTable, JOURNAL_MAGIC, JOURNAL_VERSION};
pub use types::SequenceNumber;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
