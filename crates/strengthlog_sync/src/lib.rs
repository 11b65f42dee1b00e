//! # StrengthLog Sync
//!
//! The remote half of the StrengthLog data layer and the repository that
//! ties both halves together.
//!
//! This crate provides:
//! - [`NetworkDataSource`], the remote mirror contract, with a
//!   latency-simulating in-process implementation and a test double
//! - [`BackgroundScope`] for pushes that outlive their caller
//! - [`WorkoutRepository`], the offline-first read/write entry point
//!
//! ## Sync policy
//!
//! The local store is the source of truth for reads:
//! 1. A forced read pulls the full remote collection and replaces the local
//!    contents with it (clear, then reinsert)
//! 2. Every mutation is applied locally first
//! 3. The full local contents are then pushed to the remote in the
//!    background, replacing it wholesale
//!
//! There is no merge: the last pull or push wins. Push failures are logged
//! and dropped.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strengthlog_core::WorkoutTable;
//! use strengthlog_sync::{
//!     BackgroundScope, DefaultWorkoutRepository, NetworkConfig, WorkoutNetworkDataSource,
//!     WorkoutRepository,
//! };
//!
//! let repository = DefaultWorkoutRepository::new(
//!     Arc::new(WorkoutNetworkDataSource::new(NetworkConfig::default())),
//!     Arc::new(WorkoutTable::in_memory()?),
//!     BackgroundScope::current(),
//! );
//!
//! let id = repository.create_workout("Squat", "5x5").await?;
//! repository.complete_workout(&id).await?;
//! let workouts = repository.get_workouts(true).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod fake;
mod network;
mod repository;
mod scope;
mod stream;

pub use config::{NetworkConfig, DEFAULT_LATENCY};
pub use error::{SyncError, SyncResult};
pub use fake::FakeNetworkDataSource;
pub use network::{seed_workouts, NetworkDataSource, WorkoutNetworkDataSource};
pub use repository::{DefaultWorkoutRepository, WorkoutRepository};
pub use scope::BackgroundScope;
pub use stream::{WorkoutStream, WorkoutsStream};
