//! # StrengthLog Testkit
//!
//! Test utilities for StrengthLog.
//!
//! This crate provides:
//! - Store fixtures backed by memory or a temporary directory
//! - Property-based generators for workouts and store operations
//! - Stress helpers for concurrent store access
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strengthlog_testkit::prelude::*;
//!
//! #[test]
//! fn starts_empty() {
//!     with_temp_table(|table| {
//!         assert!(table.get_all().unwrap().is_empty());
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use strengthlog_core::WorkoutDao;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
