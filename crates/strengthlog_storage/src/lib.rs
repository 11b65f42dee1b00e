//! # StrengthLog Storage
//!
//! Byte-level backends for the workout journal.
//!
//! A backend is an **opaque, append-only byte store**. It knows nothing about
//! journal framing, CBOR or workouts; `strengthlog_core` owns every byte it
//! writes here.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - ephemeral stores and tests
//! - [`FileBackend`] - a single exclusively-locked file on disk
//!
//! ## Example
//!
//! ```rust
//! use strengthlog_storage::{InMemoryBackend, StorageBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"workout").unwrap();
//! assert_eq!(backend.read_at(offset, 7).unwrap(), b"workout");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
