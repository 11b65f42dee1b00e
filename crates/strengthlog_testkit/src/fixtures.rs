//! Store fixtures and sample data.

use std::path::{Path, PathBuf};
use strengthlog_core::{LocalWorkout, NetworkWorkout, StoreConfig, WorkoutDao, WorkoutTable};
use strengthlog_storage::InMemoryBackend;
use tempfile::TempDir;

/// File name the durable fixtures use for the journal.
pub const JOURNAL_FILE: &str = "workouts.journal";

/// A workout table with automatic cleanup.
pub struct TestTable {
    /// The table.
    pub table: WorkoutTable,
    /// Kept alive so the directory outlives the table.
    temp_dir: Option<TempDir>,
}

impl TestTable {
    /// Creates an in-memory table.
    pub fn memory() -> Self {
        Self {
            table: WorkoutTable::in_memory().expect("failed to open in-memory table"),
            temp_dir: None,
        }
    }

    /// Creates a journaled table in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let table = WorkoutTable::open(&temp_dir.path().join(JOURNAL_FILE))
            .expect("failed to open file table");
        Self {
            table,
            temp_dir: Some(temp_dir),
        }
    }

    /// Journal path if file-based.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(JOURNAL_FILE))
    }

    /// Closes the table and reopens it from its journal.
    ///
    /// # Panics
    ///
    /// Panics if the table is in-memory or cannot be reopened.
    pub fn reopen(self) -> Self {
        let temp_dir = self.temp_dir.expect("only file tables can be reopened");
        drop(self.table);
        let table = WorkoutTable::open(&temp_dir.path().join(JOURNAL_FILE))
            .expect("failed to reopen file table");
        Self {
            table,
            temp_dir: Some(temp_dir),
        }
    }
}

impl std::ops::Deref for TestTable {
    type Target = WorkoutTable;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

/// Opens a table over a shared in-memory backend.
///
/// The returned backend sees every journal byte the table writes, so tests
/// can inspect or damage the journal and reopen from it with
/// [`reopen_backend`].
pub fn shared_backend_table() -> (WorkoutTable, InMemoryBackend) {
    let backend = InMemoryBackend::new();
    let table = WorkoutTable::with_backend(Box::new(backend.clone()), StoreConfig::default())
        .expect("failed to open table over shared backend");
    (table, backend)
}

/// Opens a fresh table over the journal held by `backend`.
pub fn reopen_backend(backend: &InMemoryBackend) -> WorkoutTable {
    WorkoutTable::with_backend(Box::new(backend.clone()), StoreConfig::default())
        .expect("failed to reopen table over shared backend")
}

/// Runs a test against a temporary in-memory table.
pub fn with_temp_table<F, R>(f: F) -> R
where
    F: FnOnce(&WorkoutTable) -> R,
{
    let test_table = TestTable::memory();
    f(&test_table.table)
}

/// Runs a test against a temporary journaled table.
pub fn with_file_table<F, R>(f: F) -> R
where
    F: FnOnce(&WorkoutTable, &Path) -> R,
{
    let test_table = TestTable::file();
    let path = test_table.path().expect("file table should have a path");
    f(&test_table.table, &path)
}

/// Canned data sets.
pub mod scenarios {
    use super::*;

    /// Three local workouts, the last one completed.
    pub fn sample_workouts() -> Vec<LocalWorkout> {
        vec![
            LocalWorkout::new("w1", "Squat", "5x5 at 100kg"),
            LocalWorkout::new("w2", "Bench press", "3x8"),
            LocalWorkout::new("w3", "Deadlift", "1x5").with_completed(true),
        ]
    }

    /// The same workouts as the remote mirror holds them.
    pub fn sample_network_workouts() -> Vec<NetworkWorkout> {
        sample_workouts().into_iter().map(NetworkWorkout::from).collect()
    }

    /// A table holding `active` active and `completed` completed workouts.
    pub fn mixed_table(active: usize, completed: usize) -> TestTable {
        let test_table = TestTable::memory();
        let active_rows = (0..active).map(|i| LocalWorkout::new(format!("a{i}"), format!("Active {i}"), ""));
        let completed_rows = (0..completed).map(|i| {
            LocalWorkout::new(format!("c{i}"), format!("Completed {i}"), "").with_completed(true)
        });
        test_table
            .table
            .upsert_all(active_rows.chain(completed_rows).collect())
            .expect("failed to populate table");
        test_table
    }
}
