//! Journaled in-memory workout table.

use super::journal::{Journal, JournalRecord};
use super::WorkoutDao;
use crate::change_feed::{ChangeFeed, Rows, Snapshot, WorkoutObserver, WorkoutsObserver};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::model::LocalWorkout;
use crate::types::SequenceNumber;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use strengthlog_storage::{FileBackend, InMemoryBackend, StorageBackend};

struct TableState {
    /// `None` once the table has been closed.
    rows: Option<Arc<Rows>>,
    sequence: SequenceNumber,
}

/// The workout table.
///
/// Rows live in memory; every mutation is first appended to a journal on a
/// [`StorageBackend`] and only then applied and published to observers, all
/// under the table's single write lock. Opening a table replays its journal.
///
/// Mutations that would change nothing (deleting a missing id, setting a flag
/// to its current value) are neither journaled nor published.
pub struct WorkoutTable {
    state: RwLock<TableState>,
    journal: Mutex<Journal>,
    feed: ChangeFeed,
}

impl WorkoutTable {
    /// Opens an empty, non-durable table.
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns `StoreResult` to match the other
    /// constructors.
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_backend(
            Box::new(InMemoryBackend::new()),
            StoreConfig::new().sync_on_write(false),
        )
    }

    /// Opens (or creates) a durable table whose journal lives at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or locked, or if the
    /// journal is corrupted.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Like [`WorkoutTable::open`] with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`WorkoutTable::open`].
    pub fn open_with_config(path: &Path, config: StoreConfig) -> StoreResult<Self> {
        let backend = FileBackend::open_with_create_dirs(path)?;
        Self::with_backend(Box::new(backend), config)
    }

    /// Opens a table over an arbitrary backend, replaying whatever journal
    /// it already holds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] if the journal cannot be replayed,
    /// or a storage error.
    pub fn with_backend(backend: Box<dyn StorageBackend>, config: StoreConfig) -> StoreResult<Self> {
        let mut journal = Journal::new(backend, config.sync_on_write);
        let replay = journal.replay()?;

        let records = replay.records.len();
        let mut rows = Rows::new();
        for record in replay.records {
            apply_record(&mut rows, record);
        }
        tracing::info!(
            records,
            workouts = rows.len(),
            torn_tail = replay.truncated_at.is_some(),
            "replayed workout journal"
        );

        let rows = Arc::new(rows);
        let sequence = SequenceNumber::default();
        Ok(Self {
            feed: ChangeFeed::new(Snapshot::new(sequence, Arc::clone(&rows))),
            state: RwLock::new(TableState {
                rows: Some(rows),
                sequence,
            }),
            journal: Mutex::new(journal),
        })
    }

    /// Sequence of the last applied mutation.
    #[must_use]
    pub fn sequence(&self) -> SequenceNumber {
        self.state.read().sequence
    }

    /// Number of rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] after [`WorkoutTable::close`].
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_rows()?.len())
    }

    /// Whether the table has no rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] after [`WorkoutTable::close`].
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Tears the table down. Every later operation fails with
    /// [`StoreError::Unavailable`]; existing observers keep their last value.
    pub fn close(&self) {
        self.state.write().rows = None;
        tracing::debug!("workout table closed");
    }

    /// Whether [`WorkoutTable::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.read().rows.is_none()
    }

    /// Size of the journal in bytes.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the size cannot be read.
    pub fn journal_size(&self) -> StoreResult<u64> {
        self.journal.lock().size()
    }

    /// Rewrites the journal as a single upsert of the current rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] after close, or a storage error.
    pub fn compact(&self) -> StoreResult<()> {
        let state = self.state.write();
        let rows = state.rows.as_ref().ok_or(StoreError::Unavailable)?;

        let mut records = Vec::new();
        if !rows.is_empty() {
            records.push(JournalRecord::Upsert {
                workouts: rows.values().cloned().collect(),
            });
        }

        let mut journal = self.journal.lock();
        let before = journal.size()?;
        journal.rewrite(&records)?;
        tracing::info!(before, after = journal.size()?, "compacted workout journal");
        Ok(())
    }

    fn read_rows(&self) -> StoreResult<Arc<Rows>> {
        self.state
            .read()
            .rows
            .as_ref()
            .map(Arc::clone)
            .ok_or(StoreError::Unavailable)
    }

    /// Journals, applies and publishes one mutation. Returns the number of
    /// rows it touched.
    fn mutate(&self, record: JournalRecord) -> StoreResult<usize> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let rows = state.rows.as_mut().ok_or(StoreError::Unavailable)?;

        let affected = count_affected(rows, &record);
        if affected == 0 {
            return Ok(0);
        }

        self.journal.lock().append(&record)?;
        apply_record(Arc::make_mut(rows), record);
        state.sequence = state.sequence.next();

        tracing::debug!(sequence = %state.sequence, affected, "applied workout mutation");
        self.feed
            .publish(Snapshot::new(state.sequence, Arc::clone(rows)));
        Ok(affected)
    }
}

impl WorkoutDao for WorkoutTable {
    fn observe_all(&self) -> WorkoutsObserver {
        self.feed.observe_all()
    }

    fn observe_by_id(&self, workout_id: &str) -> WorkoutObserver {
        self.feed.observe_by_id(workout_id)
    }

    fn get_all(&self) -> StoreResult<Vec<LocalWorkout>> {
        Ok(self.read_rows()?.values().cloned().collect())
    }

    fn get_by_id(&self, workout_id: &str) -> StoreResult<Option<LocalWorkout>> {
        Ok(self.read_rows()?.get(workout_id).cloned())
    }

    fn upsert(&self, workout: LocalWorkout) -> StoreResult<()> {
        self.upsert_all(vec![workout])
    }

    fn upsert_all(&self, workouts: Vec<LocalWorkout>) -> StoreResult<()> {
        self.mutate(JournalRecord::Upsert { workouts })?;
        Ok(())
    }

    fn update_completed(&self, workout_id: &str, completed: bool) -> StoreResult<()> {
        self.mutate(JournalRecord::SetCompleted {
            id: workout_id.to_string(),
            completed,
        })?;
        Ok(())
    }

    fn delete_by_id(&self, workout_id: &str) -> StoreResult<usize> {
        self.mutate(JournalRecord::Delete {
            id: workout_id.to_string(),
        })
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.mutate(JournalRecord::Clear)?;
        Ok(())
    }

    fn delete_completed(&self) -> StoreResult<usize> {
        self.mutate(JournalRecord::DeleteCompleted)
    }
}

impl std::fmt::Debug for WorkoutTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("WorkoutTable")
            .field("rows", &state.rows.as_ref().map(|rows| rows.len()))
            .field("sequence", &state.sequence)
            .finish_non_exhaustive()
    }
}

fn count_affected(rows: &Rows, record: &JournalRecord) -> usize {
    match record {
        JournalRecord::Upsert { workouts } => workouts.len(),
        JournalRecord::SetCompleted { id, completed } => rows
            .get(id)
            .map_or(0, |w| usize::from(w.is_completed != *completed)),
        JournalRecord::Delete { id } => usize::from(rows.contains_key(id)),
        JournalRecord::DeleteCompleted => rows.values().filter(|w| w.is_completed).count(),
        JournalRecord::Clear => rows.len(),
    }
}

fn apply_record(rows: &mut Rows, record: JournalRecord) {
    match record {
        JournalRecord::Upsert { workouts } => {
            for workout in workouts {
                rows.insert(workout.id.clone(), workout);
            }
        }
        JournalRecord::SetCompleted { id, completed } => {
            if let Some(workout) = rows.get_mut(&id) {
                workout.is_completed = completed;
            }
        }
        JournalRecord::Delete { id } => {
            rows.remove(&id);
        }
        JournalRecord::DeleteCompleted => rows.retain(|_, w| !w.is_completed),
        JournalRecord::Clear => rows.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use strengthlog_storage::{StorageError, StorageResult};
    use tempfile::tempdir;
    use tokio::time::timeout;

    /// Shared in-memory backend whose next appends or syncs can be made to
    /// fail. A failing append writes half its bytes first, like a full disk.
    #[derive(Clone, Default)]
    struct FlakyBackend {
        inner: InMemoryBackend,
        torn_appends: Arc<AtomicUsize>,
        failed_syncs: Arc<AtomicUsize>,
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    impl StorageBackend for FlakyBackend {
        fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
            self.inner.read_at(offset, len)
        }

        fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
            if take(&self.torn_appends) {
                self.inner.append(&data[..data.len() / 2])?;
                return Err(StorageError::Io(io::Error::other("disk full")));
            }
            self.inner.append(data)
        }

        fn size(&self) -> StorageResult<u64> {
            self.inner.size()
        }

        fn sync(&mut self) -> StorageResult<()> {
            if take(&self.failed_syncs) {
                return Err(StorageError::Io(io::Error::other("sync failed")));
            }
            self.inner.sync()
        }

        fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
            self.inner.truncate(new_size)
        }
    }

    fn ids(table: &WorkoutTable) -> Vec<String> {
        table.get_all().unwrap().into_iter().map(|w| w.id).collect()
    }

    fn squat() -> LocalWorkout {
        LocalWorkout::new("squat", "Squat", "5x5")
    }

    fn bench() -> LocalWorkout {
        LocalWorkout::new("bench", "Bench", "3x8")
    }

    #[test]
    fn upsert_is_idempotent() {
        let once = WorkoutTable::in_memory().unwrap();
        once.upsert(squat()).unwrap();

        let twice = WorkoutTable::in_memory().unwrap();
        twice.upsert(squat()).unwrap();
        twice.upsert(squat()).unwrap();

        assert_eq!(once.get_all().unwrap(), twice.get_all().unwrap());
    }

    #[test]
    fn upsert_replaces_by_id() {
        let table = WorkoutTable::in_memory().unwrap();
        table.upsert(squat()).unwrap();
        table
            .upsert(LocalWorkout::new("squat", "Back squat", "5x3"))
            .unwrap();

        let rows = table.get_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Back squat");
    }

    #[test]
    fn get_by_id_missing_is_none() {
        let table = WorkoutTable::in_memory().unwrap();
        assert_eq!(table.get_by_id("nope").unwrap(), None);
    }

    #[test]
    fn update_completed_missing_is_noop() {
        let table = WorkoutTable::in_memory().unwrap();
        table.update_completed("nope", true).unwrap();
        assert!(table.is_empty().unwrap());
        assert_eq!(table.sequence(), SequenceNumber::new(0));
    }

    #[test]
    fn delete_counts() {
        let table = WorkoutTable::in_memory().unwrap();
        table.upsert_all(vec![squat(), bench()]).unwrap();
        table.update_completed("bench", true).unwrap();

        assert_eq!(table.delete_by_id("nope").unwrap(), 0);
        assert_eq!(table.delete_completed().unwrap(), 1);
        assert_eq!(table.get_all().unwrap(), vec![squat()]);
        assert_eq!(table.delete_by_id("squat").unwrap(), 1);
        assert!(table.is_empty().unwrap());
    }

    #[test]
    fn closed_table_is_unavailable() {
        let table = WorkoutTable::in_memory().unwrap();
        table.upsert(squat()).unwrap();
        table.close();

        assert!(table.is_closed());
        assert!(matches!(table.get_all(), Err(StoreError::Unavailable)));
        assert!(matches!(table.get_by_id("squat"), Err(StoreError::Unavailable)));
        assert!(matches!(table.upsert(bench()), Err(StoreError::Unavailable)));
        assert!(matches!(table.delete_all(), Err(StoreError::Unavailable)));
    }

    #[test]
    fn reopen_replays_journal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workouts.journal");

        {
            let table = WorkoutTable::open(&path).unwrap();
            table.upsert_all(vec![squat(), bench()]).unwrap();
            table.update_completed("squat", true).unwrap();
            table.delete_by_id("bench").unwrap();
        }

        let table = WorkoutTable::open(&path).unwrap();
        assert_eq!(table.get_all().unwrap(), vec![squat().with_completed(true)]);
    }

    #[test]
    fn torn_tail_is_dropped_on_open() {
        let backend = InMemoryBackend::new();
        {
            let table =
                WorkoutTable::with_backend(Box::new(backend.clone()), StoreConfig::default())
                    .unwrap();
            table.upsert(squat()).unwrap();
            table.upsert(bench()).unwrap();
        }
        let mut bytes = backend.bytes();
        bytes.truncate(bytes.len() - 2);
        backend.replace_bytes(bytes);

        let table =
            WorkoutTable::with_backend(Box::new(backend), StoreConfig::default()).unwrap();
        assert_eq!(table.get_all().unwrap(), vec![squat()]);
    }

    #[test]
    fn torn_append_is_rolled_back() {
        let backend = FlakyBackend::default();
        let config = StoreConfig::new().sync_on_write(false);
        let table = WorkoutTable::with_backend(Box::new(backend.clone()), config.clone()).unwrap();

        table.upsert(LocalWorkout::new("a", "A", "")).unwrap();
        backend.torn_appends.store(1, Ordering::SeqCst);
        assert!(matches!(
            table.upsert(LocalWorkout::new("b", "B", "")),
            Err(StoreError::Storage(_))
        ));
        table.upsert(LocalWorkout::new("c", "C", "")).unwrap();
        assert_eq!(ids(&table), ["a", "c"]);
        drop(table);

        let reopened = WorkoutTable::with_backend(Box::new(backend), config).unwrap();
        assert_eq!(ids(&reopened), ["a", "c"]);
    }

    #[test]
    fn failed_sync_is_rolled_back() {
        let backend = FlakyBackend::default();
        let table =
            WorkoutTable::with_backend(Box::new(backend.clone()), StoreConfig::default()).unwrap();

        backend.failed_syncs.store(1, Ordering::SeqCst);
        assert!(table.upsert(squat()).is_err());
        assert!(table.is_empty().unwrap());
        assert_eq!(table.sequence(), SequenceNumber::new(0));
        drop(table);

        let reopened =
            WorkoutTable::with_backend(Box::new(backend), StoreConfig::default()).unwrap();
        assert!(reopened.is_empty().unwrap());
        reopened.upsert(bench()).unwrap();
        assert_eq!(ids(&reopened), ["bench"]);
    }

    #[test]
    fn compact_keeps_contents_and_shrinks_journal() {
        let backend = InMemoryBackend::new();
        let table =
            WorkoutTable::with_backend(Box::new(backend.clone()), StoreConfig::default()).unwrap();
        for round in 0..10 {
            table.upsert(squat()).unwrap();
            table.update_completed("squat", round % 2 == 0).unwrap();
        }
        table.upsert(bench()).unwrap();
        let before = table.journal_size().unwrap();
        let rows = table.get_all().unwrap();

        table.compact().unwrap();
        assert!(table.journal_size().unwrap() < before);
        drop(table);

        let reopened = WorkoutTable::with_backend(Box::new(backend), StoreConfig::default()).unwrap();
        assert_eq!(reopened.get_all().unwrap(), rows);
    }

    #[tokio::test]
    async fn observe_all_sees_every_mutation_in_order() {
        let table = WorkoutTable::in_memory().unwrap();
        let mut observer = table.observe_all();
        assert!(observer.next().await.unwrap().is_empty());

        table.upsert(squat()).unwrap();
        assert_eq!(observer.next().await.unwrap(), vec![squat()]);

        table.update_completed("squat", true).unwrap();
        assert_eq!(
            observer.next().await.unwrap(),
            vec![squat().with_completed(true)]
        );

        table.delete_all().unwrap();
        assert!(observer.next().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_all_is_published_once() {
        let table = WorkoutTable::in_memory().unwrap();
        let mut observer = table.observe_all();
        observer.next().await.unwrap();

        table.upsert_all(vec![squat(), bench()]).unwrap();
        let snapshot = observer.next_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.sequence, SequenceNumber::new(1));
    }

    #[tokio::test]
    async fn observe_by_id_follows_one_row() {
        let table = WorkoutTable::in_memory().unwrap();
        let mut observer = table.observe_by_id("squat");
        assert_eq!(observer.next().await.unwrap(), None);

        table.upsert(bench()).unwrap();
        table.upsert(squat()).unwrap();
        assert_eq!(observer.next().await.unwrap(), Some(squat()));

        table.update_completed("bench", true).unwrap();
        assert!(timeout(Duration::from_millis(50), observer.next()).await.is_err());

        table.delete_by_id("squat").unwrap();
        assert_eq!(observer.next().await.unwrap(), None);
    }
}
