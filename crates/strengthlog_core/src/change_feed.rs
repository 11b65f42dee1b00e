//! Change feed behind the store's `observe_*` subscriptions.
//!
//! The feed publishes a [`Snapshot`] of the whole table after every applied
//! mutation. Observers hold a `tokio::sync::watch` receiver, so they:
//! - see the current contents immediately on their first `next()`
//! - see later states strictly in mutation order
//! - may skip intermediate states if they poll slower than the writer
//!   (latest-value semantics, the same as a conflated stream)
//!
//! # Usage
//!
//! ```rust,ignore
//! use strengthlog_core::{LocalWorkout, WorkoutDao, WorkoutTable};
//!
//! let table = WorkoutTable::in_memory()?;
//! let mut observer = table.observe_all();
//!
//! // The first poll yields the current contents
//! assert!(observer.next().await.unwrap().is_empty());
//!
//! table.upsert(LocalWorkout::new("w1", "Squat", "5x5"))?;
//! assert_eq!(observer.next().await.unwrap().len(), 1);
//! ```

use crate::model::LocalWorkout;
use crate::types::SequenceNumber;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Rows of a table keyed by workout id.
pub(crate) type Rows = BTreeMap<String, LocalWorkout>;

/// The table contents after a given mutation.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Sequence of the mutation that produced this state.
    pub sequence: SequenceNumber,
    rows: Arc<Rows>,
}

impl Snapshot {
    pub(crate) fn new(sequence: SequenceNumber, rows: Arc<Rows>) -> Self {
        Self { sequence, rows }
    }

    /// All rows, ordered by id.
    #[must_use]
    pub fn workouts(&self) -> Vec<LocalWorkout> {
        self.rows.values().cloned().collect()
    }

    /// The row with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<LocalWorkout> {
        self.rows.get(id).cloned()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Distributes table snapshots to observers.
///
/// Publishing never blocks and never fails, whether or not anyone is
/// subscribed.
#[derive(Debug)]
pub struct ChangeFeed {
    tx: watch::Sender<Snapshot>,
}

impl ChangeFeed {
    /// Creates a feed whose current value is `initial`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Publishes a new snapshot to all observers.
    pub fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(snapshot);
    }

    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Returns the sequence of the most recently published snapshot.
    #[must_use]
    pub fn latest_sequence(&self) -> SequenceNumber {
        self.tx.borrow().sequence
    }

    /// Returns the number of live observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Subscribes to the full table contents.
    #[must_use]
    pub fn observe_all(&self) -> WorkoutsObserver {
        WorkoutsObserver {
            rx: self.tx.subscribe(),
            primed: false,
        }
    }

    /// Subscribes to a single row.
    #[must_use]
    pub fn observe_by_id(&self, id: impl Into<String>) -> WorkoutObserver {
        WorkoutObserver {
            rx: self.tx.subscribe(),
            id: id.into(),
            last: None,
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

/// A continuous stream of the full table contents.
#[derive(Debug)]
pub struct WorkoutsObserver {
    rx: watch::Receiver<Snapshot>,
    primed: bool,
}

impl WorkoutsObserver {
    /// Waits for the next table state.
    ///
    /// The first call returns the current contents without waiting. Returns
    /// `None` only once the store has been dropped.
    pub async fn next(&mut self) -> Option<Vec<LocalWorkout>> {
        Some(self.next_snapshot().await?.workouts())
    }

    /// Like [`WorkoutsObserver::next`], returning the raw snapshot.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        if self.primed {
            self.rx.changed().await.ok()?;
        }
        self.primed = true;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The current contents, without waiting or consuming a change.
    #[must_use]
    pub fn current(&self) -> Vec<LocalWorkout> {
        self.rx.borrow().workouts()
    }
}

/// A continuous stream of one row, `None` while the row is absent.
#[derive(Debug)]
pub struct WorkoutObserver {
    rx: watch::Receiver<Snapshot>,
    id: String,
    last: Option<Option<LocalWorkout>>,
}

impl WorkoutObserver {
    /// The id being observed.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits until the observed row differs from what was last returned.
    ///
    /// The first call returns the current value without waiting. Mutations
    /// that leave this row untouched do not wake the caller. Returns `None`
    /// (the outer option) only once the store has been dropped.
    pub async fn next(&mut self) -> Option<Option<LocalWorkout>> {
        loop {
            if self.last.is_some() {
                self.rx.changed().await.ok()?;
            }
            let value = self.rx.borrow_and_update().get(&self.id);
            if self.last.as_ref() != Some(&value) {
                self.last = Some(value.clone());
                return Some(value);
            }
        }
    }

    /// The current value, without waiting.
    #[must_use]
    pub fn current(&self) -> Option<LocalWorkout> {
        self.rx.borrow().get(&self.id)
    }
}
