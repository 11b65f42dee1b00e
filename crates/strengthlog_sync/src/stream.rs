//! Store observers mapped to the external workout model.

use strengthlog_core::{convert_all, Workout, WorkoutObserver, WorkoutsObserver};

/// Continuous stream of the whole workout list.
#[derive(Debug)]
pub struct WorkoutsStream {
    inner: WorkoutsObserver,
}

impl WorkoutsStream {
    pub(crate) fn new(inner: WorkoutsObserver) -> Self {
        Self { inner }
    }

    /// Waits for the next list. The first call yields the current list.
    pub async fn next(&mut self) -> Option<Vec<Workout>> {
        self.inner.next().await.map(convert_all)
    }

    /// The current list, without waiting.
    pub fn current(&self) -> Vec<Workout> {
        convert_all(self.inner.current())
    }
}

/// Continuous stream of one workout, `None` while it does not exist.
#[derive(Debug)]
pub struct WorkoutStream {
    inner: WorkoutObserver,
}

impl WorkoutStream {
    pub(crate) fn new(inner: WorkoutObserver) -> Self {
        Self { inner }
    }

    /// The observed id.
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    /// Waits until the workout changes. The first call yields its current
    /// value.
    pub async fn next(&mut self) -> Option<Option<Workout>> {
        self.inner
            .next()
            .await
            .map(|workout| workout.map(Workout::from))
    }

    /// The current value, without waiting.
    pub fn current(&self) -> Option<Workout> {
        self.inner.current().map(Workout::from)
    }
}
