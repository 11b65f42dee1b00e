//! Store configuration.

/// Configuration for opening a [`crate::WorkoutTable`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to sync the journal backend after every appended record
    /// (safer but slower).
    pub sync_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to sync the journal on every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}
