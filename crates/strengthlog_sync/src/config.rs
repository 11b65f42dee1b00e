//! Configuration for the remote mirror.

use std::time::Duration;

/// Latency the remote mirror applies to every call unless configured.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

/// Configuration for [`crate::WorkoutNetworkDataSource`].
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Artificial delay before each load or save completes.
    pub latency: Duration,
}

impl NetworkConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with no artificial delay.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Sets the artificial latency.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_latency() {
        assert_eq!(NetworkConfig::default().latency, Duration::from_secs(2));
        assert_eq!(NetworkConfig::instant().latency, Duration::ZERO);
    }

    #[test]
    fn builder() {
        let config = NetworkConfig::new().with_latency(Duration::from_millis(5));
        assert_eq!(config.latency, Duration::from_millis(5));
    }
}
