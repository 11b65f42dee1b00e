//! Core type definitions.

use std::fmt;

/// Position of a mutation in a store's history.
///
/// Every applied mutation advances the sequence by one, so a higher number
/// always means a later store state. A fresh store starts at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Creates a new sequence number.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ordering() {
        let first = SequenceNumber::default();
        assert_eq!(first.as_u64(), 0);
        assert!(first.next() > first);
        assert_eq!(first.next().next(), SequenceNumber::new(2));
        assert_eq!(SequenceNumber::new(7).to_string(), "seq:7");
    }
}
