//! Strongly-typed agent identities.
//!
//! Both sides of the market are addressed by dense 0-based indices. The
//! newtypes keep a proposer index from being used to look up a receiver
//! (and vice versa); the raw index is always available through `index()`.

use std::fmt;

/// Identity of a proposer (e.g. a student).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposerId(pub usize);

/// Identity of a receiver (e.g. a school).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReceiverId(pub usize);

impl ProposerId {
    /// The raw 0-based index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl ReceiverId {
    /// The raw 0-based index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ProposerId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<usize> for ReceiverId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ProposerId(3).to_string(), "P3");
        assert_eq!(ReceiverId(0).to_string(), "R0");
    }

    #[test]
    fn test_ordering_follows_index() {
        let mut ids = vec![ProposerId(2), ProposerId(0), ProposerId(1)];
        ids.sort();
        assert_eq!(ids, vec![ProposerId(0), ProposerId(1), ProposerId(2)]);
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(ReceiverId::from(7).index(), 7);
        assert_eq!(ProposerId::from(4).index(), 4);
    }
}
