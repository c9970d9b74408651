//! Per-receiver ranking table.
//!
//! ## Design
//!
//! A `RankingTable` is a dense lookup from proposer index to [`Rank`], built
//! once before matching starts and never mutated afterwards. Lookups are
//! O(1) and never recompute anything.
//!
//! ## Closed World
//!
//! A proposer the receiver never mentioned (in neither its acceptable nor its
//! unacceptable list) is `Unacceptable`. So is any id outside the table.

use crate::types::ProposerId;

/// A receiver's opinion of one proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Position in the receiver's acceptable list (0 = most preferred)
    Acceptable(usize),
    /// The receiver will never hold this proposer
    Unacceptable,
}

impl Rank {
    #[inline]
    pub fn is_acceptable(self) -> bool {
        matches!(self, Rank::Acceptable(_))
    }

    /// The numeric rank, if acceptable
    #[inline]
    pub fn value(self) -> Option<usize> {
        match self {
            Rank::Acceptable(rank) => Some(rank),
            Rank::Unacceptable => None,
        }
    }

    /// Strict preference: lower rank wins, and any acceptable rank beats
    /// `Unacceptable`.
    #[inline]
    pub fn is_better_than(self, other: Rank) -> bool {
        match (self, other) {
            (Rank::Acceptable(a), Rank::Acceptable(b)) => a < b,
            (Rank::Acceptable(_), Rank::Unacceptable) => true,
            (Rank::Unacceptable, _) => false,
        }
    }
}

/// Lookup from proposer to the receiver's rank of that proposer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingTable {
    ranks: Vec<Rank>,
}

impl RankingTable {
    /// Build the table for a market of `num_proposers`.
    ///
    /// Acceptable ids are ranked by position; unacceptable ids are written
    /// afterwards, so they override any acceptable entry for the same id.
    /// Ids outside `0..num_proposers` are ignored.
    pub fn build(
        num_proposers: usize,
        acceptable: &[ProposerId],
        unacceptable: &[ProposerId],
    ) -> Self {
        let mut ranks = vec![Rank::Unacceptable; num_proposers];

        for (position, proposer) in acceptable.iter().enumerate() {
            if let Some(slot) = ranks.get_mut(proposer.index()) {
                *slot = Rank::Acceptable(position);
            }
        }

        for proposer in unacceptable {
            if let Some(slot) = ranks.get_mut(proposer.index()) {
                *slot = Rank::Unacceptable;
            }
        }

        Self { ranks }
    }

    /// Rank of `proposer`, `Unacceptable` when unknown.
    #[inline]
    pub fn rank_of(&self, proposer: ProposerId) -> Rank {
        self.ranks
            .get(proposer.index())
            .copied()
            .unwrap_or(Rank::Unacceptable)
    }

    /// Number of proposers this table covers
    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Number of proposers with a defined rank
    pub fn acceptable_count(&self) -> usize {
        self.ranks.iter().filter(|rank| rank.is_acceptable()).count()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
