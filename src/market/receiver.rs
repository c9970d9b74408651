//! Receiver admission with eviction.
//!
//! ## Design
//!
//! A `Receiver` keeps its tentative matches in a `Vec` sorted best first by
//! its own [`RankingTable`]. The list never grows past the capacity: when a
//! better proposer arrives at a full receiver, the worst holder is released.
//!
//! ```text
//! held (best) [P4, P1, P7] (worst)   capacity 3
//! P2 proposes, ranked between P4 and P1
//! held        [P4, P2, P1]           P7 evicted
//! ```
//!
//! A receiver therefore always holds the best feasible subset of everyone
//! who has proposed to it so far.

use crate::market::{Rank, RankingTable};
use crate::types::{Outcome, ProposerId, ReceiverId};

/// A receiver with a fixed capacity and its tentative match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    id: ReceiverId,

    /// Maximum number of proposers held at once; always positive
    capacity: usize,

    ranking: RankingTable,

    /// Tentatively held proposers, sorted by rank ascending (best first)
    held: Vec<ProposerId>,
}

impl Receiver {
    /// Create an empty receiver
    ///
    /// # Arguments
    ///
    /// * `id` - Receiver identity
    /// * `capacity` - Maximum number of held proposers (validated positive upstream)
    /// * `ranking` - The receiver's ranking of every proposer
    pub fn new(id: ReceiverId, capacity: usize, ranking: RankingTable) -> Self {
        Self {
            id,
            capacity,
            ranking,
            // One spare slot: an admission briefly holds capacity + 1
            held: Vec::with_capacity(capacity.saturating_add(1)),
        }
    }

    #[inline]
    pub fn id(&self) -> ReceiverId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn ranking(&self) -> &RankingTable {
        &self.ranking
    }

    /// Currently held proposers, best first
    #[inline]
    pub fn held(&self) -> &[ProposerId] {
        &self.held
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.held.len() >= self.capacity
    }

    /// Number of free slots
    #[inline]
    pub fn vacancies(&self) -> usize {
        self.capacity.saturating_sub(self.held.len())
    }

    /// The least preferred proposer currently held
    #[inline]
    pub fn worst_held(&self) -> Option<ProposerId> {
        self.held.last().copied()
    }

    /// Evaluate a proposal from `proposer`.
    ///
    /// Unacceptable proposers are rejected outright. Otherwise the proposer
    /// is inserted in front of the first holder it strictly beats; if that
    /// overflows the capacity, the worst holder is evicted. A proposer that
    /// beats nobody is appended only while there is a vacancy.
    pub fn evaluate(&mut self, proposer: ProposerId) -> Outcome {
        let rank = match self.ranking.rank_of(proposer) {
            Rank::Acceptable(rank) => rank,
            Rank::Unacceptable => return Outcome::Rejected,
        };

        if self.held.is_empty() {
            self.held.push(proposer);
            return Outcome::AdmittedNoEviction;
        }

        let ranking = &self.ranking;
        let slot = self
            .held
            .iter()
            .position(|&holder| Rank::Acceptable(rank).is_better_than(ranking.rank_of(holder)));

        match slot {
            Some(index) => {
                self.held.insert(index, proposer);
                if self.held.len() <= self.capacity {
                    return Outcome::AdmittedNoEviction;
                }
                self.held
                    .pop()
                    .map_or(Outcome::AdmittedNoEviction, Outcome::AdmittedWithEviction)
            }
            None if self.held.len() < self.capacity => {
                self.held.push(proposer);
                Outcome::AdmittedNoEviction
            }
            None => Outcome::Rejected,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
