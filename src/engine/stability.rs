//! Stability and individual-rationality checks.
//!
//! A pair `(p, r)` blocks a matching when `p` lists `r` above its current
//! receiver (or `p` is unmatched and lists `r` at all), `r` finds `p`
//! acceptable, and `r` either has a free seat or holds someone it ranks
//! below `p`. A matching with no blocking pair is stable.
//!
//! These checks are independent of how the result was produced; they only
//! read the market and the final assignment.

use crate::engine::MatchingResult;
use crate::market::{Proposer, Receiver};
use crate::types::{ProposerId, ReceiverId};

/// A proposer/receiver pair that would both rather be matched to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockingPair {
    pub proposer: ProposerId,
    pub receiver: ReceiverId,
}

/// A held pair that one side never agreed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RationalityViolation {
    /// The receiver holds a proposer it ranks `Unacceptable`
    UnacceptableToReceiver {
        proposer: ProposerId,
        receiver: ReceiverId,
    },
    /// The proposer is held by a receiver missing from its own list
    NotInPreferences {
        proposer: ProposerId,
        receiver: ReceiverId,
    },
}

/// Everything wrong with a matching, if anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityReport {
    pub blocking_pairs: Vec<BlockingPair>,
    pub violations: Vec<RationalityViolation>,
}

impl StabilityReport {
    /// No blocking pairs and no individual-rationality violations
    pub fn is_stable(&self) -> bool {
        self.blocking_pairs.is_empty() && self.violations.is_empty()
    }
}

/// Check `result` against the market it was computed for.
pub fn verify(
    proposers: &[Proposer],
    receivers: &[Receiver],
    result: &MatchingResult,
) -> StabilityReport {
    let mut report = StabilityReport::default();

    for (receiver_id, held) in result.iter() {
        let Some(receiver) = receivers.get(receiver_id.index()) else {
            continue;
        };
        for &proposer in held {
            if !receiver.ranking().rank_of(proposer).is_acceptable() {
                report.violations.push(RationalityViolation::UnacceptableToReceiver {
                    proposer,
                    receiver: receiver_id,
                });
            }
            let listed = proposers
                .get(proposer.index())
                .and_then(|p| p.position_of(receiver_id))
                .is_some();
            if !listed {
                report.violations.push(RationalityViolation::NotInPreferences {
                    proposer,
                    receiver: receiver_id,
                });
            }
        }
    }

    for proposer in proposers {
        let id = proposer.id();
        // Receivers strictly preferred to the current outcome
        let cutoff = result
            .receiver_of(id)
            .and_then(|current| proposer.position_of(current))
            .unwrap_or(proposer.preferences().len());

        for &candidate in &proposer.preferences()[..cutoff] {
            let Some(receiver) = receivers.get(candidate.index()) else {
                continue;
            };
            let rank = receiver.ranking().rank_of(id);
            if !rank.is_acceptable() {
                continue;
            }

            let held = result.matches(candidate);
            let has_vacancy = held.len() < receiver.capacity();
            let beats_worst = held
                .last()
                .is_some_and(|&worst| rank.is_better_than(receiver.ranking().rank_of(worst)));

            if has_vacancy || beats_worst {
                report.blocking_pairs.push(BlockingPair {
                    proposer: id,
                    receiver: candidate,
                });
            }
        }
    }

    report
}

// ============================================================================
// Unit Tests
// ============================================================================
