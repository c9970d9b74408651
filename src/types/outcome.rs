//! Proposal outcomes and per-step events.
//!
//! [`Outcome`] is what a receiver answers to a single proposal. The engine
//! matches on it exhaustively; there is no fourth case.
//!
//! [`StepEvent`] is what one engine step did. It is returned by
//! `MatchingEngine::step` and handed to `run_observed` callbacks, purely for
//! introspection.

use std::fmt;

use crate::types::{ProposerId, ReceiverId};

/// Result of a receiver evaluating one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The proposer was not admitted; the receiver's held list is unchanged
    Rejected,
    /// The proposer was admitted and nobody was displaced
    AdmittedNoEviction,
    /// The proposer was admitted and the receiver released its worst holder
    AdmittedWithEviction(ProposerId),
}

impl Outcome {
    /// True if the proposer now sits in the receiver's held list
    #[inline]
    pub fn is_admitted(self) -> bool {
        !matches!(self, Outcome::Rejected)
    }

    /// The displaced proposer, if any
    #[inline]
    pub fn evicted(self) -> Option<ProposerId> {
        match self {
            Outcome::AdmittedWithEviction(evicted) => Some(evicted),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rejected => write!(f, "rejected"),
            Outcome::AdmittedNoEviction => write!(f, "admitted"),
            Outcome::AdmittedWithEviction(evicted) => write!(f, "admitted, evicted {}", evicted),
        }
    }
}

/// What a single engine step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepEvent {
    /// The dequeued proposer had no receivers left to propose to and was
    /// moved to the unmatched set
    Exhausted { proposer: ProposerId },

    /// The dequeued proposer proposed to `receiver`
    Proposal {
        proposer: ProposerId,
        receiver: ReceiverId,
        outcome: Outcome,
    },
}

impl StepEvent {
    /// The proposer taken off the queue in this step
    pub fn proposer(&self) -> ProposerId {
        match *self {
            StepEvent::Exhausted { proposer } => proposer,
            StepEvent::Proposal { proposer, .. } => proposer,
        }
    }

    /// The receiver proposed to, if a proposal took place
    pub fn receiver(&self) -> Option<ReceiverId> {
        match *self {
            StepEvent::Exhausted { .. } => None,
            StepEvent::Proposal { receiver, .. } => Some(receiver),
        }
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepEvent::Exhausted { proposer } => write!(f, "{} exhausted", proposer),
            StepEvent::Proposal { proposer, receiver, outcome } => {
                write!(f, "{} -> {}: {}", proposer, receiver, outcome)
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_admitted() {
        assert!(!Outcome::Rejected.is_admitted());
        assert!(Outcome::AdmittedNoEviction.is_admitted());
        assert!(Outcome::AdmittedWithEviction(ProposerId(1)).is_admitted());
    }

    #[test]
    fn test_outcome_evicted() {
        assert_eq!(Outcome::Rejected.evicted(), None);
        assert_eq!(Outcome::AdmittedNoEviction.evicted(), None);
        assert_eq!(
            Outcome::AdmittedWithEviction(ProposerId(4)).evicted(),
            Some(ProposerId(4))
        );
    }

    #[test]
    fn test_step_event_accessors() {
        let event = StepEvent::Proposal {
            proposer: ProposerId(1),
            receiver: ReceiverId(0),
            outcome: Outcome::AdmittedWithEviction(ProposerId(0)),
        };
        assert_eq!(event.proposer(), ProposerId(1));
        assert_eq!(event.receiver(), Some(ReceiverId(0)));
        assert_eq!(event.to_string(), "P1 -> R0: admitted, evicted P0");

        let exhausted = StepEvent::Exhausted { proposer: ProposerId(2) };
        assert_eq!(exhausted.receiver(), None);
        assert_eq!(exhausted.to_string(), "P2 exhausted");
    }
}
