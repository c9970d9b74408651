//! Proposer state machine.
//!
//! A proposer walks its preference list front to back. The pointer only
//! ever moves forward; once it reaches the end the proposer is `Exhausted`
//! and stays unmatched for the rest of the run.
//!
//! ```text
//! Proposing(0) -> Proposing(1) -> ... -> Proposing(len - 1) -> Exhausted
//! ```

use crate::types::{ProposerId, ReceiverId};

/// Where a proposer is in its preference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposerState {
    /// Next proposal goes to `preferences[k]`
    Proposing(usize),
    /// Every receiver on the list has been tried
    Exhausted,
}

impl ProposerState {
    #[inline]
    pub fn is_exhausted(self) -> bool {
        matches!(self, ProposerState::Exhausted)
    }
}

/// A proposer and its position in its own preference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposer {
    id: ProposerId,

    /// Receivers in order of preference, distinct
    preferences: Vec<ReceiverId>,

    /// Index of the next receiver to propose to; `<= preferences.len()`
    pointer: usize,
}

impl Proposer {
    /// Create a proposer pointing at its first choice
    pub fn new(id: ProposerId, preferences: Vec<ReceiverId>) -> Self {
        Self {
            id,
            preferences,
            pointer: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ProposerId {
        self.id
    }

    #[inline]
    pub fn preferences(&self) -> &[ReceiverId] {
        &self.preferences
    }

    #[inline]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn state(&self) -> ProposerState {
        if self.pointer < self.preferences.len() {
            ProposerState::Proposing(self.pointer)
        } else {
            ProposerState::Exhausted
        }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state().is_exhausted()
    }

    /// Receiver the next proposal goes to, None once exhausted
    #[inline]
    pub fn current_target(&self) -> Option<ReceiverId> {
        self.preferences.get(self.pointer).copied()
    }

    /// Move past the current target and return the new state.
    ///
    /// Advancing an exhausted proposer is a no-op.
    pub fn advance(&mut self) -> ProposerState {
        if self.pointer < self.preferences.len() {
            self.pointer += 1;
        }
        self.state()
    }

    /// Position of `receiver` in this proposer's list, if listed
    pub fn position_of(&self, receiver: ReceiverId) -> Option<usize> {
        self.preferences.iter().position(|&r| r == receiver)
    }

    /// Receivers not yet proposed to
    pub fn remaining(&self) -> &[ReceiverId] {
        &self.preferences[self.pointer..]
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
