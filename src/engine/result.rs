//! Result view of a completed matching.
//!
//! `MatchingResult` is a read-only projection of the engine's frozen state:
//! each receiver's held list (best first) and the unmatched proposers in the
//! order they were confirmed. It never changes after assembly.

use std::fmt;

use rust_decimal::Decimal;

use crate::market::Receiver;
use crate::types::{MatchReceipt, ProposerId, ReceiverId};

/// Final assignment produced by a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingResult {
    /// Held proposers per receiver, indexed by receiver, best first
    matches: Vec<Vec<ProposerId>>,

    /// Capacity per receiver
    capacities: Vec<usize>,

    /// Exhausted proposers, in confirmation order
    unmatched: Vec<ProposerId>,

    /// Receiver holding each proposer, indexed by proposer
    assignment: Vec<Option<ReceiverId>>,

    /// Engine steps taken
    steps: usize,
}

impl MatchingResult {
    pub(crate) fn assemble(
        receivers: &[Receiver],
        num_proposers: usize,
        unmatched: &[ProposerId],
        steps: usize,
    ) -> Self {
        let mut assignment = vec![None; num_proposers];
        for receiver in receivers {
            for proposer in receiver.held() {
                if let Some(slot) = assignment.get_mut(proposer.index()) {
                    *slot = Some(receiver.id());
                }
            }
        }

        Self {
            matches: receivers.iter().map(|r| r.held().to_vec()).collect(),
            capacities: receivers.iter().map(Receiver::capacity).collect(),
            unmatched: unmatched.to_vec(),
            assignment,
            steps,
        }
    }

    #[inline]
    pub fn proposer_count(&self) -> usize {
        self.assignment.len()
    }

    #[inline]
    pub fn receiver_count(&self) -> usize {
        self.matches.len()
    }

    /// Proposers held by `receiver`, best first; empty for unknown receivers
    pub fn matches(&self, receiver: ReceiverId) -> &[ProposerId] {
        self.matches
            .get(receiver.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every receiver with its match list
    pub fn iter(&self) -> impl Iterator<Item = (ReceiverId, &[ProposerId])> + '_ {
        self.matches
            .iter()
            .enumerate()
            .map(|(index, held)| (ReceiverId(index), held.as_slice()))
    }

    /// Proposers left unmatched, in the order they ran out of receivers
    #[inline]
    pub fn unmatched(&self) -> &[ProposerId] {
        &self.unmatched
    }

    /// The receiver holding `proposer`, if any
    pub fn receiver_of(&self, proposer: ProposerId) -> Option<ReceiverId> {
        self.assignment.get(proposer.index()).copied().flatten()
    }

    pub fn capacity(&self, receiver: ReceiverId) -> Option<usize> {
        self.capacities.get(receiver.index()).copied()
    }

    pub fn matched_count(&self) -> usize {
        self.matches.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Share of `receiver`'s seats that are filled
    pub fn utilization(&self, receiver: ReceiverId) -> Option<Decimal> {
        let capacity = self.capacity(receiver)?;
        let filled = self.matches(receiver).len();
        Decimal::from(filled as u64).checked_div(Decimal::from(capacity as u64))
    }

    /// Canonical little-endian encoding of the assignment.
    ///
    /// Layout: proposer count, receiver count, then per receiver its list
    /// length followed by the held ids, then the unmatched length and ids.
    /// The step count is not part of it.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let words = 3 + self.receiver_count() + self.proposer_count();
        let mut bytes = Vec::with_capacity(words * 8);

        let mut put = |value: usize| bytes.extend_from_slice(&(value as u64).to_le_bytes());

        put(self.proposer_count());
        put(self.receiver_count());
        for held in &self.matches {
            put(held.len());
            held.iter().for_each(|p| put(p.index()));
        }
        put(self.unmatched.len());
        self.unmatched.iter().for_each(|p| put(p.index()));

        bytes
    }

    /// Fingerprinted summary of this result
    pub fn receipt(&self) -> MatchReceipt {
        MatchReceipt::new(
            self.proposer_count() as u64,
            self.receiver_count() as u64,
            self.matched_count() as u64,
            self.unmatched_count() as u64,
            self.steps as u64,
            MatchReceipt::compute_hash(&self.canonical_bytes()),
        )
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[ProposerId]) -> fmt::Result {
    f.write_str("[")?;
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", id)?;
    }
    f.write_str("]")
}

impl fmt::Display for MatchingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (receiver, held) in self.iter() {
            let capacity = self.capacity(receiver).unwrap_or_default();
            write!(f, "{} capacity {} matches ", receiver, capacity)?;
            write_ids(f, held)?;
            writeln!(f)?;
        }
        f.write_str("unmatched ")?;
        write_ids(f, &self.unmatched)?;
        writeln!(f)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
