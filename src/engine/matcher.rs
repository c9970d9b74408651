//! The proposal loop.
//!
//! ## Algorithm
//!
//! 1. Seed the queue with every proposer, in id order.
//! 2. Pop a proposer. If it is exhausted, it is unmatched for good.
//! 3. Otherwise it proposes to its current target, and the receiver answers
//!    with an [`Outcome`]:
//!    - `Rejected`: the proposer advances and is requeued (or unmatched)
//!    - `AdmittedNoEviction`: nothing else happens
//!    - `AdmittedWithEviction(e)`: `e` advances and is requeued (or unmatched)
//! 4. Repeat until the queue is empty.
//!
//! ## Termination
//!
//! Each (proposer, list position) pair is proposed at most once, so a run
//! over `N` proposers with lists of at most `L` entries takes at most
//! `N * max(L, 1)` steps. The engine refuses to go past that bound and
//! reports [`MatchError::IterationBoundExceeded`] instead.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use crate::engine::stability::{self, StabilityReport};
use crate::engine::MatchingResult;
use crate::error::MatchError;
use crate::market::input::real_entries;
use crate::market::{PreferenceData, Proposer, RankingTable, Receiver};
use crate::types::{Outcome, ProposerId, ReceiverId, StepEvent};

/// How the engine derives its step bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepLimit {
    /// `proposers * max(longest preference list, 1)`
    #[default]
    Derived,
    /// An explicit bound
    Fixed(usize),
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub step_limit: StepLimit,
}

impl EngineConfig {
    /// Configuration with an explicit step bound
    pub fn with_step_limit(limit: usize) -> Self {
        Self {
            step_limit: StepLimit::Fixed(limit),
        }
    }
}

/// Deferred-acceptance matching engine.
///
/// Owns every proposer and receiver of one run. Independent engines share
/// nothing, so separate matchings can run on separate threads; a single
/// engine's loop is strictly sequential.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    proposers: Vec<Proposer>,
    receivers: Vec<Receiver>,

    /// Active proposers awaiting evaluation
    queue: VecDeque<ProposerId>,

    /// Proposers confirmed exhausted, in the order they were confirmed
    unmatched: Vec<ProposerId>,

    /// Steps taken so far
    steps: usize,

    /// Maximum number of steps before the run is aborted
    step_bound: usize,
}

impl MatchingEngine {
    /// Validate `data` against the declared counts and build an engine
    /// with the default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::engine::MatchingEngine;
    /// use deferred_acceptance::market::PreferenceData;
    /// use deferred_acceptance::types::ReceiverId;
    ///
    /// let data = PreferenceData::new(
    ///     vec![vec![0], vec![0]],     // both proposers want receiver 0
    ///     vec![vec![1, 0]],           // receiver 0 prefers proposer 1
    ///     vec![vec![-1, -1]],         // nobody unacceptable
    ///     vec![1],                    // one seat
    /// );
    ///
    /// let mut engine = MatchingEngine::new(2, 1, &data).unwrap();
    /// let result = engine.run().unwrap();
    ///
    /// assert_eq!(result.matches(ReceiverId(0)).len(), 1);
    /// assert_eq!(result.unmatched().len(), 1);
    /// ```
    pub fn new(
        num_proposers: usize,
        num_receivers: usize,
        data: &PreferenceData,
    ) -> Result<Self, MatchError> {
        Self::with_config(num_proposers, num_receivers, data, EngineConfig::default())
    }

    /// Validate `data` and build an engine with an explicit configuration.
    pub fn with_config(
        num_proposers: usize,
        num_receivers: usize,
        data: &PreferenceData,
        config: EngineConfig,
    ) -> Result<Self, MatchError> {
        data.validate(num_proposers, num_receivers)?;

        // Validation guarantees every real entry is a non-negative in-range id
        let proposers: Vec<Proposer> = data
            .proposer_preferences
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let preferences = real_entries(row)
                    .iter()
                    .map(|&receiver| ReceiverId(receiver as usize))
                    .collect();
                Proposer::new(ProposerId(index), preferences)
            })
            .collect();

        let receivers: Vec<Receiver> = (0..num_receivers)
            .map(|index| {
                let acceptable = to_proposer_ids(&data.receiver_preferences[index]);
                let unacceptable = to_proposer_ids(&data.receiver_unacceptable[index]);
                let ranking = RankingTable::build(num_proposers, &acceptable, &unacceptable);
                Receiver::new(
                    ReceiverId(index),
                    data.capacities[index] as usize,
                    ranking,
                )
            })
            .collect();

        let longest = proposers
            .iter()
            .map(|p| p.preferences().len())
            .max()
            .unwrap_or(0);
        let step_bound = match config.step_limit {
            StepLimit::Derived => num_proposers.saturating_mul(longest.max(1)),
            StepLimit::Fixed(limit) => limit,
        };

        debug!(
            proposers = num_proposers,
            receivers = num_receivers,
            longest_list = longest,
            step_bound,
            "matching engine constructed"
        );

        Ok(Self {
            queue: (0..num_proposers).map(ProposerId).collect(),
            unmatched: Vec::new(),
            proposers,
            receivers,
            steps: 0,
            step_bound,
        })
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[inline]
    pub fn proposers(&self) -> &[Proposer] {
        &self.proposers
    }

    #[inline]
    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    #[inline]
    pub fn proposer(&self, id: ProposerId) -> Option<&Proposer> {
        self.proposers.get(id.index())
    }

    #[inline]
    pub fn receiver(&self, id: ReceiverId) -> Option<&Receiver> {
        self.receivers.get(id.index())
    }

    /// Proposers waiting in the queue, front first
    pub fn queued(&self) -> impl Iterator<Item = ProposerId> + '_ {
        self.queue.iter().copied()
    }

    /// Proposers confirmed exhausted so far
    #[inline]
    pub fn unmatched(&self) -> &[ProposerId] {
        &self.unmatched
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn step_bound(&self) -> usize {
        self.step_bound
    }

    /// True once the queue has drained
    #[inline]
    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Process one proposer from the queue.
    ///
    /// Returns `Ok(None)` once the queue is empty. Fails with
    /// `IterationBoundExceeded` if work remains but the step bound has
    /// been reached.
    pub fn step(&mut self) -> Result<Option<StepEvent>, MatchError> {
        if self.queue.is_empty() {
            return Ok(None);
        }

        if self.steps >= self.step_bound {
            warn!(
                bound = self.step_bound,
                queued = self.queue.len(),
                "step bound reached with proposers still queued"
            );
            return Err(MatchError::IterationBoundExceeded {
                bound: self.step_bound,
            });
        }

        let Some(proposer) = self.queue.pop_front() else {
            return Ok(None);
        };
        self.steps += 1;

        // Exhaustion is rechecked here, not only when requeueing
        let Some(target) = self.proposers[proposer.index()].current_target() else {
            self.unmatched.push(proposer);
            trace!(step = self.steps, %proposer, "proposer exhausted");
            return Ok(Some(StepEvent::Exhausted { proposer }));
        };

        let outcome = self.receivers[target.index()].evaluate(proposer);
        match outcome {
            Outcome::Rejected => self.release(proposer),
            Outcome::AdmittedNoEviction => {}
            Outcome::AdmittedWithEviction(evicted) => self.release(evicted),
        }

        trace!(
            step = self.steps,
            %proposer,
            receiver = %target,
            %outcome,
            "proposal evaluated"
        );

        Ok(Some(StepEvent::Proposal {
            proposer,
            receiver: target,
            outcome,
        }))
    }

    /// Run to the stable fixed point.
    pub fn run(&mut self) -> Result<MatchingResult, MatchError> {
        self.run_observed(|_| {})
    }

    /// Run to the stable fixed point, handing every step to `observer`.
    pub fn run_observed<F>(&mut self, mut observer: F) -> Result<MatchingResult, MatchError>
    where
        F: FnMut(&StepEvent),
    {
        while let Some(event) = self.step()? {
            observer(&event);
        }

        let result = self.result();
        info!(
            steps = self.steps,
            matched = result.matched_count(),
            unmatched = result.unmatched_count(),
            "matching complete"
        );
        Ok(result)
    }

    /// Snapshot of the current match lists and unmatched set.
    ///
    /// Final once [`is_done`](Self::is_done) holds.
    pub fn result(&self) -> MatchingResult {
        MatchingResult::assemble(
            &self.receivers,
            self.proposers.len(),
            &self.unmatched,
            self.steps,
        )
    }

    /// Check `result` for blocking pairs and individual-rationality
    /// violations against this engine's market.
    pub fn verify_result(&self, result: &MatchingResult) -> StabilityReport {
        stability::verify(&self.proposers, &self.receivers, result)
    }

    /// Advance a rejected or evicted proposer and put it back in play.
    fn release(&mut self, id: ProposerId) {
        if self.proposers[id.index()].advance().is_exhausted() {
            self.unmatched.push(id);
        } else {
            self.queue.push_back(id);
        }
    }
}

fn to_proposer_ids(row: &[i64]) -> Vec<ProposerId> {
    real_entries(row)
        .iter()
        .map(|&proposer| ProposerId(proposer as usize))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The three-proposer, two-receiver market with a cascade of evictions.
    fn cascade() -> PreferenceData {
        PreferenceData::new(
            vec![vec![0, 1], vec![0, 1], vec![1, 0]],
            vec![vec![1, 0, -1], vec![0, 1, 2]],
            vec![vec![2, -1, -1], vec![-1, -1, -1]],
            vec![1, 1],
        )
    }

    #[test]
    fn test_engine_new() {
        let engine = MatchingEngine::new(3, 2, &cascade()).unwrap();

        assert_eq!(engine.proposers().len(), 3);
        assert_eq!(engine.receivers().len(), 2);
        assert_eq!(
            engine.queued().collect::<Vec<_>>(),
            vec![ProposerId(0), ProposerId(1), ProposerId(2)]
        );
        assert_eq!(engine.steps(), 0);
        assert_eq!(engine.step_bound(), 6);
        assert!(!engine.is_done());
    }

    #[test]
    fn test_engine_rejects_invalid_input() {
        let err = MatchingEngine::new(4, 2, &cascade()).unwrap_err();
        assert!(matches!(err, MatchError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_step_trace() {
        let mut engine = MatchingEngine::new(3, 2, &cascade()).unwrap();

        let events: Vec<StepEvent> =
            std::iter::from_fn(|| engine.step().unwrap()).collect();

        assert_eq!(
            events,
            vec![
                StepEvent::Proposal {
                    proposer: ProposerId(0),
                    receiver: ReceiverId(0),
                    outcome: Outcome::AdmittedNoEviction,
                },
                StepEvent::Proposal {
                    proposer: ProposerId(1),
                    receiver: ReceiverId(0),
                    outcome: Outcome::AdmittedWithEviction(ProposerId(0)),
                },
                StepEvent::Proposal {
                    proposer: ProposerId(2),
                    receiver: ReceiverId(1),
                    outcome: Outcome::AdmittedNoEviction,
                },
                StepEvent::Proposal {
                    proposer: ProposerId(0),
                    receiver: ReceiverId(1),
                    outcome: Outcome::AdmittedWithEviction(ProposerId(2)),
                },
                StepEvent::Proposal {
                    proposer: ProposerId(2),
                    receiver: ReceiverId(0),
                    outcome: Outcome::Rejected,
                },
            ]
        );
        assert!(engine.is_done());
        assert_eq!(engine.unmatched(), &[ProposerId(2)]);
    }

    #[test]
    fn test_step_after_done_is_none() {
        let mut engine = MatchingEngine::new(3, 2, &cascade()).unwrap();
        engine.run().unwrap();

        assert_eq!(engine.step(), Ok(None));
        assert_eq!(engine.steps(), 5);
    }

    #[test]
    fn test_empty_list_exhausted_on_dequeue() {
        let data = PreferenceData::new(
            vec![vec![-1], vec![0]],
            vec![vec![0, 1]],
            vec![vec![]],
            vec![1],
        );
        let mut engine = MatchingEngine::new(2, 1, &data).unwrap();

        assert_eq!(engine.step_bound(), 2);
        assert_eq!(
            engine.step(),
            Ok(Some(StepEvent::Exhausted { proposer: ProposerId(0) }))
        );

        let result = engine.run().unwrap();
        assert_eq!(result.unmatched(), &[ProposerId(0)]);
        assert_eq!(result.matches(ReceiverId(0)), &[ProposerId(1)]);
    }

    #[test]
    fn test_all_empty_lists_terminate() {
        let data = PreferenceData::new(
            vec![vec![], vec![], vec![]],
            vec![vec![0]],
            vec![vec![]],
            vec![2],
        );
        let mut engine = MatchingEngine::new(3, 1, &data).unwrap();

        let result = engine.run().unwrap();
        assert_eq!(result.unmatched_count(), 3);
        assert_eq!(engine.steps(), 3);
    }

    #[test]
    fn test_fixed_step_limit_aborts() {
        let mut engine =
            MatchingEngine::with_config(3, 2, &cascade(), EngineConfig::with_step_limit(3)).unwrap();

        assert_eq!(
            engine.run(),
            Err(MatchError::IterationBoundExceeded { bound: 3 })
        );
        assert_eq!(engine.steps(), 3);
    }

    #[test]
    fn test_fixed_step_limit_exactly_enough() {
        let mut engine =
            MatchingEngine::with_config(3, 2, &cascade(), EngineConfig::with_step_limit(5)).unwrap();

        assert!(engine.run().is_ok());
    }

    #[test]
    fn test_run_observed_sees_every_step() {
        let mut engine = MatchingEngine::new(3, 2, &cascade()).unwrap();
        let mut seen = Vec::new();

        let result = engine.run_observed(|event| seen.push(*event)).unwrap();

        assert_eq!(seen.len(), result.steps());
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_verify_result_is_stable() {
        let mut engine = MatchingEngine::new(3, 2, &cascade()).unwrap();
        let result = engine.run().unwrap();

        assert!(engine.verify_result(&result).is_stable());
    }
}
