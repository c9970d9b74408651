//! # Deferred Acceptance
//!
//! Proposer-optimal many-to-one stable matching with receiver capacities.
//!
//! ## Architecture
//!
//! The crate consists of:
//! - **Types**: Identities, proposal outcomes and the run receipt
//! - **Market**: Input tables, proposers, receivers and ranking tables
//! - **Engine**: The proposal loop, the result view and stability checks
//! - **Loader**: CSV tables on disk and the built-in sample market
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical input always yields the identical matching
//! 2. **Eager Validation**: Malformed input is rejected before any proposal
//! 3. **Bounded Runs**: A run never exceeds `proposers * longest list` steps
//! 4. **No Floating Point**: Rates are fixed-point decimals
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::{embedded_sample, MatchingEngine};
//! use deferred_acceptance::types::{ProposerId, ReceiverId};
//!
//! let data = embedded_sample();
//! let mut engine = MatchingEngine::new(8, 3, &data).unwrap();
//! let result = engine.run().unwrap();
//!
//! assert_eq!(result.matches(ReceiverId(0)), &[ProposerId(0), ProposerId(1)]);
//! assert_eq!(result.unmatched(), &[ProposerId(7)]);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: ids, outcomes, receipts
pub mod types;

/// Market model: input tables, proposers, receivers
pub mod market;

/// Matching engine: deferred acceptance with capacities
pub mod engine;

/// CSV loading and the sample market
pub mod loader;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{EngineConfig, MatchingEngine, MatchingResult, StabilityReport, StepLimit};
pub use error::{LoadError, MatchError};
pub use loader::{embedded_sample, load_files, DataFiles, IndexBase};
pub use market::PreferenceData;
pub use types::{MatchReceipt, Outcome, ProposerId, ReceiverId, StepEvent};
