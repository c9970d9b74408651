//! Matching engine module.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same input and queue order always produce the same matching
//! 2. **Sequential Execution**: One proposal is evaluated at a time
//! 3. **Fail-Fast**: All validation happens at construction; runs are bounded
//! 4. **Proposer Optimality**: Every proposer gets its best stable receiver
//!
//! ## Matching Rules
//!
//! - Proposers propose in their own preference order and never revisit a receiver
//! - Receivers hold their best proposers up to capacity and release the worst
//! - Rejected and evicted proposers move on to their next choice
//! - A proposer with no choices left is unmatched
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::engine::MatchingEngine;
//! use deferred_acceptance::market::PreferenceData;
//! use deferred_acceptance::types::{ProposerId, ReceiverId};
//!
//! let data = PreferenceData::new(
//!     vec![vec![0, 1], vec![0, 1], vec![1, 0]],
//!     vec![vec![1, 0, -1], vec![0, 1, 2]],
//!     vec![vec![2, -1, -1], vec![-1, -1, -1]],
//!     vec![1, 1],
//! );
//!
//! let mut engine = MatchingEngine::new(3, 2, &data).unwrap();
//! let result = engine.run().unwrap();
//!
//! assert_eq!(result.matches(ReceiverId(0)), &[ProposerId(1)]);
//! assert_eq!(result.matches(ReceiverId(1)), &[ProposerId(0)]);
//! assert_eq!(result.unmatched(), &[ProposerId(2)]);
//! assert!(engine.verify_result(&result).is_stable());
//! ```

pub mod matcher;
pub mod result;
pub mod stability;

pub use matcher::{EngineConfig, MatchingEngine, StepLimit};
pub use result::MatchingResult;
pub use stability::{BlockingPair, RationalityViolation, StabilityReport};
