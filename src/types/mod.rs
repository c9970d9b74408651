//! Core data types for the matching engine
//!
//! ## Types
//!
//! - [`ProposerId`], [`ReceiverId`]: typed agent identities (0-based)
//! - [`Outcome`]: a receiver's answer to one proposal
//! - [`StepEvent`]: what one engine step did
//! - [`MatchReceipt`]: fingerprinted summary of a completed run

mod ids;
mod outcome;
mod receipt;

// Re-export all types at module level
pub use ids::{ProposerId, ReceiverId};
pub use outcome::{Outcome, StepEvent};
pub use receipt::MatchReceipt;
