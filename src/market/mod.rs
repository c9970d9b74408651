//! Market model: the two populations and the input contract they are
//! built from.
//!
//! ## Components
//!
//! - [`PreferenceData`]: normalized raw tables plus eager validation
//! - [`RankingTable`]: a receiver's O(1) proposer-to-rank lookup
//! - [`Proposer`]: preference list plus a forward-only pointer
//! - [`Receiver`]: capacity, ranking and the sorted tentative match list
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::market::{RankingTable, Receiver};
//! use deferred_acceptance::types::{Outcome, ProposerId, ReceiverId};
//!
//! let ranking = RankingTable::build(3, &[ProposerId(1), ProposerId(0)], &[ProposerId(2)]);
//! let mut school = Receiver::new(ReceiverId(0), 1, ranking);
//!
//! assert_eq!(school.evaluate(ProposerId(0)), Outcome::AdmittedNoEviction);
//! assert_eq!(school.evaluate(ProposerId(1)), Outcome::AdmittedWithEviction(ProposerId(0)));
//! assert_eq!(school.evaluate(ProposerId(2)), Outcome::Rejected);
//! ```

pub mod input;
pub mod proposer;
pub mod ranking;
pub mod receiver;

pub use input::{PreferenceData, END_OF_LIST};
pub use proposer::{Proposer, ProposerState};
pub use ranking::{Rank, RankingTable};
pub use receiver::Receiver;
