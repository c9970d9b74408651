//! Match receipt for a completed run.
//!
//! The MatchReceipt summarizes a finished matching and carries a fingerprint
//! of the final assignment, so two runs can be compared without shipping
//! the full match lists around.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Receipt summarizing one completed matching run.
///
/// ## Result Root
///
/// The 32-byte result root is a SHA-256 hash of the canonical encoding of
/// the final assignment (see `MatchingResult::canonical_bytes`). Identical
/// inputs always produce identical roots.
///
/// ## Example
///
/// ```
/// use deferred_acceptance::types::MatchReceipt;
///
/// let receipt = MatchReceipt::new(
///     3,          // proposers
///     2,          // receivers
///     2,          // matched
///     1,          // unmatched
///     5,          // steps
///     [0u8; 32],  // result_root (would be computed)
/// );
/// assert!(!receipt.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MatchReceipt {
    /// Number of proposers in the market
    pub proposers: u64,

    /// Number of receivers in the market
    pub receivers: u64,

    /// Proposers held by some receiver at termination
    pub matched: u64,

    /// Proposers that exhausted their preference lists
    pub unmatched: u64,

    /// Engine steps taken to reach the fixed point
    pub steps: u64,

    /// SHA-256 of the canonical result encoding
    pub result_root: [u8; 32],
}

impl MatchReceipt {
    /// Create a new match receipt
    pub fn new(
        proposers: u64,
        receivers: u64,
        matched: u64,
        unmatched: u64,
        steps: u64,
        result_root: [u8; 32],
    ) -> Self {
        Self {
            proposers,
            receivers,
            matched,
            unmatched,
            steps,
            result_root,
        }
    }

    /// Compute SHA-256 hash of the given data
    pub fn compute_hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the result root as a hex string
    pub fn result_root_hex(&self) -> String {
        hex::encode(self.result_root)
    }

    /// True for a run over an empty proposer population
    pub fn is_empty(&self) -> bool {
        self.proposers == 0
    }

    /// Share of proposers that ended up matched, as a fixed-point decimal.
    ///
    /// Returns None if there were no proposers.
    pub fn match_rate(&self) -> Option<Decimal> {
        Decimal::from(self.matched).checked_div(Decimal::from(self.proposers))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_new() {
        let root = [1u8; 32];
        let receipt = MatchReceipt::new(8, 3, 7, 1, 11, root);

        assert_eq!(receipt.proposers, 8);
        assert_eq!(receipt.receivers, 3);
        assert_eq!(receipt.matched, 7);
        assert_eq!(receipt.unmatched, 1);
        assert_eq!(receipt.steps, 11);
        assert_eq!(receipt.result_root, root);
    }

    #[test]
    fn test_receipt_hash_determinism() {
        let hash1 = MatchReceipt::compute_hash(b"assignment");
        let hash2 = MatchReceipt::compute_hash(b"assignment");
        assert_eq!(hash1, hash2);

        let hash3 = MatchReceipt::compute_hash(b"other assignment");
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_receipt_result_root_hex() {
        let receipt = MatchReceipt::new(1, 1, 1, 0, 1, [0xAB; 32]);

        let hex = receipt.result_root_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("abab"));
    }

    #[test]
    fn test_receipt_match_rate() {
        let receipt = MatchReceipt::new(4, 2, 3, 1, 6, [0u8; 32]);
        assert_eq!(receipt.match_rate(), Some(Decimal::new(75, 2)));

        let empty = MatchReceipt::default();
        assert!(empty.is_empty());
        assert_eq!(empty.match_rate(), None);
    }

    #[test]
    fn test_receipt_deterministic_serialization() {
        let receipt = MatchReceipt::new(8, 3, 7, 1, 11, [0xCD; 32]);

        let bytes1 = ssz_rs::serialize(&receipt).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&receipt).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2, "SSZ serialization must be deterministic");
    }

    #[test]
    fn test_receipt_ssz_size() {
        let receipt = MatchReceipt::default();
        let bytes = ssz_rs::serialize(&receipt).expect("Failed to serialize");

        // 5 * 8 + 32 = 72 bytes
        assert_eq!(bytes.len(), 72, "MatchReceipt should serialize to 72 bytes");
    }

    #[test]
    fn test_receipt_ssz_roundtrip() {
        let receipt = MatchReceipt::new(8, 3, 7, 1, 11, [0x11; 32]);

        let serialized = ssz_rs::serialize(&receipt).expect("Failed to serialize");
        let deserialized: MatchReceipt =
            ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(receipt, deserialized);
    }
}
