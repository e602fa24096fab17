use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GENESIS_PROOF;
use crate::transaction::Transaction;

/// A single block in the chain holding an ordered list of transactions.
///
/// The record is exactly what gets hashed: field declaration order here is
/// the canonical serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub previous_hash: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
}

impl Block {
    /// The fixed first block. Its seed proof satisfies no difficulty
    /// predicate and is never checked; it only anchors block 1's linkage.
    pub fn genesis() -> Self {
        Self {
            previous_hash: String::new(),
            index: 0,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
        }
    }

    /// Compute the SHA-256 hash of this block over its canonical JSON
    /// encoding. Identical field values (including transaction order)
    /// always produce the same digest.
    pub fn compute_hash(&self) -> String {
        let encoded = serde_json::to_string(self).expect("serialize block");
        let mut hasher = Sha256::new();
        hasher.update(encoded.as_bytes());
        hex::encode(hasher.finalize())
    }
}
