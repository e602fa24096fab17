use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// Cooperative cancellation flag for a running proof search. Clone it,
/// hand one side to the miner and keep the other to abort from outside.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// True iff `proof` satisfies the difficulty predicate: the SHA-256 digest
/// over the canonical transaction encoding, the previous block's hash and
/// the decimal proof must start with `difficulty` zero hex characters.
///
/// Mining and chain verification both go through this predicate, so block
/// creation and re-validation always agree on pass/fail.
pub fn valid_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    proof: u64,
    difficulty: u32,
) -> bool {
    let txs = serde_json::to_string(transactions).expect("serialize transactions");
    let mut hasher = Sha256::new();
    hasher.update(txs.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(proof.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());

    let target_prefix = "0".repeat(difficulty as usize);
    digest.starts_with(&target_prefix)
}

/// Linear search for the first proof accepted by `valid_proof`.
///
/// The search is CPU-bound and synchronous. `cancel` is checked on every
/// iteration and `step_limit` caps the number of candidates, so a
/// misconfigured difficulty cannot hang the process; either exit returns
/// `MiningFailed` and leaves the caller's state untouched.
pub fn find_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    difficulty: u32,
    step_limit: Option<u64>,
    cancel: &CancelFlag,
) -> Result<u64> {
    let mut proof: u64 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(LedgerError::MiningFailed("cancelled".to_string()));
        }
        if let Some(limit) = step_limit {
            if proof >= limit {
                return Err(LedgerError::MiningFailed(format!(
                    "no proof within {limit} candidates"
                )));
            }
        }
        if valid_proof(transactions, previous_hash, proof, difficulty) {
            return Ok(proof);
        }
        proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelFlag, find_proof, valid_proof};
    use crate::error::LedgerError;
    use crate::transaction::Transaction;

    fn txs() -> Vec<Transaction> {
        vec![
            Transaction::new("a", "b", 1.5).unwrap(),
            Transaction::new("b", "c", 0.5).unwrap(),
        ]
    }

    #[test]
    fn found_proof_satisfies_the_predicate() {
        let cancel = CancelFlag::new();
        let proof = find_proof(&txs(), "prev-hash", 2, None, &cancel).unwrap();
        assert!(valid_proof(&txs(), "prev-hash", proof, 2));
    }

    #[test]
    fn empty_transaction_set_is_minable() {
        let cancel = CancelFlag::new();
        let proof = find_proof(&[], "", 2, None, &cancel).unwrap();
        assert!(valid_proof(&[], "", proof, 2));
    }

    #[test]
    fn zero_difficulty_accepts_the_first_candidate() {
        let cancel = CancelFlag::new();
        assert_eq!(find_proof(&txs(), "prev", 0, None, &cancel).unwrap(), 0);
    }

    #[test]
    fn cancellation_aborts_the_search() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = find_proof(&txs(), "prev", 2, None, &cancel).unwrap_err();
        assert!(matches!(err, LedgerError::MiningFailed(_)));
    }

    #[test]
    fn step_limit_bounds_an_unsatisfiable_search() {
        let cancel = CancelFlag::new();
        // a 64-zero prefix would require the all-zero digest
        let err = find_proof(&txs(), "prev", 64, Some(1_000), &cancel).unwrap_err();
        assert!(matches!(err, LedgerError::MiningFailed(_)));
    }
}
