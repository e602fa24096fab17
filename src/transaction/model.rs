use serde::{Deserialize, Serialize};

use crate::blockchain::{MINING_REWARD, REWARD_SENDER};
use crate::error::{LedgerError, Result};

/// A single value transfer between two named participants.
///
/// Immutable once created. Order within a block is insertion order and is
/// semantically significant: it is part of what gets hashed and proved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    /// Build a transaction. Negative, NaN or infinite amounts are rejected
    /// here so no later arithmetic ever sees a bad amount.
    pub fn new(sender: &str, recipient: &str, amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        })
    }

    /// The fixed subsidy paid to `recipient` when a block is sealed.
    pub fn reward(recipient: &str) -> Self {
        Self {
            sender: REWARD_SENDER.to_string(),
            recipient: recipient.to_string(),
            amount: MINING_REWARD,
        }
    }

    /// True when this transaction carries the reward sender marker.
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}
