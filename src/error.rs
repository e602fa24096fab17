use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("amount must be a non-negative, finite number")]
    InvalidAmount,

    #[error("insufficient funds: {sender} holds {balance} but tried to send {amount}")]
    InsufficientFunds {
        sender: String,
        balance: f64,
        amount: f64,
    },

    #[error("mining failed: {0}")]
    MiningFailed(String),

    #[error("chain integrity check failed")]
    ChainCorrupted,
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
