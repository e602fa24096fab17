use crate::blockchain::{Block, CancelFlag, DEFAULT_DIFFICULTY, Ledger};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: the whole mutable ledger (chain + pool +
/// participant registry) behind one lock, so drain+append stays atomic
/// and balance queries never observe a half-applied block.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub mining_cancel: CancelFlag,
}

impl AppState {
    pub fn new(owner: &str, difficulty: u32) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(owner, difficulty)),
            mining_cancel: CancelFlag::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("operator", DEFAULT_DIFFICULTY)
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub mined_index: u64,
    pub hash: String,
    pub proof: u64,
    pub transactions: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub accepted: bool,
    pub pool_size: usize,
}

#[derive(Serialize)]
pub struct PoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

#[derive(Serialize)]
pub struct PoolValidateResponse {
    pub valid: bool,
    pub size: usize,
}

/* ---------- Participant / Balance API Models ---------- */

#[derive(Serialize)]
pub struct ParticipantsResponse {
    pub count: usize,
    pub participants: Vec<String>,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub participant: String,
    pub balance: f64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub pool_size: usize,
    pub participants: usize,
    pub mining_reward: f64,
    pub owner: String,
}

/* ---------- Tamper API Models (dev) ---------- */

#[derive(Deserialize)]
pub struct TamperRequest {
    pub index: usize,
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct TamperResponse {
    pub index: usize,
    pub chain_valid: bool,
}
