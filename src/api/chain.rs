use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::error::LedgerError;

/// Get the full chain (read-only snapshot for display).
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: ledger.len(),
        difficulty: ledger.difficulty(),
        chain: &ledger.chain,
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain: linkage, positional indexes and proofs.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let valid = ledger.verify_chain();
    if !valid {
        warn!("chain failed verification at height {}", ledger.len());
    }
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: ledger.len(),
    })
}

/// Mine a new block from the current pool:
/// - snapshot pending transactions and append the owner's reward
/// - search for a proof over the snapshot + previous block's hash
/// - append the sealed block and clear the pool
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.mine_block(&state.mining_cancel) {
        Ok(block) => {
            let resp = MineResponse {
                mined_index: block.index,
                hash: block.compute_hash(),
                proof: block.proof,
                transactions: block.transactions.len(),
            };
            info!(
                "MINER - sealed block #{} (hash={}, proof={})",
                resp.mined_index, resp.hash, resp.proof
            );
            HttpResponse::Ok().json(resp)
        }
        Err(err @ LedgerError::ChainCorrupted) => {
            warn!("MINER - refusing to extend a corrupted chain");
            HttpResponse::InternalServerError().body(err.to_string())
        }
        Err(err) => {
            warn!("MINER - {err}");
            HttpResponse::Conflict().body(err.to_string())
        }
    }
}
