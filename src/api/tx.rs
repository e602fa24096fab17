use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PoolResponse, PoolValidateResponse};

/// Submit a new transaction into the pool (with balance validation).
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.submit_transaction(&body.sender, &body.recipient, body.amount) {
        Ok(()) => {
            debug!(
                "POST /tx/ - accepted {} -> {} ({}), pool size {}",
                body.sender,
                body.recipient,
                body.amount,
                ledger.pool.len()
            );
            HttpResponse::Ok().json(NewTxResponse {
                accepted: true,
                pool_size: ledger.pool.len(),
            })
        }
        Err(err) => {
            warn!(
                "POST /tx/ - rejected {} -> {}: {}",
                body.sender, body.recipient, err
            );
            HttpResponse::BadRequest().body(err.to_string())
        }
    }
}

/// List the pending-transaction pool.
#[get("/pool/")]
pub async fn get_pool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PoolResponse {
        size: ledger.pool.len(),
        transactions: ledger.pool.clone(),
    })
}

/// Re-check that every pooled transaction is still affordable against the
/// current chain + pool.
#[get("/pool/validate/")]
pub async fn validate_pool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PoolValidateResponse {
        valid: ledger.verify_pool(),
        size: ledger.pool.len(),
    })
}
