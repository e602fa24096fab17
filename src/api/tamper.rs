use actix_web::{HttpResponse, Responder, post, web};
use log::warn;

use super::models::{AppState, TamperRequest, TamperResponse};
use crate::transaction::Transaction;

/// DEV tamper: overwrite a committed block's transactions in place.
/// This exists to demonstrate tamper detection; `/validate/` should flip
/// to false afterwards. Never expose outside local experiments.
#[post("/tamper/")]
pub async fn post_tamper(
    state: web::Data<AppState>,
    body: web::Json<TamperRequest>,
) -> impl Responder {
    let forged = match Transaction::new(&body.sender, &body.recipient, body.amount) {
        Ok(tx) => tx,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    if body.index >= ledger.len() {
        return HttpResponse::BadRequest().body("block index out of range");
    }

    ledger.chain[body.index].transactions = vec![forged];
    let chain_valid = ledger.verify_chain();
    warn!(
        "TAMPER - overwrote block #{}; chain valid={}",
        body.index, chain_valid
    );

    HttpResponse::Ok().json(TamperResponse {
        index: body.index,
        chain_valid,
    })
}
