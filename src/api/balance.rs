use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, BalanceResponse};

/// Effective balance of a participant over the chain plus the pool.
#[get("/balance/{participant}/")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let participant = path.into_inner().0;

    let balance = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.get_balance(&participant)
    };

    HttpResponse::Ok().json(BalanceResponse {
        participant,
        balance,
    })
}
