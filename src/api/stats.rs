use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::MINING_REWARD;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(StatsResponse {
        height: ledger.len(),
        difficulty: ledger.difficulty(),
        pool_size: ledger.pool.len(),
        participants: ledger.participants.len(),
        mining_reward: MINING_REWARD,
        owner: ledger.owner().to_string(),
    })
}
