use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ParticipantsResponse};

/// List every name that has ever appeared as sender or recipient.
#[get("/participants/")]
pub async fn list_participants(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let mut participants: Vec<String> = ledger.participants.iter().cloned().collect();
    participants.sort();

    HttpResponse::Ok().json(ParticipantsResponse {
        count: participants.len(),
        participants,
    })
}
