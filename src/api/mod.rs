mod balance;
mod chain;
mod health;
pub mod models;
mod participants;
mod stats;
mod tamper;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pool)
            .service(tx::validate_pool)
            .service(balance::get_balance)
            .service(participants::list_participants)
            .service(stats::get_stats)
            .service(tamper::post_tamper),
    );
}
