//! HTTP surface
//!
//! Node routes serve clients and neighbors; wallet routes belong to the
//! separate wallet server that signs on behalf of its users.

mod balance;
mod chain;
pub mod error;
mod mining;
mod tx;
pub mod wallet;

use actix_web::web::ServiceConfig;

pub use error::{json_config, run_blocking};
pub use wallet::WalletGateway;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(json_config())
        .service(chain::get_chain)
        .service(chain::resolve_conflicts)
        .service(tx::create_transaction)
        .service(tx::update_transaction)
        .service(tx::get_transactions)
        .service(tx::delete_transactions)
        .service(mining::mine)
        .service(mining::start_mining)
        .service(balance::get_amount);
}

pub fn init_wallet_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(json_config())
        .service(wallet::create_wallet)
        .service(wallet::sign_and_forward)
        .service(wallet::get_wallet_amount);
}
