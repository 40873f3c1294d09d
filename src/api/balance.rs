use crate::error::{BlockchainError, Result};
use crate::network::messages::{AmountQuery, AmountResponse};
use crate::network::Node;
use actix_web::{get, web, HttpResponse};

/// Balance of an address, replayed over the whole chain
#[get("/amount")]
pub async fn get_amount(
    node: web::Data<Node>,
    query: web::Query<AmountQuery>,
) -> Result<HttpResponse> {
    let address = query
        .into_inner()
        .blockchain_address
        .ok_or_else(|| BlockchainError::NotFound("blockchain_address".to_string()))?;
    let amount = node.get_ledger().calculate_total_amount(&address)?;
    Ok(HttpResponse::Ok().json(AmountResponse { amount }))
}
