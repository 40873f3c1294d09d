use super::error::run_blocking;
use crate::error::{BlockchainError, Result};
use crate::network::messages::{
    CreatedTransactionResponse, MessageResponse, SuccessResponse, TransactionPoolResponse,
    TransactionRequest,
};
use crate::network::Node;
use actix_web::{delete, get, post, put, web, HttpResponse};
use log::{info, warn};

fn rejected() -> BlockchainError {
    BlockchainError::Authentication("Transaction signature does not verify".to_string())
}

/// Client submission: admitted transactions are relayed to every neighbor
#[post("/transactions")]
pub async fn create_transaction(
    node: web::Data<Node>,
    body: web::Json<TransactionRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let node = node.into_inner();
    let submitted = request.clone();
    let accepted = run_blocking(move || node.create_transaction(&submitted)).await?;
    if !accepted {
        warn!("POST /transactions - rejected");
        return Err(rejected());
    }
    info!("POST /transactions - accepted");
    Ok(HttpResponse::Created().json(CreatedTransactionResponse {
        transaction: request,
    }))
}

/// Neighbor relay: same admission, no further relay
#[put("/transactions")]
pub async fn update_transaction(
    node: web::Data<Node>,
    body: web::Json<TransactionRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    if !node.admit_transaction(&request)? {
        warn!("PUT /transactions - rejected");
        return Err(rejected());
    }
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

#[get("/transactions")]
pub async fn get_transactions(node: web::Data<Node>) -> Result<HttpResponse> {
    let pool = node.get_ledger().transaction_pool()?;
    Ok(HttpResponse::Ok().json(TransactionPoolResponse::from(pool)))
}

#[delete("/transactions")]
pub async fn delete_transactions(node: web::Data<Node>) -> Result<HttpResponse> {
    node.get_ledger().clear_transaction_pool()?;
    info!("DELETE /transactions - pool cleared");
    Ok(HttpResponse::Ok().json(MessageResponse::new("success")))
}
