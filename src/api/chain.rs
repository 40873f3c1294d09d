use super::error::run_blocking;
use crate::error::Result;
use crate::network::messages::{ChainResponse, ConsensusResponse};
use crate::network::Node;
use actix_web::{get, put, web, HttpResponse};
use log::info;

/// Full chain, as neighbors fetch it during conflict resolution
#[get("/chain")]
pub async fn get_chain(node: web::Data<Node>) -> Result<HttpResponse> {
    let chain = node.get_ledger().chain()?;
    Ok(HttpResponse::Ok().json(ChainResponse { chain }))
}

#[put("/consensus")]
pub async fn resolve_conflicts(node: web::Data<Node>) -> Result<HttpResponse> {
    let node = node.into_inner();
    let resolved = run_blocking(move || node.resolve_conflicts()).await?;
    info!("PUT /consensus - resolved={resolved}");
    Ok(HttpResponse::Ok().json(ConsensusResponse { resolved }))
}
