use super::error::run_blocking;
use crate::error::Result;
use crate::network::messages::MessageResponse;
use crate::network::Node;
use actix_web::{get, web, HttpResponse};
use log::info;
use serde_json::json;

/// One mining cycle on demand
#[get("/mine")]
pub async fn mine(node: web::Data<Node>) -> Result<HttpResponse> {
    let node = node.into_inner();
    if run_blocking(move || node.mine()).await? {
        info!("GET /mine - block sealed");
        Ok(HttpResponse::Ok().json(MessageResponse::new("mining succeeded")))
    } else {
        Ok(HttpResponse::BadRequest().json(json!({ "error": "nothing to mine" })))
    }
}

#[get("/mine/start")]
pub async fn start_mining(node: web::Data<Node>) -> Result<HttpResponse> {
    let started = node.into_inner().start_mining()?;
    info!("GET /mine/start - started={started}");
    Ok(HttpResponse::Ok().json(MessageResponse::new("mining started")))
}
