// Wallet server: issues key pairs, signs transfers and forwards them to a gateway node

use super::error::run_blocking;
use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::network::messages::{
    AmountQuery, AmountResponse, MessageResponse, TransactionRequest, WalletResponse,
    WalletTransactionRequest,
};
use crate::network::PeerClient;
use crate::wallet::{PublicKey, Wallet};
use actix_web::{get, post, web, HttpResponse};
use log::{info, warn};
use std::sync::Arc;

pub struct WalletGateway {
    gateway: String, // host:port of the node transactions are forwarded to
    client: Arc<dyn PeerClient>,
}

impl WalletGateway {
    pub fn new(gateway: &str, client: Arc<dyn PeerClient>) -> WalletGateway {
        WalletGateway {
            gateway: gateway.to_string(),
            client,
        }
    }
}

#[post("/wallet")]
pub async fn create_wallet() -> Result<HttpResponse> {
    let wallet = Wallet::new()?;
    info!("POST /wallet - created {}", wallet.get_address());
    Ok(HttpResponse::Ok().json(WalletResponse::from(&wallet)))
}

/// Sign a transfer with the caller's key and hand it to the gateway node
#[post("/transactions")]
pub async fn sign_and_forward(
    state: web::Data<WalletGateway>,
    body: web::Json<WalletTransactionRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner().validate()?;

    let wallet = Wallet::from_private_key_hex(&request.private_key)
        .map_err(|_| BlockchainError::Authentication("Invalid private key".to_string()))?;
    let claimed = PublicKey::from_hex(&request.public_key)?;
    if &claimed != wallet.get_public_key() {
        warn!("POST /transactions - public key does not match private key");
        return Err(BlockchainError::Authentication(
            "Public key does not match private key".to_string(),
        ));
    }

    let tx = Transaction::new(&request.sender, &request.recipient, request.value);
    let signature = wallet.sign_transaction(&tx)?;
    let signed = TransactionRequest {
        sender_blockchain_address: Some(request.sender),
        recipient_blockchain_address: Some(request.recipient),
        sender_public_key: Some(wallet.get_public_key().to_string()),
        value: Some(request.value),
        signature: Some(signature.to_string()),
    };

    let state = state.into_inner();
    run_blocking(move || state.client.submit_transaction(&state.gateway, &signed)).await?;
    info!("POST /transactions - forwarded to gateway");
    Ok(HttpResponse::Created().json(MessageResponse::new("success")))
}

#[get("/wallet/amount")]
pub async fn get_wallet_amount(
    state: web::Data<WalletGateway>,
    query: web::Query<AmountQuery>,
) -> Result<HttpResponse> {
    let address = query
        .into_inner()
        .blockchain_address
        .ok_or_else(|| BlockchainError::NotFound("blockchain_address".to_string()))?;
    let state = state.into_inner();
    let amount = run_blocking(move || state.client.fetch_amount(&state.gateway, &address)).await?;
    Ok(HttpResponse::Ok().json(AmountResponse { amount }))
}
