// Outbound HTTP traffic to neighbor nodes
// Every call is blocking and bounded by the client timeout, so callers run it
// off the async executor (background threads or web::block)

use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::network::messages::{AmountResponse, ChainResponse, ConsensusResponse, TransactionRequest};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

/// What a node needs from its neighbors. Failures come back as
/// `BlockchainError::PeerUnreachable` and callers decide whether they matter.
pub trait PeerClient: Send + Sync {
    /// `GET /chain`
    fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>>;

    /// `PUT /transactions`, admission without relay
    fn relay_transaction(&self, peer: &str, request: &TransactionRequest) -> Result<()>;

    /// `POST /transactions`, expects 201 Created
    fn submit_transaction(&self, peer: &str, request: &TransactionRequest) -> Result<()>;

    /// `DELETE /transactions`
    fn clear_transaction_pool(&self, peer: &str) -> Result<()>;

    /// `PUT /consensus`, returns whether the peer replaced its chain
    fn request_consensus(&self, peer: &str) -> Result<bool>;

    /// `GET /amount?blockchain_address=`
    fn fetch_amount(&self, peer: &str, address: &str) -> Result<f64>;
}

pub struct HttpPeerClient {
    client: Client,
}

impl HttpPeerClient {
    /// Build a client whose every request gives up after `timeout`.
    /// Must not be called from inside an async runtime.
    pub fn new(timeout: Duration) -> Result<HttpPeerClient> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BlockchainError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(HttpPeerClient { client })
    }

    fn expect_status(peer: &str, response: Response, expected: StatusCode) -> Result<Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(BlockchainError::Authentication(format!(
                "Peer {peer} rejected the transaction"
            )));
        }
        Err(BlockchainError::peer_unreachable(
            peer,
            format!("unexpected status {status}"),
        ))
    }
}

fn url(peer: &str, path: &str) -> String {
    format!("http://{peer}{path}")
}

impl PeerClient for HttpPeerClient {
    fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>> {
        let response = self
            .client
            .get(url(peer, "/chain"))
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        let response = Self::expect_status(peer, response, StatusCode::OK)?;
        let body: ChainResponse = response
            .json()
            .map_err(|e| BlockchainError::peer_unreachable(peer, format!("bad chain body: {e}")))?;
        debug!("Fetched chain of length {} from {peer}", body.chain.len());
        Ok(body.chain)
    }

    fn relay_transaction(&self, peer: &str, request: &TransactionRequest) -> Result<()> {
        let response = self
            .client
            .put(url(peer, "/transactions"))
            .json(request)
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        Self::expect_status(peer, response, StatusCode::OK)?;
        Ok(())
    }

    fn submit_transaction(&self, peer: &str, request: &TransactionRequest) -> Result<()> {
        let response = self
            .client
            .post(url(peer, "/transactions"))
            .json(request)
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        Self::expect_status(peer, response, StatusCode::CREATED)?;
        Ok(())
    }

    fn clear_transaction_pool(&self, peer: &str) -> Result<()> {
        let response = self
            .client
            .delete(url(peer, "/transactions"))
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        Self::expect_status(peer, response, StatusCode::OK)?;
        Ok(())
    }

    fn request_consensus(&self, peer: &str) -> Result<bool> {
        let response = self
            .client
            .put(url(peer, "/consensus"))
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        let response = Self::expect_status(peer, response, StatusCode::OK)?;
        let body: ConsensusResponse = response
            .json()
            .map_err(|e| BlockchainError::peer_unreachable(peer, format!("bad consensus body: {e}")))?;
        Ok(body.resolved)
    }

    fn fetch_amount(&self, peer: &str, address: &str) -> Result<f64> {
        let response = self
            .client
            .get(url(peer, "/amount"))
            .query(&[("blockchain_address", address)])
            .send()
            .map_err(|e| BlockchainError::peer_unreachable(peer, e))?;
        let response = Self::expect_status(peer, response, StatusCode::OK)?;
        let body: AmountResponse = response
            .json()
            .map_err(|e| BlockchainError::peer_unreachable(peer, format!("bad amount body: {e}")))?;
        Ok(body.amount)
    }
}
