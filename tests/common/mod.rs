//! Shared helpers for the integration tests
#![allow(dead_code)]

use pow_ledger::core::meets_difficulty;
use pow_ledger::network::messages::TransactionRequest;
use pow_ledger::{Block, BlockchainError, Ledger, PeerClient, Result, Wallet, MINING_SENDER};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory neighbors: each known peer serves a fixed chain, everything
/// else is unreachable. Outgoing calls are recorded.
#[derive(Default)]
pub struct StubPeerClient {
    pub chains: HashMap<String, Vec<Block>>,
    pub amount: f64,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<TransactionRequest>>,
}

impl StubPeerClient {
    pub fn with_chain(mut self, peer: &str, chain: Vec<Block>) -> Self {
        self.chains.insert(peer.to_string(), chain);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PeerClient for StubPeerClient {
    fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>> {
        self.record(format!("GET {peer}/chain"));
        self.chains
            .get(peer)
            .cloned()
            .ok_or_else(|| BlockchainError::peer_unreachable(peer, "connection refused"))
    }

    fn relay_transaction(&self, peer: &str, _request: &TransactionRequest) -> Result<()> {
        self.record(format!("PUT {peer}/transactions"));
        Ok(())
    }

    fn submit_transaction(&self, peer: &str, request: &TransactionRequest) -> Result<()> {
        self.record(format!("POST {peer}/transactions"));
        self.submitted.lock().unwrap().push(request.clone());
        Ok(())
    }

    fn clear_transaction_pool(&self, peer: &str) -> Result<()> {
        self.record(format!("DELETE {peer}/transactions"));
        Ok(())
    }

    fn request_consensus(&self, peer: &str) -> Result<bool> {
        self.record(format!("PUT {peer}/consensus"));
        Ok(false)
    }

    fn fetch_amount(&self, peer: &str, address: &str) -> Result<f64> {
        self.record(format!("GET {peer}/amount?blockchain_address={address}"));
        Ok(self.amount)
    }
}

/// Submit a transaction signed by `wallet`
pub fn submit_signed(ledger: &Ledger, wallet: &Wallet, recipient: &str, value: f64) -> bool {
    let tx = pow_ledger::Transaction::new(&wallet.get_address(), recipient, value);
    let signature = wallet.sign_transaction(&tx).unwrap();
    ledger
        .submit_transaction(
            &wallet.get_address(),
            recipient,
            value,
            Some(wallet.get_public_key()),
            Some(&signature),
        )
        .unwrap()
}

/// A chain of `len` blocks that really did the work at `difficulty`
pub fn mined_chain(len: usize, difficulty: usize) -> Vec<Block> {
    let ledger = Ledger::new("peer-miner", difficulty).unwrap();
    for _ in 1..len {
        ledger
            .submit_transaction(MINING_SENDER, "someone", 1.0, None, None)
            .unwrap();
        assert!(ledger.mine().unwrap());
    }
    ledger.chain().unwrap()
}

/// A correctly linked chain of `len` blocks none of which meets `difficulty`
pub fn unworked_chain(len: usize, difficulty: usize) -> Vec<Block> {
    let mut chain = vec![Block::generate_genesis_block().unwrap()];
    while chain.len() < len {
        let previous = chain.last().unwrap().hash().unwrap();
        let txs = vec![pow_ledger::Transaction::new_reward_tx("forger", 100.0)];
        let block = (0u64..)
            .map(|nonce| Block::new_block(chain.len() as i64, nonce, previous, txs.clone()))
            .find(|block| !meets_difficulty(&block.hash().unwrap(), difficulty))
            .unwrap();
        chain.push(block);
    }
    chain
}

/// Rewrite the previous hash of `chain[index]` so the link to its predecessor breaks
pub fn break_link(chain: &mut [Block], index: usize) {
    let broken = {
        let block = &chain[index];
        Block::new_block(
            block.get_timestamp(),
            block.get_nonce(),
            [0xaa; 32],
            block.get_transactions().to_vec(),
        )
    };
    chain[index] = broken;
}
