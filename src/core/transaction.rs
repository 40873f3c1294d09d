// This file implements the transaction record - the unit of value moving between addresses
// A transaction is an account-style transfer: who pays, who receives, and how much
// Balances are never stored, I derive them by replaying the whole chain

use crate::error::Result;
use crate::utils::{sha256_digest, to_canonical_json};
use serde::{Deserialize, Serialize};

// The reserved sender I use for protocol-issued mining rewards
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";

// The field names here are the wire names, and the declaration order is the
// canonical order used for hashing and signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "sender_blockchain_address")]
    sender: String, // Address of the payer, or MINING_SENDER for rewards
    #[serde(rename = "recipient_blockchain_address")]
    recipient: String, // Address of the payee
    value: f64, // Amount transferred
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, value: f64) -> Transaction {
        Transaction {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            value,
        }
    }

    // When I mint the reward for sealing a block
    pub fn new_reward_tx(recipient: &str, reward: f64) -> Transaction {
        Transaction::new(MINING_SENDER, recipient, reward)
    }

    /// Reward transactions skip signature verification
    pub fn is_reward(&self) -> bool {
        self.sender == MINING_SENDER
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_value(&self) -> f64 {
        self.value
    }

    /// Canonical serialized form, the bytes that get signed
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        to_canonical_json(self)
    }

    /// SHA-256 of the canonical form
    pub fn digest(&self) -> Result<Vec<u8>> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}
