//! JSON bodies exchanged between wallets, nodes and their neighbors
//!
//! Requests arrive with every field optional so that a missing field turns
//! into a field-error map instead of a parse failure.

use crate::core::{Block, Transaction};
use crate::error::{BlockchainError, Result, MISSING_VALUE};
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INVALID_VALUE: &str = "invalid value";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
}

/// `POST`/`PUT /transactions` body as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender_blockchain_address: Option<String>,
    pub recipient_blockchain_address: Option<String>,
    pub sender_public_key: Option<String>,
    pub value: Option<f64>,
    pub signature: Option<String>,
}

/// A transaction request with every field present
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub sender: String,
    pub recipient: String,
    pub public_key: String,
    pub value: f64,
    pub signature: String,
}

impl TransactionRequest {
    pub fn validate(&self) -> Result<ValidatedTransaction> {
        let mut missing = vec![];
        if self.sender_blockchain_address.is_none() {
            missing.push("sender_blockchain_address");
        }
        if self.recipient_blockchain_address.is_none() {
            missing.push("recipient_blockchain_address");
        }
        if self.sender_public_key.is_none() {
            missing.push("sender_public_key");
        }
        if self.value.is_none() {
            missing.push("value");
        }
        if self.signature.is_none() {
            missing.push("signature");
        }

        match (
            &self.sender_blockchain_address,
            &self.recipient_blockchain_address,
            &self.sender_public_key,
            self.value,
            &self.signature,
        ) {
            (Some(sender), Some(recipient), Some(public_key), Some(value), Some(signature)) => {
                Ok(ValidatedTransaction {
                    sender: sender.clone(),
                    recipient: recipient.clone(),
                    public_key: public_key.clone(),
                    value,
                    signature: signature.clone(),
                })
            }
            _ => Err(BlockchainError::missing_fields(missing)),
        }
    }
}

impl From<&ValidatedTransaction> for TransactionRequest {
    fn from(tx: &ValidatedTransaction) -> Self {
        TransactionRequest {
            sender_blockchain_address: Some(tx.sender.clone()),
            recipient_blockchain_address: Some(tx.recipient.clone()),
            sender_public_key: Some(tx.public_key.clone()),
            value: Some(tx.value),
            signature: Some(tx.signature.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTransactionResponse {
    pub transaction: TransactionRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPoolResponse {
    pub transactions: Vec<Transaction>,
    pub length: usize,
}

impl From<Vec<Transaction>> for TransactionPoolResponse {
    fn from(transactions: Vec<Transaction>) -> Self {
        TransactionPoolResponse {
            length: transactions.len(),
            transactions,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmountQuery {
    pub blockchain_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountResponse {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResponse {
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Wallet as handed to its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub private_key: String,
    pub public_key: String,
    pub blockchain_address: String,
}

impl From<&Wallet> for WalletResponse {
    fn from(wallet: &Wallet) -> Self {
        WalletResponse {
            private_key: wallet.get_private_key_hex(),
            public_key: wallet.get_public_key().to_string(),
            blockchain_address: wallet.get_address(),
        }
    }
}

/// Wallet-server `POST /transactions` body; `value` is typed in by a person
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletTransactionRequest {
    pub sender_private_key: Option<String>,
    pub sender_public_key: Option<String>,
    pub sender_blockchain_address: Option<String>,
    pub recipient_blockchain_address: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWalletTransaction {
    pub private_key: String,
    pub public_key: String,
    pub sender: String,
    pub recipient: String,
    pub value: f64,
}

impl WalletTransactionRequest {
    pub fn validate(&self) -> Result<ValidatedWalletTransaction> {
        let mut errors = BTreeMap::new();
        let mut require = |name: &str, field: &Option<String>| -> Option<String> {
            if field.is_none() {
                errors.insert(name.to_string(), MISSING_VALUE.to_string());
            }
            field.clone()
        };
        let private_key = require("sender_private_key", &self.sender_private_key);
        let public_key = require("sender_public_key", &self.sender_public_key);
        let sender = require("sender_blockchain_address", &self.sender_blockchain_address);
        let recipient = require("recipient_blockchain_address", &self.recipient_blockchain_address);
        let raw_value = require("value", &self.value);

        let value = raw_value.and_then(|raw| match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                errors.insert("value".to_string(), INVALID_VALUE.to_string());
                None
            }
        });

        match (private_key, public_key, sender, recipient, value) {
            (Some(private_key), Some(public_key), Some(sender), Some(recipient), Some(value)) => {
                Ok(ValidatedWalletTransaction {
                    private_key,
                    public_key,
                    sender,
                    recipient,
                    value,
                })
            }
            _ => Err(BlockchainError::Validation(errors)),
        }
    }
}
