use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, hex_digest, sha256_digest, to_canonical_json};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// SHA-256 digest of a block's canonical serialization
pub type BlockHash = [u8; 32];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    timestamp: i64, // Nanoseconds since the Unix epoch
    nonce: u64,
    #[serde(rename = "previousHash", with = "hex_digest")]
    previous_hash: BlockHash,
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new_block(
        timestamp: i64,
        nonce: u64,
        previous_hash: BlockHash,
        transactions: Vec<Transaction>,
    ) -> Block {
        Block {
            timestamp,
            nonce,
            previous_hash,
            transactions,
        }
    }

    /// The all-zero block whose hash anchors the genesis block
    pub fn empty() -> Block {
        Block::new_block(0, 0, [0u8; 32], vec![])
    }

    pub fn generate_genesis_block() -> Result<Block> {
        let previous_hash = Block::empty().hash()?;
        Ok(Block::new_block(
            current_timestamp()?,
            0,
            previous_hash,
            vec![],
        ))
    }

    pub fn hash(&self) -> Result<BlockHash> {
        let bytes = to_canonical_json(self)?;
        let digest = sha256_digest(&bytes);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }

    pub fn hash_hex(&self) -> Result<String> {
        Ok(HEXLOWER.encode(&self.hash()?))
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_previous_hash(&self) -> &BlockHash {
        &self.previous_hash
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }
}
