use crate::core::{Block, BlockHash, Transaction};
use crate::error::{BlockchainError, Result};
use data_encoding::HEXLOWER;
use log::debug;

const MAX_NONCE: u64 = u64::MAX;

/// Brute-force nonce search against a leading-zero hex difficulty
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    pub fn new_proof_of_work(difficulty: usize) -> ProofOfWork {
        ProofOfWork { difficulty }
    }

    pub fn get_difficulty(&self) -> usize {
        self.difficulty
    }

    /// Search nonces from zero. The trial block carries the same timestamp
    /// the sealed block will be stored with, so the stored block proves itself.
    pub fn find_nonce(
        &self,
        timestamp: i64,
        previous_hash: &BlockHash,
        transactions: &[Transaction],
    ) -> Result<u64> {
        let mut trial = Block::new_block(timestamp, 0, *previous_hash, transactions.to_vec());
        let mut nonce = 0;
        loop {
            let hash = trial.hash()?;
            if meets_difficulty(&hash, self.difficulty) {
                debug!("Found nonce {nonce} for {}", HEXLOWER.encode(&hash));
                return Ok(nonce);
            }
            if nonce == MAX_NONCE {
                return Err(BlockchainError::Mining(
                    "Nonce space exhausted".to_string(),
                ));
            }
            nonce += 1;
            trial.set_nonce(nonce);
        }
    }

    /// Check a sealed block against this difficulty
    pub fn validate(&self, block: &Block) -> Result<bool> {
        Ok(meets_difficulty(&block.hash()?, self.difficulty))
    }
}

/// True when the hex form of `hash` starts with `difficulty` '0' characters
pub fn meets_difficulty(hash: &BlockHash, difficulty: usize) -> bool {
    let hex = HEXLOWER.encode(hash);
    difficulty <= hex.len() && hex.bytes().take(difficulty).all(|c| c == b'0')
}
