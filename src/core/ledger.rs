// This is the ledger - the chain of sealed blocks plus the pool of pending transactions
// Both live under one lock so readers never see a half-appended chain
// Mining snapshots the pool, searches for a nonce without the lock, then re-checks the tip

use crate::core::{Block, BlockHash, ProofOfWork, Transaction};
use crate::error::{BlockchainError, Result};
use crate::storage::MemoryPool;
use crate::utils::current_timestamp;
use crate::wallet::{authenticate, PublicKey, Signature};
use data_encoding::HEXLOWER;
use log::{debug, info, warn};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const DEFAULT_DIFFICULTY: usize = 3;
pub const DEFAULT_MINING_REWARD: f64 = 1.0;

/// How much of a peer's chain gets re-checked before adoption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainValidation {
    /// Any non-empty chain is accepted
    TrustPeer,
    /// Genesis anchor and every previousHash link
    HashLink,
    /// Links plus the proof-of-work of every non-genesis block
    #[default]
    FullProofOfWork,
}

impl FromStr for ChainValidation {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust-peer" => Ok(ChainValidation::TrustPeer),
            "hash-link" => Ok(ChainValidation::HashLink),
            "full-pow" => Ok(ChainValidation::FullProofOfWork),
            other => Err(BlockchainError::Config(format!(
                "Unknown chain validation policy '{other}' (expected trust-peer, hash-link or full-pow)"
            ))),
        }
    }
}

impl fmt::Display for ChainValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainValidation::TrustPeer => "trust-peer",
            ChainValidation::HashLink => "hash-link",
            ChainValidation::FullProofOfWork => "full-pow",
        };
        f.write_str(name)
    }
}

struct LedgerState {
    chain: Vec<Block>,
    mempool: MemoryPool,
}

impl LedgerState {
    fn last_block(&self) -> Result<&Block> {
        self.chain
            .last()
            .ok_or_else(|| BlockchainError::InvalidBlock("Chain has no genesis block".to_string()))
    }
}

pub struct Ledger {
    state: RwLock<LedgerState>,
    mining: Mutex<()>, // Only one mining cycle at a time
    owner_address: String,
    pow: ProofOfWork,
    mining_reward: f64,
    validation: ChainValidation,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new(owner_address: &str, difficulty: usize) -> Result<Ledger> {
        let genesis = Block::generate_genesis_block()?;
        info!("Created genesis block {}", genesis.hash_hex()?);
        Ok(Ledger {
            state: RwLock::new(LedgerState {
                chain: vec![genesis],
                mempool: MemoryPool::new(),
            }),
            mining: Mutex::new(()),
            owner_address: owner_address.to_string(),
            pow: ProofOfWork::new_proof_of_work(difficulty),
            mining_reward: DEFAULT_MINING_REWARD,
            validation: ChainValidation::default(),
        })
    }

    pub fn with_mining_reward(mut self, reward: f64) -> Self {
        self.mining_reward = reward;
        self
    }

    pub fn with_validation(mut self, validation: ChainValidation) -> Self {
        self.validation = validation;
        self
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| BlockchainError::Lock("Failed to acquire read lock on ledger".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| BlockchainError::Lock("Failed to acquire write lock on ledger".to_string()))
    }

    /// Admit a transaction into the pool.
    ///
    /// Reward transactions are admitted unconditionally. Anything else needs a
    /// public key and signature that verify, otherwise it is rejected with
    /// `Ok(false)` and the pool is left untouched.
    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        value: f64,
        public_key: Option<&PublicKey>,
        signature: Option<&Signature>,
    ) -> Result<bool> {
        let tx = Transaction::new(sender, recipient, value);
        if tx.is_reward() {
            self.write_state()?.mempool.add(tx);
            return Ok(true);
        }

        let (public_key, signature) = match (public_key, signature) {
            (Some(public_key), Some(signature)) => (public_key, signature),
            (public_key, signature) => {
                let mut missing = vec![];
                if public_key.is_none() {
                    missing.push("sender_public_key");
                }
                if signature.is_none() {
                    missing.push("signature");
                }
                return Err(BlockchainError::missing_fields(missing));
            }
        };

        if !authenticate(&tx, public_key, signature) {
            warn!("Rejected transaction from {sender}: signature does not verify");
            return Ok(false);
        }

        self.write_state()?.mempool.add(tx);
        debug!("Admitted transaction {sender} -> {recipient}: {value}");
        Ok(true)
    }

    /// One mining cycle. Returns false when there was nothing to mine or the
    /// chain moved while the nonce was being searched.
    pub fn mine(&self) -> Result<bool> {
        let _mining = self
            .mining
            .lock()
            .map_err(|_| BlockchainError::Lock("Failed to acquire mining lock".to_string()))?;

        let reward = Transaction::new_reward_tx(&self.owner_address, self.mining_reward);
        let (previous_hash, snapshot) = {
            let mut state = self.write_state()?;
            if state.mempool.is_empty() {
                return Ok(false);
            }
            state.mempool.add(reward.clone());
            let previous_hash = state.last_block()?.hash()?;
            (previous_hash, state.mempool.get_all())
        };

        // The timestamp is fixed before the search and stored unchanged
        let timestamp = current_timestamp()?;
        info!(
            "Mining {} transactions on top of {} at difficulty {}",
            snapshot.len(),
            HEXLOWER.encode(&previous_hash),
            self.pow.get_difficulty()
        );
        let nonce = match self.pow.find_nonce(timestamp, &previous_hash, &snapshot) {
            Ok(nonce) => nonce,
            Err(e) => {
                self.write_state()?.mempool.remove(&reward);
                return Err(e);
            }
        };
        let block = Block::new_block(timestamp, nonce, previous_hash, snapshot);
        self.append_mined(block, &reward)
    }

    /// Append a sealed block if the tip is still the one it was mined on.
    /// Otherwise the block is discarded and its reward leaves the pool.
    pub(crate) fn append_mined(&self, block: Block, reward: &Transaction) -> Result<bool> {
        let mut state = self.write_state()?;
        let tip: BlockHash = state.last_block()?.hash()?;
        if tip != *block.get_previous_hash() {
            state.mempool.remove(reward);
            warn!("Chain tip moved while mining, discarding sealed block");
            return Ok(false);
        }
        state.mempool.remove_sealed(block.get_transactions());
        info!(
            "Mined block {} with nonce {}, chain length {}",
            block.hash_hex()?,
            block.get_nonce(),
            state.chain.len() + 1
        );
        state.chain.push(block);
        Ok(true)
    }

    /// Check a chain against this ledger's validation policy
    pub fn is_valid_chain(&self, chain: &[Block]) -> Result<bool> {
        let genesis = match chain.first() {
            Some(genesis) => genesis,
            None => return Ok(false),
        };
        if self.validation == ChainValidation::TrustPeer {
            return Ok(true);
        }

        if genesis.get_nonce() != 0 || !genesis.get_transactions().is_empty() {
            debug!("Chain rejected: genesis carries a nonce or transactions");
            return Ok(false);
        }
        if *genesis.get_previous_hash() != Block::empty().hash()? {
            debug!("Chain rejected: genesis is not anchored to the empty block");
            return Ok(false);
        }

        for (index, pair) in chain.windows(2).enumerate() {
            let (previous, block) = (&pair[0], &pair[1]);
            if *block.get_previous_hash() != previous.hash()? {
                debug!("Chain rejected: broken link at block {}", index + 1);
                return Ok(false);
            }
            if self.validation == ChainValidation::FullProofOfWork && !self.pow.validate(block)? {
                debug!("Chain rejected: block {} lacks proof of work", index + 1);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Replace the local chain with `chain` if it is strictly longer and valid
    pub fn adopt_chain(&self, chain: Vec<Block>) -> Result<bool> {
        if !self.is_valid_chain(&chain)? {
            return Ok(false);
        }
        let mut state = self.write_state()?;
        // Re-checked under the lock, the chain may have grown since the caller compared lengths
        if chain.len() <= state.chain.len() {
            return Ok(false);
        }
        info!(
            "Replacing local chain of length {} with chain of length {}",
            state.chain.len(),
            chain.len()
        );
        state.chain = chain;
        Ok(true)
    }

    /// Replay the whole chain: +value when `address` receives, -value when it sends
    pub fn calculate_total_amount(&self, address: &str) -> Result<f64> {
        let state = self.read_state()?;
        let mut total = 0.0;
        for block in &state.chain {
            for tx in block.get_transactions() {
                if tx.get_recipient() == address {
                    total += tx.get_value();
                }
                if tx.get_sender() == address {
                    total -= tx.get_value();
                }
            }
        }
        Ok(total)
    }

    pub fn chain(&self) -> Result<Vec<Block>> {
        Ok(self.read_state()?.chain.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read_state()?.chain.len())
    }

    pub fn last_block(&self) -> Result<Block> {
        Ok(self.read_state()?.last_block()?.clone())
    }

    pub fn transaction_pool(&self) -> Result<Vec<Transaction>> {
        Ok(self.read_state()?.mempool.get_all())
    }

    pub fn clear_transaction_pool(&self) -> Result<()> {
        self.write_state()?.mempool.clear();
        Ok(())
    }
}
