//! # PoW Ledger - A Minimal Proof-of-Work Ledger
//!
//! A set of peer nodes, each holding an append-only chain of value-transfer
//! blocks. Nodes admit signed transactions into a pending pool, seal the pool
//! into blocks by proof-of-work, and converge on the longest valid chain
//! among their neighbors.
//!
//! ## How the Code Is Organized
//! - `core/`: transactions, blocks, proof-of-work and the ledger itself
//! - `wallet/`: P-256 keys, address derivation, signing and verification
//! - `network/`: the node context, neighbor discovery, peer traffic and background jobs
//! - `storage/`: the in-memory transaction pool
//! - `api/`: HTTP handlers for the node and the wallet server
//! - `config/`: settings from the environment
//! - `utils/`: hashing, encoding and canonical JSON helpers
//! - `cli/`: command-line interface
//!
//! ## Where to Start
//! 1. `core/ledger.rs` for admission, mining and chain adoption
//! 2. `network/node.rs` for how a node talks to its neighbors
//! 3. `wallet/wallet.rs` for keys and addresses

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod storage;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::Config;
pub use crate::core::{
    Block, BlockHash, ChainValidation, Ledger, ProofOfWork, Transaction, MINING_SENDER,
};
pub use error::{BlockchainError, Result};
pub use network::{HttpPeerClient, Node, PeerClient, PeerSet, RecurringJob};
pub use storage::MemoryPool;
pub use utils::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign,
    ecdsa_p256_sha256_sign_verify, new_key_pair, ripemd160_digest, sha256_digest,
};
pub use wallet::{
    address_from_public_key, authenticate, convert_address, hash_pub_key, validate_address,
    PublicKey, Signature, Wallet, ADDRESS_CHECK_SUM_LEN,
};
