//! Core ledger functionality
//!
//! This module contains the fundamental components: transactions, blocks,
//! proof-of-work search and the ledger that ties chain and mempool together.

pub mod block;
pub mod ledger;
pub mod proof_of_work;
pub mod transaction;

pub use block::{Block, BlockHash};
pub use ledger::{ChainValidation, Ledger, DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD};
pub use proof_of_work::{meets_difficulty, ProofOfWork};
pub use transaction::{Transaction, MINING_SENDER};
