//! In-memory storage
//!
//! The ledger keeps everything in memory; this module holds the ordered
//! pool of pending transactions.

pub mod memory_pool;

pub use memory_pool::MemoryPool;
