use crate::error::{BlockchainError, Result};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Neighbor addresses (`host:port`), locked independently of the ledger
pub struct PeerSet {
    inner: RwLock<Vec<String>>,
}

impl Default for PeerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerSet {
    pub fn new() -> PeerSet {
        PeerSet {
            inner: RwLock::new(vec![]),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<String>>> {
        self.inner
            .read()
            .map_err(|_| BlockchainError::Lock("Failed to acquire read lock on peers".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<String>>> {
        self.inner
            .write()
            .map_err(|_| BlockchainError::Lock("Failed to acquire write lock on peers".to_string()))
    }

    /// Swap in a freshly discovered neighbor list, dropping duplicates
    pub fn replace(&self, peers: Vec<String>) -> Result<()> {
        let mut deduped: Vec<String> = Vec::with_capacity(peers.len());
        for peer in peers {
            if !deduped.contains(&peer) {
                deduped.push(peer);
            }
        }
        *self.write()? = deduped;
        Ok(())
    }

    pub fn get_peers(&self) -> Result<Vec<String>> {
        Ok(self.read()?.to_vec())
    }
}
