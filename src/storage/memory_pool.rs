use crate::core::Transaction;

/// Pending transactions in submission order.
///
/// The pool has no lock of its own; the ledger keeps it under the same lock
/// as the chain so the pair always changes together.
#[derive(Debug, Default, Clone)]
pub struct MemoryPool {
    inner: Vec<Transaction>,
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool { inner: Vec::new() }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.inner.push(tx);
    }

    pub fn get_all(&self) -> Vec<Transaction> {
        self.inner.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Drop the transactions sealed into a block. `sealed` is a snapshot of the
    /// pool's front, so anything admitted after the snapshot stays pending.
    pub fn remove_sealed(&mut self, sealed: &[Transaction]) {
        if self.inner.len() >= sealed.len() && self.inner[..sealed.len()] == *sealed {
            self.inner.drain(..sealed.len());
            return;
        }
        // The front changed underneath us, fall back to removing one match per sealed tx
        for tx in sealed {
            self.remove(tx);
        }
    }

    /// Remove the first transaction equal to `tx`, returning whether one was found
    pub fn remove(&mut self, tx: &Transaction) -> bool {
        match self.inner.iter().position(|pending| pending == tx) {
            Some(idx) => {
                self.inner.remove(idx);
                true
            }
            None => false,
        }
    }
}
