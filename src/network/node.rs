// The node is the server context: one ledger, its neighbors, and the background jobs
// Request handlers and recurring jobs all reach the ledger through here

use crate::core::{Block, Ledger, MINING_SENDER};
use crate::error::{BlockchainError, Result};
use crate::network::messages::{TransactionRequest, ValidatedTransaction};
use crate::network::{NeighborDiscovery, PeerClient, PeerSet, RecurringJob};
use crate::wallet::{PublicKey, Signature};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

pub const DEFAULT_MINING_INTERVAL: Duration = Duration::from_secs(20);
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(20);

pub struct Node {
    address: String, // host:port this node is reachable on
    ledger: Ledger,
    peers: PeerSet,
    client: Arc<dyn PeerClient>,
    discovery: Box<dyn NeighborDiscovery>,
    mining_interval: Duration,
    sync_interval: Duration,
    mining_job: Mutex<Option<RecurringJob>>,
    sync_job: Mutex<Option<RecurringJob>>,
}

impl Node {
    pub fn new(
        address: &str,
        ledger: Ledger,
        client: Arc<dyn PeerClient>,
        discovery: Box<dyn NeighborDiscovery>,
    ) -> Node {
        Node {
            address: address.to_string(),
            ledger,
            peers: PeerSet::new(),
            client,
            discovery,
            mining_interval: DEFAULT_MINING_INTERVAL,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            mining_job: Mutex::new(None),
            sync_job: Mutex::new(None),
        }
    }

    pub fn with_mining_interval(mut self, interval: Duration) -> Self {
        self.mining_interval = interval;
        self
    }

    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    pub fn get_address(&self) -> &str {
        self.address.as_str()
    }

    pub fn get_ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn get_peers(&self) -> &PeerSet {
        &self.peers
    }

    /// Admit a client transaction and, when accepted, relay it to every neighbor
    pub fn create_transaction(&self, request: &TransactionRequest) -> Result<bool> {
        let validated = request.validate()?;
        let accepted = self.submit_validated(&validated)?;
        if accepted {
            let relayed = TransactionRequest::from(&validated);
            for peer in self.peers.get_peers()? {
                if let Err(e) = self.client.relay_transaction(&peer, &relayed) {
                    warn!("Failed to relay transaction to {peer}: {e}");
                }
            }
        }
        Ok(accepted)
    }

    /// Admit a transaction relayed by a neighbor, without relaying it further
    pub fn admit_transaction(&self, request: &TransactionRequest) -> Result<bool> {
        let validated = request.validate()?;
        self.submit_validated(&validated)
    }

    /// Rewards are minted by the ledger itself, never accepted from the wire
    fn submit_validated(&self, tx: &ValidatedTransaction) -> Result<bool> {
        if tx.sender == MINING_SENDER {
            warn!("Rejected transaction claiming the reward sender for {}", tx.recipient);
            return Err(BlockchainError::Authentication(
                "Reward transactions cannot be submitted".to_string(),
            ));
        }

        let key_material = PublicKey::from_hex(&tx.public_key)
            .and_then(|key| Signature::from_hex(&tx.signature).map(|sig| (key, sig)));
        let (public_key, signature) = match key_material {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Rejected transaction from {}: {e}", tx.sender);
                return Ok(false);
            }
        };
        self.ledger.submit_transaction(
            &tx.sender,
            &tx.recipient,
            tx.value,
            Some(&public_key),
            Some(&signature),
        )
    }

    /// Run one mining cycle; after sealing a block, ask every neighbor to drop
    /// its pool and reconcile with us
    pub fn mine(&self) -> Result<bool> {
        if !self.ledger.mine()? {
            return Ok(false);
        }
        for peer in self.peers.get_peers()? {
            if let Err(e) = self.client.clear_transaction_pool(&peer) {
                warn!("Failed to clear transaction pool on {peer}: {e}");
            }
            if let Err(e) = self.client.request_consensus(&peer) {
                warn!("Failed to request consensus from {peer}: {e}");
            }
        }
        Ok(true)
    }

    /// Longest-chain rule: adopt the longest valid neighbor chain that beats ours.
    /// Unreachable neighbors and invalid chains simply contribute nothing.
    pub fn resolve_conflicts(&self) -> Result<bool> {
        let local_len = self.ledger.len()?;
        let mut longest: Option<Vec<Block>> = None;

        for peer in self.peers.get_peers()? {
            let chain = match self.client.fetch_chain(&peer) {
                Ok(chain) => chain,
                Err(e) => {
                    warn!("Skipping {peer} during conflict resolution: {e}");
                    continue;
                }
            };
            let to_beat = longest.as_ref().map_or(local_len, Vec::len);
            if chain.len() <= to_beat {
                continue;
            }
            if self.ledger.is_valid_chain(&chain)? {
                longest = Some(chain);
            } else {
                warn!("Ignoring invalid chain of length {} from {peer}", chain.len());
            }
        }

        let replaced = match longest {
            Some(chain) => self.ledger.adopt_chain(chain)?,
            None => false,
        };
        if replaced {
            info!("Resolved conflicts: local chain replaced");
        } else {
            debug!("Resolved conflicts: local chain kept");
        }
        Ok(replaced)
    }

    /// Refresh the neighbor list from discovery, never listing ourselves
    pub fn sync_neighbors(&self) -> Result<()> {
        let found: Vec<String> = self
            .discovery
            .discover()
            .into_iter()
            .filter(|peer| *peer != self.address)
            .collect();
        info!("Neighbors: {found:?}");
        self.peers.replace(found)
    }

    fn lock_job<'a>(
        job: &'a Mutex<Option<RecurringJob>>,
    ) -> Result<MutexGuard<'a, Option<RecurringJob>>> {
        job.lock()
            .map_err(|_| BlockchainError::Lock("Failed to acquire job lock".to_string()))
    }

    /// Start the recurring mining job. Returns false if it is already running.
    pub fn start_mining(self: &Arc<Self>) -> Result<bool> {
        let mut slot = Self::lock_job(&self.mining_job)?;
        if slot.as_ref().is_some_and(|job| !job.is_finished()) {
            return Ok(false);
        }
        let node: Weak<Node> = Arc::downgrade(self);
        let job = RecurringJob::start("mining", self.mining_interval, move || {
            let Some(node) = node.upgrade() else {
                return false;
            };
            if let Err(e) = node.mine() {
                error!("Mining cycle failed: {e}");
            }
            true
        })?;
        *slot = Some(job);
        Ok(true)
    }

    /// Start the recurring neighbor refresh + conflict resolution job.
    /// Returns false if it is already running.
    pub fn start_neighbor_sync(self: &Arc<Self>) -> Result<bool> {
        let mut slot = Self::lock_job(&self.sync_job)?;
        if slot.as_ref().is_some_and(|job| !job.is_finished()) {
            return Ok(false);
        }
        let node: Weak<Node> = Arc::downgrade(self);
        let job = RecurringJob::start("neighbor-sync", self.sync_interval, move || {
            let Some(node) = node.upgrade() else {
                return false;
            };
            if let Err(e) = node.sync_neighbors() {
                error!("Neighbor refresh failed: {e}");
            }
            if let Err(e) = node.resolve_conflicts() {
                error!("Conflict resolution failed: {e}");
            }
            true
        })?;
        *slot = Some(job);
        Ok(true)
    }

    pub fn is_mining(&self) -> Result<bool> {
        Ok(Self::lock_job(&self.mining_job)?
            .as_ref()
            .is_some_and(|job| !job.is_finished()))
    }

    /// Stop every recurring job and wait for them to exit
    pub fn shutdown(&self) -> Result<()> {
        for slot in [&self.mining_job, &self.sync_job] {
            let job = Self::lock_job(slot)?.take();
            if let Some(mut job) = job {
                info!("Stopping job {}", job.get_name());
                job.stop();
            }
        }
        Ok(())
    }
}
