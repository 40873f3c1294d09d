//! Node networking
//!
//! This module holds the node context, the wire messages it exchanges,
//! neighbor discovery and the recurring background jobs.

pub mod discovery;
pub mod messages;
pub mod node;
pub mod peer_client;
pub mod peers;
pub mod scheduler;

pub use discovery::{NeighborDiscovery, PortScanDiscovery, StaticNeighbors};
pub use node::Node;
pub use peer_client::{HttpPeerClient, PeerClient};
pub use peers::PeerSet;
pub use scheduler::RecurringJob;
