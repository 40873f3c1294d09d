//! Error handling for the ledger node
//!
//! One error enum covers every layer: request validation, signature checks,
//! peer traffic, mining and the crypto primitives underneath.

use std::collections::BTreeMap;
use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Value stored against every absent field of a request
pub const MISSING_VALUE: &str = "missing value";

/// Error kinds for ledger, wallet and network operations
#[derive(Debug, Clone, PartialEq)]
pub enum BlockchainError {
    /// Missing or malformed request fields, keyed by field name
    Validation(BTreeMap<String, String>),
    /// Signature does not verify against the claimed public key
    Authentication(String),
    /// A required query parameter or resource is absent
    NotFound(String),
    /// A neighbor could not be reached or answered with a failure status
    PeerUnreachable { peer: String, reason: String },
    /// Malformed JSON on ingress or egress
    Serialization(String),
    /// Cryptographic operation errors
    Crypto(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Block construction or validation errors
    InvalidBlock(String),
    /// Mining errors
    Mining(String),
    /// Local network setup errors (binding, client construction)
    Network(String),
    /// Configuration errors
    Config(String),
    /// File and socket I/O errors
    Io(String),
    /// A shared lock was poisoned by a panicking thread
    Lock(String),
}

impl BlockchainError {
    /// Build a validation error listing every missing field
    pub fn missing_fields<I, S>(fields: I) -> BlockchainError
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BlockchainError::Validation(
            fields
                .into_iter()
                .map(|field| (field.into(), MISSING_VALUE.to_string()))
                .collect(),
        )
    }

    pub fn peer_unreachable(peer: &str, reason: impl fmt::Display) -> BlockchainError {
        BlockchainError::PeerUnreachable {
            peer: peer.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Validation(fields) => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(f, "Validation error: {}", names.join(", "))
            }
            BlockchainError::Authentication(msg) => write!(f, "Authentication error: {msg}"),
            BlockchainError::NotFound(msg) => write!(f, "Not found: {msg}"),
            BlockchainError::PeerUnreachable { peer, reason } => {
                write!(f, "Peer {peer} unreachable: {reason}")
            }
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::Mining(msg) => write!(f, "Mining error: {msg}"),
            BlockchainError::Network(msg) => write!(f, "Network error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Lock(msg) => write!(f, "Lock error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_map() {
        let err = BlockchainError::missing_fields(["value", "signature"]);
        match err {
            BlockchainError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["value"], MISSING_VALUE);
                assert_eq!(fields["signature"], MISSING_VALUE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let err = BlockchainError::missing_fields(["value", "signature"]);
        assert_eq!(err.to_string(), "Validation error: signature, value");
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: BlockchainError = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert!(matches!(err, BlockchainError::Serialization(_)));
    }
}
