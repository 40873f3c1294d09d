//! Wallet management and cryptographic operations
//!
//! This module handles key pair creation, address generation,
//! and transaction signing and verification.

pub mod signature;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use signature::{authenticate, PublicKey, Signature};
pub use wallet::{
    address_from_public_key, checksum, convert_address, hash_pub_key, validate_address, Wallet,
    ADDRESS_CHECK_SUM_LEN,
};
