//! Utility functions and helpers
//!
//! This module contains cryptographic utilities, encoding functions,
//! and the canonical JSON helpers used for hashing and signing.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign,
    ecdsa_p256_sha256_sign_verify, new_key_pair, public_key_from_pkcs8, ripemd160_digest,
    sha256_digest,
};

pub use serialization::{hex_digest, to_canonical_json};
