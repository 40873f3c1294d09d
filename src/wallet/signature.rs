// Signatures and public keys in the form they travel between wallet and node
// Both are carried as fixed-width hex: two 64-digit halves concatenated

use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::utils::ecdsa_p256_sha256_sign_verify;
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use num_bigint::BigUint;
use std::fmt;

const COORDINATE_LEN: usize = 32;
const UNCOMPRESSED_TAG: u8 = 0x04;

/// ECDSA signature as its two scalars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Parse ring's fixed r || s encoding
    pub fn from_fixed_bytes(bytes: &[u8]) -> Result<Signature> {
        if bytes.len() != 2 * COORDINATE_LEN {
            return Err(BlockchainError::Crypto(format!(
                "Signature must be {} bytes, got {}",
                2 * COORDINATE_LEN,
                bytes.len()
            )));
        }
        let (r, s) = bytes.split_at(COORDINATE_LEN);
        Ok(Signature {
            r: BigUint::from_bytes_be(r),
            s: BigUint::from_bytes_be(s),
        })
    }

    /// r || s with each scalar left-padded to 32 bytes, or None when a scalar
    /// does not fit
    pub fn to_fixed_bytes(&self) -> Option<Vec<u8>> {
        let mut out = pad_to_coordinate(&self.r.to_bytes_be())?;
        out.extend(pad_to_coordinate(&self.s.to_bytes_be())?);
        Some(out)
    }

    /// Parse the wire form: 128 hex digits, r then s
    pub fn from_hex(hex: &str) -> Result<Signature> {
        let bytes = decode_hex_pair(hex)
            .ok_or_else(|| BlockchainError::Authentication("Malformed signature".to_string()))?;
        Signature::from_fixed_bytes(&bytes)
            .map_err(|_| BlockchainError::Authentication("Malformed signature".to_string()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064x}{:064x}", self.r, self.s)
    }
}

/// P-256 public key as its raw X || Y coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    coordinates: Vec<u8>,
}

impl PublicKey {
    /// Accept the SEC1 uncompressed encoding ring hands out
    pub fn from_uncompressed(bytes: &[u8]) -> Result<PublicKey> {
        if bytes.len() != 1 + 2 * COORDINATE_LEN || bytes[0] != UNCOMPRESSED_TAG {
            return Err(BlockchainError::Crypto(
                "Expected an uncompressed P-256 public key".to_string(),
            ));
        }
        Ok(PublicKey {
            coordinates: bytes[1..].to_vec(),
        })
    }

    /// Parse the wire form: 128 hex digits, X then Y
    pub fn from_hex(hex: &str) -> Result<PublicKey> {
        let coordinates = decode_hex_pair(hex)
            .ok_or_else(|| BlockchainError::Authentication("Malformed public key".to_string()))?;
        Ok(PublicKey { coordinates })
    }

    /// X || Y, 64 bytes
    pub fn get_coordinates(&self) -> &[u8] {
        self.coordinates.as_slice()
    }

    pub fn to_uncompressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.coordinates.len());
        out.push(UNCOMPRESSED_TAG);
        out.extend_from_slice(&self.coordinates);
        out
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HEXLOWER.encode(&self.coordinates))
    }
}

/// Verify `signature` over the canonical form of `tx`. Any structural or
/// cryptographic mismatch yields false.
pub fn authenticate(tx: &Transaction, public_key: &PublicKey, signature: &Signature) -> bool {
    let message = match tx.canonical_bytes() {
        Ok(message) => message,
        Err(_) => return false,
    };
    let signature = match signature.to_fixed_bytes() {
        Some(bytes) => bytes,
        None => return false,
    };
    ecdsa_p256_sha256_sign_verify(&public_key.to_uncompressed(), &signature, &message)
}

fn pad_to_coordinate(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.len() > COORDINATE_LEN {
        return None;
    }
    let mut out = vec![0u8; COORDINATE_LEN - bytes.len()];
    out.extend_from_slice(bytes);
    Some(out)
}

fn decode_hex_pair(hex: &str) -> Option<Vec<u8>> {
    if hex.len() != 4 * COORDINATE_LEN {
        return None;
    }
    HEXLOWER_PERMISSIVE.decode(hex.as_bytes()).ok()
}
