use ring::digest::{Context, SHA256};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED, ECDSA_P256_SHA256_FIXED_SIGNING,
};
use ripemd::{Digest as RipemdDigest, Ripemd160};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds since the Unix epoch
pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Crypto(format!("System time error: {e}")))?
        .as_nanos();

    // i64 nanoseconds run out in 2262
    if duration > i64::MAX as u128 {
        return Err(BlockchainError::Crypto("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn ripemd160_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| BlockchainError::InvalidAddress(format!("Invalid base58 encoding: {e}")))
}

/// Generate a fresh P-256 key pair as a PKCS#8 document
pub fn new_key_pair() -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to generate ECDSA key pair: {e}")))?
        .as_ref()
        .to_vec();
    Ok(pkcs8)
}

fn load_key_pair(pkcs8: &[u8]) -> Result<EcdsaKeyPair> {
    let rng = SystemRandom::new();
    EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to create key pair from PKCS8: {e}")))
}

/// Uncompressed SEC1 public key (0x04 || X || Y) of a PKCS#8 key pair
pub fn public_key_from_pkcs8(pkcs8: &[u8]) -> Result<Vec<u8>> {
    let key_pair = load_key_pair(pkcs8)?;
    Ok(key_pair.public_key().as_ref().to_vec())
}

/// Sign `message` (hashed with SHA-256 inside ring). The result is r || s,
/// each scalar left-padded to 32 bytes.
pub fn ecdsa_p256_sha256_sign(pkcs8: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let key_pair = load_key_pair(pkcs8)?;
    let signature = key_pair
        .sign(&rng, message)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to sign message: {e}")))?
        .as_ref()
        .to_vec();
    Ok(signature)
}

pub fn ecdsa_p256_sha256_sign_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let peer_public_key =
        ring::signature::UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, public_key);
    peer_public_key.verify(message, signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXLOWER;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            HEXLOWER.encode(&sha256_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_ripemd160_known_vector() {
        assert_eq!(
            HEXLOWER.encode(&ripemd160_digest(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn test_base58_roundtrip_keeps_leading_zeros() {
        let data = [0u8, 0, 1, 2, 3];
        let encoded = base58_encode(&data);
        assert!(encoded.starts_with("11"));
        assert_eq!(base58_decode(&encoded).unwrap(), data);
        assert!(base58_decode("0OIl").is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let pkcs8 = new_key_pair().unwrap();
        let public_key = public_key_from_pkcs8(&pkcs8).unwrap();
        assert_eq!(public_key.len(), 65);
        assert_eq!(public_key[0], 0x04);

        let signature = ecdsa_p256_sha256_sign(&pkcs8, b"payload").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(ecdsa_p256_sha256_sign_verify(&public_key, &signature, b"payload"));
        assert!(!ecdsa_p256_sha256_sign_verify(&public_key, &signature, b"other"));
    }

    #[test]
    fn test_timestamp_is_nanoseconds() {
        let ts = current_timestamp().unwrap();
        // Later than 2020-01-01 expressed in nanoseconds
        assert!(ts > 1_577_836_800_000_000_000);
    }
}
