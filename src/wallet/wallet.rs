use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::utils::{
    base58_decode, base58_encode, ecdsa_p256_sha256_sign, new_key_pair, public_key_from_pkcs8,
    ripemd160_digest, sha256_digest,
};
use crate::wallet::{PublicKey, Signature};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use zeroize::{Zeroize, ZeroizeOnDrop};

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;

/// A P-256 key pair and the address derived from it. The private key stays
/// in PKCS#8 form and is wiped when the wallet is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Wallet {
    pkcs8: Vec<u8>,
    #[zeroize(skip)]
    public_key: PublicKey,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let pkcs8 = new_key_pair()?;
        Wallet::from_pkcs8(pkcs8)
    }

    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Wallet> {
        let public_key = PublicKey::from_uncompressed(&public_key_from_pkcs8(&pkcs8)?)?;
        Ok(Wallet { pkcs8, public_key })
    }

    /// Restore a wallet from the hex private key it exported
    pub fn from_private_key_hex(hex: &str) -> Result<Wallet> {
        let pkcs8 = HEXLOWER_PERMISSIVE
            .decode(hex.trim().as_bytes())
            .map_err(|e| BlockchainError::Crypto(format!("Invalid private key hex: {e}")))?;
        Wallet::from_pkcs8(pkcs8)
    }

    pub fn get_address(&self) -> String {
        address_from_public_key(&self.public_key)
    }

    pub fn get_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn get_private_key_hex(&self) -> String {
        HEXLOWER.encode(&self.pkcs8)
    }

    /// Sign the canonical form of `tx`
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<Signature> {
        let message = tx.canonical_bytes()?;
        let signature = ecdsa_p256_sha256_sign(&self.pkcs8, &message)?;
        Signature::from_fixed_bytes(&signature)
    }
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = sha256_digest(pub_key);
    ripemd160_digest(pub_key_sha256.as_slice())
}

pub fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = sha256_digest(payload);
    let second_sha = sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

/// version || RIPEMD-160(SHA-256(X || Y)) || checksum, base58 encoded
pub fn address_from_public_key(public_key: &PublicKey) -> String {
    convert_address(&hash_pub_key(public_key.get_coordinates()))
}

pub fn convert_address(pub_hash_key: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![];
    payload.push(VERSION);
    payload.extend(pub_hash_key);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    base58_encode(payload.as_slice())
}

pub fn validate_address(address: &str) -> bool {
    let payload = match base58_decode(address) {
        Ok(payload) => payload,
        Err(_) => return false,
    };

    if payload.len() < ADDRESS_CHECK_SUM_LEN + 1 {
        return false;
    }

    let (versioned, actual_checksum) = payload.split_at(payload.len() - ADDRESS_CHECK_SUM_LEN);
    checksum(versioned) == actual_checksum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::authenticate;

    // Generator point of P-256
    const GX: &str = "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
    const GY: &str = "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";

    fn generator_key() -> PublicKey {
        PublicKey::from_hex(&format!("{GX}{GY}")).unwrap()
    }

    #[test]
    fn test_address_known_vector() {
        let key = generator_key();
        assert_eq!(
            HEXLOWER.encode(&hash_pub_key(key.get_coordinates())),
            "b134d1f44dca906dcd7c96e4455d7eaa9efa6987"
        );
        assert_eq!(
            address_from_public_key(&key),
            "1H9ysxkbjve5xCgsooBQLxWbPjD77AHuCC"
        );
    }

    #[test]
    fn test_address_is_deterministic_and_checksummed() {
        let wallet = Wallet::new().unwrap();
        let address = wallet.get_address();
        assert_eq!(address, wallet.get_address());
        assert!(validate_address(&address));

        let payload = base58_decode(&address).unwrap();
        assert_eq!(payload.len(), 25);
        assert_eq!(payload[0], VERSION);
        assert_eq!(checksum(&payload[..21]), payload[21..].to_vec());
    }

    #[test]
    fn test_validate_address_rejects_tampering() {
        let address = address_from_public_key(&generator_key());
        let mut tampered = address.clone();
        tampered.replace_range(5..6, if &address[5..6] == "x" { "y" } else { "x" });
        assert!(!validate_address(&tampered));
        assert!(!validate_address("0OIl"));
        assert!(!validate_address("1"));
    }

    #[test]
    fn test_private_key_roundtrip() {
        let wallet = Wallet::new().unwrap();
        let restored = Wallet::from_private_key_hex(&wallet.get_private_key_hex()).unwrap();
        assert_eq!(restored.get_public_key(), wallet.get_public_key());
        assert_eq!(restored.get_address(), wallet.get_address());
        assert!(Wallet::from_private_key_hex("not hex").is_err());
    }

    #[test]
    fn test_signed_transaction_authenticates() {
        let wallet = Wallet::new().unwrap();
        let tx = Transaction::new(&wallet.get_address(), "B", 1.0);
        let signature = wallet.sign_transaction(&tx).unwrap();
        assert!(authenticate(&tx, wallet.get_public_key(), &signature));

        let other = Wallet::new().unwrap();
        assert!(!authenticate(&tx, other.get_public_key(), &signature));
    }
}
