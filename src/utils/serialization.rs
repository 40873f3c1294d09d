// Canonical JSON encoding shared by hashing, signing and the wire format
use crate::error::{BlockchainError, Result};
use serde::Serialize;

/// Compact serde_json encoding. Struct fields keep their declaration order,
/// so the same value always produces the same bytes.
pub fn to_canonical_json<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(data)
        .map_err(|e| BlockchainError::Serialization(format!("Serialization failed: {e}")))
}

/// Serde adapter for 32-byte digests carried as lowercase hex strings
pub mod hex_digest {
    use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(digest: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&HEXLOWER.encode(digest))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let hex = String::deserialize(deserializer)?;
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.as_bytes())
            .map_err(de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| de::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Digested {
        label: String,
        #[serde(with = "hex_digest")]
        digest: [u8; 32],
    }

    #[test]
    fn test_canonical_json_is_compact_and_ordered() {
        let value = Digested {
            label: "x".to_string(),
            digest: [0xab; 32],
        };
        let bytes = to_canonical_json(&value).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, format!("{{\"label\":\"x\",\"digest\":\"{}\"}}", "ab".repeat(32)));
    }

    #[test]
    fn test_hex_digest_accepts_uppercase() {
        let json = format!("{{\"label\":\"y\",\"digest\":\"{}\"}}", "AB".repeat(32));
        let parsed: Digested = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.digest, [0xab; 32]);
    }

    #[test]
    fn test_hex_digest_rejects_wrong_length() {
        let json = "{\"label\":\"y\",\"digest\":\"abcd\"}";
        assert!(serde_json::from_str::<Digested>(json).is_err());
    }
}
