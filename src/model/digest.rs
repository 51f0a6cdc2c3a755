//! Commitment values produced by the tree's hash function

use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A node's commitment value
///
/// The width is decided by the hash function the tree was built with, so
/// digests are held as owned byte buffers rather than fixed arrays.
/// Internally everything operates on raw bytes; hexadecimal strings are
/// the textual boundary (root hashes, serialized proofs).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Create a digest from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }

    /// Parse from a hex string (case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Digest(hex::decode(s)?))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Get a short prefix for display (first 7 chars, like git)
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        hex[..hex.len().min(7)].to_string()
    }

    /// Number of bytes in the digest
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest holds no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = Digest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex-encoded digest string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Digest, E> {
                Digest::from_hex(v).map_err(|e| match e {
                    Error::Hex(inner) => E::custom(inner),
                    other => E::custom(other),
                })
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let d = Digest::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(d.to_hex(), "deadbeef");
        assert_eq!(Digest::from_hex("deadbeef").unwrap(), d);
    }

    #[test]
    fn test_hex_decode_case_insensitive() {
        let lower = Digest::from_hex("deadbeef").unwrap();
        let upper = Digest::from_hex("DEADBEEF").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(Digest::from_hex("not hex!").is_err());
        assert!(Digest::from_hex("abc").is_err());
    }

    #[test]
    fn test_short() {
        let d = Digest::from_bytes(vec![0xab; 32]);
        assert_eq!(d.short(), "abababa");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let d = Digest::from_bytes(vec![0x01, 0x02]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"0102\"");
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
