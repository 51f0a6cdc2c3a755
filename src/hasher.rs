//! Domain-separated hashing over a user-supplied hash function
//!
//! Leaves and internal nodes are hashed under distinct one-byte prefixes
//! so an internal node's hash can never be replayed as a leaf hash (and
//! vice versa), blocking second-preimage tree-forgery attacks.

use crate::model::Digest;
use crate::{Error, Result};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Prefix byte for leaf hashing
const LEAF_PREFIX: u8 = 0x00;
/// Prefix byte for internal-node hashing
const NODE_PREFIX: u8 = 0x01;

/// Hashes leaves and internal nodes with domain separation
///
/// Wraps any `Fn(&[u8]) -> Vec<u8>`. The function's output is normalized:
/// if it returns ASCII hex text (as `hexdigest`-style functions do), the
/// text is decoded so all internal comparisons operate on raw bytes. The
/// hasher is constructed once and treated as immutable for the lifetime of
/// the tree that owns it.
pub struct Hasher {
    func: Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>,
}

impl Hasher {
    /// Wrap a user-supplied hash function
    ///
    /// The function is probed once; one that produces an empty digest is
    /// rejected with [`Error::InvalidArgument`].
    pub fn new<F>(func: F) -> Result<Self>
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        let hasher = Hasher {
            func: Box::new(func),
        };
        if hasher.digest(&[LEAF_PREFIX]).is_empty() {
            return Err(Error::InvalidArgument(
                "hash function produced an empty digest".to_string(),
            ));
        }
        Ok(hasher)
    }

    /// SHA-256 hasher (the default)
    pub fn sha256() -> Self {
        Hasher {
            func: Box::new(|data| Sha256::digest(data).to_vec()),
        }
    }

    /// BLAKE3 hasher
    pub fn blake3() -> Self {
        Hasher {
            func: Box::new(|data| blake3::hash(data).as_bytes().to_vec()),
        }
    }

    /// Hash one input item into a leaf commitment: `H(0x00 || item)`
    pub fn hash_leaf(&self, item: &[u8]) -> Digest {
        let mut data = Vec::with_capacity(1 + item.len());
        data.push(LEAF_PREFIX);
        data.extend_from_slice(item);
        self.digest(&data)
    }

    /// Hash two child commitments into a parent: `H(0x01 || left || right)`
    pub fn hash_children(&self, left: &Digest, right: &Digest) -> Digest {
        let mut data = Vec::with_capacity(1 + left.len() + right.len());
        data.push(NODE_PREFIX);
        data.extend_from_slice(left.as_bytes());
        data.extend_from_slice(right.as_bytes());
        self.digest(&data)
    }

    fn digest(&self, data: &[u8]) -> Digest {
        Digest::from_bytes(normalize((self.func)(data)))
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Hasher::sha256()
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher").finish_non_exhaustive()
    }
}

/// Decode hexdigest-style output into raw bytes
///
/// Raw digests keep their high bit / non-ASCII bytes with overwhelming
/// probability, so output that is entirely even-length ASCII hex is
/// treated as text.
fn normalize(raw: Vec<u8>) -> Vec<u8> {
    if raw.len() >= 2 && raw.len() % 2 == 0 && raw.iter().all(|b| b.is_ascii_hexdigit()) {
        if let Ok(text) = std::str::from_utf8(&raw) {
            if let Ok(bytes) = hex::decode(text) {
                return bytes;
            }
        }
    }
    raw
}
