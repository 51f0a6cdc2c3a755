//! Audit proof value types

use crate::model::Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Position of a node relative to its parent
///
/// `Root` is derived for the node with no parent; audit nodes inside a
/// proof are always `Left` or `Right`, and the side decides concatenation
/// order when the proof is replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Root,
}

/// One step of an audit proof: a sibling hash and its side
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditNode {
    pub hash: Digest,
    pub side: Side,
}

impl AuditNode {
    pub fn new(hash: Digest, side: Side) -> Self {
        AuditNode { hash, side }
    }
}

/// An inclusion proof: sibling hashes from a target leaf up to the root
///
/// A proof is a plain value, independent of any live tree. It is
/// meaningful only together with a target leaf and a trusted root hash.
/// An empty proof is what `get_proof` returns for an unknown leaf;
/// replaying it can only succeed for a single-leaf tree whose root is the
/// target itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditProof {
    nodes: Vec<AuditNode>,
}

impl AuditProof {
    /// Create a proof from leaf-to-root ordered audit nodes
    pub fn new(nodes: Vec<AuditNode>) -> Self {
        AuditProof { nodes }
    }

    /// The audit nodes in leaf-to-root order
    pub fn nodes(&self) -> &[AuditNode] {
        &self.nodes
    }

    /// Sibling hashes as hex strings, leaf-to-root
    pub fn hex_nodes(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.hash.to_hex()).collect()
    }

    /// Number of audit nodes (the path length, root excluded)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl PartialEq for AuditProof {
    /// Proofs compare by length and the set of sibling hashes
    fn eq(&self, other: &Self) -> bool {
        if self.nodes.len() != other.nodes.len() {
            return false;
        }
        let ours: BTreeSet<String> = self.hex_nodes().into_iter().collect();
        let theirs: BTreeSet<String> = other.hex_nodes().into_iter().collect();
        ours == theirs
    }
}

impl Eq for AuditProof {}

impl fmt::Display for AuditProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.hex_nodes().join(", "))
    }
}
