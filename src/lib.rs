//! # yggdrasil
//!
//! An incremental Merkle hash tree with audit and consistency proofs.
//!
//! A Merkle tree commits to an ordered sequence of items through a single
//! root hash. yggdrasil keeps that commitment cheap to maintain and cheap
//! to check:
//!
//! - **Incremental growth**: appending a leaf touches only the path to
//!   the root, never the whole structure
//! - **Point updates**: replacing a leaf rehashes its root path in place
//! - **Audit proofs**: logarithmic evidence that one leaf belongs to a
//!   tree with a given root
//! - **Consistency proofs**: logarithmic evidence that an older tree's
//!   state is a prefix of a newer one's
//!
//! ## Example
//!
//! ```
//! use yggdrasil::{Hasher, MerkleTree, verify_leaf_inclusion};
//!
//! let tree = MerkleTree::build(["a", "b", "c"], Hasher::sha256());
//! let root = tree.root_hash().unwrap();
//! let proof = tree.get_proof("b");
//! assert!(verify_leaf_inclusion("b", &proof, &Hasher::sha256(), &root));
//! ```

pub mod model;
pub mod render;
pub mod tree;

mod error;
mod hasher;
mod verify;

pub use error::{Error, Result};
pub use hasher::Hasher;
pub use model::{AuditNode, AuditProof, Digest, Side};
pub use render::{export, render, to_json, ExportNode};
pub use tree::MerkleTree;
pub use verify::{verify_leaf_inclusion, verify_tree_consistency};
