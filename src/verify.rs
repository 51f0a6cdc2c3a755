//! Proof verification
//!
//! These functions are the security boundary against adversarial input:
//! a malformed proof is never an error, it is a `false` verdict. Errors
//! are reserved for caller misuse (an older size larger than the tree).
//! Inclusion verification needs no live tree at all, only the proof, a
//! hasher, and a trusted root.

use crate::hasher::Hasher;
use crate::model::{AuditProof, Digest, Side};
use crate::tree::MerkleTree;
use crate::{Error, Result};

/// Verify that a tree with the trusted root includes a leaf
///
/// Replays the proof from the target upward, concatenating each sibling
/// on its recorded side. The target may be the leaf's precomputed hash or
/// the raw item: the hash interpretation is tried first, then the item is
/// hashed and the replay retried. Returns `true` iff either
/// interpretation reproduces the trusted root.
pub fn verify_leaf_inclusion(
    target: impl AsRef<[u8]>,
    proof: &AuditProof,
    hasher: &Hasher,
    root: &Digest,
) -> bool {
    let target = target.as_ref();
    let replay = |start: Digest| {
        proof.nodes().iter().fold(start, |acc, node| match node.side {
            Side::Left => hasher.hash_children(&node.hash, &acc),
            _ => hasher.hash_children(&acc, &node.hash),
        })
    };

    if replay(Digest::from_bytes(target.to_vec())) == *root {
        return true;
    }
    replay(hasher.hash_leaf(target)) == *root
}

/// Verify that an older tree's state is a prefix of a newer tree's state
///
/// `old_root` and `old_size` describe the older tree; `new_tree` is the
/// live newer tree. The older leaf count is decomposed into descending
/// powers of two; each block is covered by exactly one subtree root in
/// the newer tree, found by climbing `log2(block)` levels from the
/// block's first leaf. Folding those roots right-to-left under the
/// concatenation rule reconstructs what the old root must have been.
///
/// Fails with [`Error::InvalidArgument`] when the newer tree holds fewer
/// leaves than claimed for the older one, or when `old_size` is zero.
/// A decomposition step that finds no ancestor at the required level
/// means the tree shape is incompatible with the claim: `Ok(false)`.
pub fn verify_tree_consistency(
    new_tree: &MerkleTree,
    old_root: &Digest,
    old_size: usize,
) -> Result<bool> {
    let new_size = new_tree.len();
    if old_size == 0 {
        return Err(Error::InvalidArgument(
            "old tree size must be at least one leaf".to_string(),
        ));
    }
    if new_size < old_size {
        return Err(Error::InvalidArgument(format!(
            "newer tree has {new_size} leaves, fewer than the claimed older size {old_size}"
        )));
    }

    // equal sizes: consistency reduces to root equality
    if new_size == old_size {
        return Ok(new_tree.root_hash().as_ref() == Some(old_root));
    }

    let mut index = 0;
    let mut remaining = old_size;
    let mut subroots = Vec::new();
    while remaining > 0 {
        let block = prev_pow2(remaining);
        let Some(leaf) = new_tree.leaf_id_at(index) else {
            return Ok(false);
        };
        let Some(node) = new_tree.climb(leaf, block.trailing_zeros()) else {
            return Ok(false);
        };
        subroots.push(node);
        index += block;
        remaining -= block;
    }

    let hasher = new_tree.hasher();
    let mut rev = subroots.into_iter().rev();
    let first = rev.next().expect("old_size > 0 yields at least one block");
    let Some(mut acc) = new_tree.node_hash(first).cloned() else {
        return Ok(false);
    };
    for id in rev {
        let Some(hash) = new_tree.node_hash(id) else {
            return Ok(false);
        };
        // earlier blocks sit to the left of everything accumulated so far
        acc = match new_tree.side_of(id) {
            Side::Right => hasher.hash_children(&acc, hash),
            _ => hasher.hash_children(hash, &acc),
        };
    }
    Ok(acc == *old_root)
}

/// Largest power of two less than or equal to `n`
fn prev_pow2(n: usize) -> usize {
    debug_assert!(n > 0);
    1 << (usize::BITS - 1 - n.leading_zeros())
}
