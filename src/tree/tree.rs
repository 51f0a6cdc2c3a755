//! Merkle tree construction and maintenance

use super::node::{Arena, NodeId, PADDING};
use crate::hasher::Hasher;
use crate::model::{AuditNode, AuditProof, Digest, Side};
use crate::verify::verify_tree_consistency;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// A Merkle hash tree over a sequence of items
///
/// Each leaf holds the domain-separated hash of one item; each internal
/// node holds the hash of its children's concatenated hashes. The root
/// hash commits to the entire sequence. The tree grows incrementally:
/// [`append`](MerkleTree::append) reuses the existing structure and only
/// recomputes the hashes on the path to the root, mirroring how a binary
/// counter increments: padding slots are open bits waiting to be filled.
///
/// Mutation is single-writer: the structure carries no internal locking,
/// and concurrent mutation must be serialized by the caller. Proof
/// objects and root hashes handed out are plain values and safe to read
/// anywhere.
pub struct MerkleTree {
    hasher: Hasher,
    arena: Arena,
    root: Option<NodeId>,
    /// Canonical left-to-right leaf order
    leaf_order: Vec<NodeId>,
    /// Leaf hash → node handle
    leaf_index: HashMap<Digest, NodeId>,
}

impl MerkleTree {
    /// Create an empty tree using the given hasher
    pub fn new(hasher: Hasher) -> Self {
        MerkleTree {
            hasher,
            arena: Arena::new(),
            root: None,
            leaf_order: Vec::new(),
            leaf_index: HashMap::new(),
        }
    }

    /// Build a tree from an ordered sequence of items
    ///
    /// Leaves are hashed in order, then paired level by level; an odd
    /// level is completed with the padding sentinel. An empty sequence
    /// produces an empty tree with an absent root.
    pub fn build<I>(items: I, hasher: Hasher) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut tree = Self::new(hasher);
        let mut level: Vec<NodeId> = Vec::new();
        for item in items {
            let hash = tree.hasher.hash_leaf(item.as_ref());
            level.push(tree.insert_leaf(hash));
        }
        if level.is_empty() {
            return tree;
        }
        while level.len() > 1 {
            if level.len() % 2 == 1 {
                level.push(PADDING);
            }
            let mut next = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks(2) {
                next.push(tree.combine(pair[0], pair[1]));
            }
            level = next;
        }
        tree.root = Some(level[0]);
        tree
    }

    // === Mutation ===

    /// Append one item to the end of the tree
    pub fn append(&mut self, item: impl AsRef<[u8]>) {
        let hash = self.hasher.hash_leaf(item.as_ref());
        self.append_leaf(hash);
    }

    /// Append an already-hashed leaf
    ///
    /// The digest is taken verbatim; use [`append`](MerkleTree::append)
    /// for raw items.
    pub fn append_leaf(&mut self, hash: Digest) {
        let Some(root) = self.root else {
            let id = self.insert_leaf(hash);
            self.root = Some(id);
            return;
        };

        let last = *self
            .leaf_order
            .last()
            .expect("a rooted tree has at least one leaf");
        let node = self.insert_leaf(hash);

        // single-leaf tree: pair the old root with the new leaf
        if last == root {
            let new_root = self.combine(root, node);
            self.root = Some(new_root);
            return;
        }

        // the last leaf's sibling slot is open: splice the new leaf in
        if self.arena.sibling(last) == Some(PADDING) {
            let parent = self
                .arena
                .parent(last)
                .expect("a non-root leaf has a parent");
            self.arena.set_right(parent, node);
            self.arena.set_parent(node, parent);
            self.rehash_upward(node);
            return;
        }

        // the subtree holding the last leaf is full: climb, pairing the
        // new leaf with padding at each level, until an ancestor with an
        // open sibling slot is found
        let mut node = node;
        let mut connector = self
            .arena
            .parent(last)
            .expect("a non-root leaf has a parent");
        while Some(connector) != self.root {
            node = self.combine(node, PADDING);
            if self.arena.sibling(connector) == Some(PADDING) {
                let graft = self
                    .arena
                    .parent(connector)
                    .expect("a non-root node has a parent");
                self.arena.set_right(graft, node);
                self.arena.set_parent(node, graft);
                self.rehash_upward(node);
                return;
            }
            connector = self
                .arena
                .parent(connector)
                .expect("a non-root node has a parent");
        }

        // no open slot below the root: grow a new level
        node = self.combine(node, PADDING);
        let new_root = self.combine(connector, node);
        self.root = Some(new_root);
    }

    /// Append each item in order
    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for item in items {
            self.append(item);
        }
    }

    /// Append another tree's leaves, preserving their order
    ///
    /// The other tree's leaf digests are appended verbatim, so the result
    /// commits to the concatenation of both leaf sequences.
    pub fn extend_from_tree(&mut self, other: &MerkleTree) {
        for hash in other.leaves() {
            self.append_leaf(hash);
        }
    }

    /// Replace a leaf item, rehashing its path to the root
    ///
    /// Both arguments are raw items and are hashed here. Fails with
    /// [`Error::LeafNotFound`] when `old` is not a current leaf. The
    /// topology is unchanged; only hashes on the leaf-to-root path move.
    pub fn update(&mut self, old: impl AsRef<[u8]>, new: impl AsRef<[u8]>) -> Result<()> {
        let old_hash = self.hasher.hash_leaf(old.as_ref());
        let new_hash = self.hasher.hash_leaf(new.as_ref());
        self.replace_leaf_hash(&old_hash, new_hash)
    }

    /// Replace a leaf by precomputed digests
    ///
    /// Both arguments are taken verbatim as leaf hashes; neither is
    /// hashed again. The counterpart to [`update`](MerkleTree::update)
    /// for callers who pre-hash their items.
    pub fn update_hashed(&mut self, old: &Digest, new: Digest) -> Result<()> {
        self.replace_leaf_hash(old, new)
    }

    /// Reset to an empty tree, keeping the hasher
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.leaf_order.clear();
        self.leaf_index.clear();
    }

    // === Proofs ===

    /// Produce the inclusion proof for a leaf
    ///
    /// The leaf may be given as its precomputed hash bytes or as the raw
    /// item; the lookup tries the hash interpretation first. An unknown
    /// leaf yields an empty proof rather than an error; replayed against
    /// any non-trivial root it simply fails to verify.
    pub fn get_proof(&self, leaf: impl AsRef<[u8]>) -> AuditProof {
        let bytes = leaf.as_ref();
        let target = self
            .leaf_index
            .get(&Digest::from_bytes(bytes.to_vec()))
            .or_else(|| self.leaf_index.get(&self.hasher.hash_leaf(bytes)))
            .copied();
        let Some(mut current) = target else {
            return AuditProof::default();
        };

        let mut nodes = Vec::new();
        while Some(current) != self.root {
            let sibling = self
                .arena
                .sibling(current)
                .expect("a non-root node has a sibling slot");
            if sibling != PADDING {
                let hash = self
                    .arena
                    .hash(sibling)
                    .expect("a real node has a hash")
                    .clone();
                nodes.push(AuditNode::new(hash, self.arena.side(sibling)));
            }
            current = self
                .arena
                .parent(current)
                .expect("a non-root node has a parent");
        }
        AuditProof::new(nodes)
    }

    /// Verify an inclusion proof against this tree's current root
    ///
    /// Always `false` for an empty tree.
    pub fn verify_leaf_inclusion(&self, target: impl AsRef<[u8]>, proof: &AuditProof) -> bool {
        match self.root_hash() {
            Some(root) => {
                crate::verify::verify_leaf_inclusion(target, proof, &self.hasher, &root)
            }
            None => false,
        }
    }

    /// Check that `older`'s committed state is a prefix of this tree
    pub fn consistent_with(&self, older: &MerkleTree) -> Result<bool> {
        let Some(old_root) = older.root_hash() else {
            return Err(Error::InvalidArgument(
                "older tree is empty and commits to nothing".to_string(),
            ));
        };
        verify_tree_consistency(self, &old_root, older.len())
    }

    // === Read accessors ===

    /// The root hash, absent for an empty tree
    pub fn root_hash(&self) -> Option<Digest> {
        self.root.and_then(|id| self.arena.hash(id).cloned())
    }

    /// The root hash as a lowercase hex string
    pub fn root_hex(&self) -> Option<String> {
        self.root_hash().map(|h| h.to_hex())
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.leaf_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_order.is_empty()
    }

    /// Leaf hashes in canonical left-to-right order
    pub fn leaves(&self) -> Vec<Digest> {
        self.leaf_order
            .iter()
            .map(|id| {
                self.arena
                    .hash(*id)
                    .expect("a leaf always has a hash")
                    .clone()
            })
            .collect()
    }

    /// Leaf hashes as hex strings, in canonical order
    pub fn leaves_hex(&self) -> Vec<String> {
        self.leaves().iter().map(Digest::to_hex).collect()
    }

    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    // === Internal helpers ===

    fn insert_leaf(&mut self, hash: Digest) -> NodeId {
        let id = self.arena.alloc_leaf(hash.clone());
        self.leaf_order.push(id);
        self.leaf_index.insert(hash, id);
        id
    }

    /// Create a parent over two child slots using the concatenation rule
    fn combine(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let hash = self.effective_hash(left, right);
        self.arena.alloc_internal(hash, left, right)
    }

    /// The concatenation rule: a padding child contributes nothing, the
    /// real child's hash passes through unchanged; two real children are
    /// hashed in slot order
    fn effective_hash(&self, left: NodeId, right: NodeId) -> Digest {
        match (left == PADDING, right == PADDING) {
            (false, true) => self
                .arena
                .hash(left)
                .expect("a real node has a hash")
                .clone(),
            (true, false) => self
                .arena
                .hash(right)
                .expect("a real node has a hash")
                .clone(),
            (false, false) => {
                let l = self.arena.hash(left).expect("a real node has a hash");
                let r = self.arena.hash(right).expect("a real node has a hash");
                self.hasher.hash_children(l, r)
            }
            (true, true) => unreachable!("padding is never paired with padding"),
        }
    }

    /// Restore the hash invariant on every ancestor of `from`, bottom-up
    fn rehash_upward(&mut self, from: NodeId) {
        let mut current = from;
        while let Some(parent) = self.arena.parent(current) {
            let (left, right) = self
                .arena
                .children(parent)
                .expect("a parent is always an internal node");
            let hash = self.effective_hash(left, right);
            self.arena.set_hash(parent, hash);
            current = parent;
        }
    }

    fn replace_leaf_hash(&mut self, old: &Digest, new: Digest) -> Result<()> {
        let id = self
            .leaf_index
            .remove(old)
            .ok_or_else(|| Error::LeafNotFound(old.to_hex()))?;
        self.arena.set_hash(id, new.clone());
        self.leaf_index.insert(new, id);
        self.rehash_upward(id);
        Ok(())
    }

    // === Crate-internal surface for the verifier and renderer ===

    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn leaf_id_at(&self, index: usize) -> Option<NodeId> {
        self.leaf_order.get(index).copied()
    }

    pub(crate) fn node_hash(&self, id: NodeId) -> Option<&Digest> {
        self.arena.hash(id)
    }

    /// Real (non-padding) children of a node, left to right
    pub(crate) fn real_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.arena.children(id) {
            Some((left, right)) => [left, right]
                .into_iter()
                .filter(|&child| child != PADDING)
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn side_of(&self, id: NodeId) -> Side {
        self.arena.side(id)
    }

    /// The ancestor `levels` steps above `id`, if the tree is tall enough
    pub(crate) fn climb(&self, id: NodeId, levels: u32) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..levels {
            current = self.arena.parent(current)?;
        }
        Some(current)
    }
}

impl Default for MerkleTree {
    fn default() -> Self {
        MerkleTree::new(Hasher::default())
    }
}

impl PartialEq for MerkleTree {
    /// Trees compare by root hash; two empty trees are equal
    fn eq(&self, other: &Self) -> bool {
        self.root_hash() == other.root_hash()
    }
}

impl PartialEq<&str> for MerkleTree {
    /// A tree equals a hex string when the string is its root hash
    fn eq(&self, other: &&str) -> bool {
        match Digest::from_hex(other) {
            Ok(digest) => self.root_hash() == Some(digest),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("root", &self.root_hex())
            .field("leaves", &self.len())
            .finish()
    }
}
