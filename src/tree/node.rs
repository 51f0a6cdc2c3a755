//! Arena-backed tree nodes
//!
//! Parent back-references would form reference cycles under native
//! ownership, so the tree keeps every node in an arena and stores
//! `left`/`right`/`parent` as stable handles. The arena owns all nodes;
//! the tree holds only the root handle and the leaf index.

use crate::model::{Digest, Side};

/// Stable handle to a node in the arena
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// The shared padding sentinel, occupying slot 0 of every arena
///
/// It stands in for the missing right sibling on an odd level. It carries
/// no hash and no parent, and concatenation against it degenerates to
/// "take the real node's hash unchanged".
pub(crate) const PADDING: NodeId = NodeId(0);

/// Node variants
///
/// Concatenation logic pattern-matches on the variant explicitly; padding
/// must never be dereferenced for a hash value.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Leaf {
        hash: Digest,
    },
    Internal {
        hash: Digest,
        left: NodeId,
        right: NodeId,
    },
    Padding,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    /// Back-reference for upward traversal, never for ownership
    pub parent: Option<NodeId>,
}

/// Owner of all nodes in a tree
#[derive(Debug)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            nodes: vec![Node {
                kind: NodeKind::Padding,
                parent: None,
            }],
        }
    }

    /// Drop every node except the padding sentinel
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
    }

    pub fn alloc_leaf(&mut self, hash: Digest) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Leaf { hash },
            parent: None,
        });
        id
    }

    /// Allocate an internal node and claim its real children
    pub fn alloc_internal(&mut self, hash: Digest, left: NodeId, right: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Internal { hash, left, right },
            parent: None,
        });
        self.set_parent(left, id);
        self.set_parent(right, id);
        id
    }

    /// The node's hash; `None` only for padding
    pub fn hash(&self, id: NodeId) -> Option<&Digest> {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf { hash } => Some(hash),
            NodeKind::Internal { hash, .. } => Some(hash),
            NodeKind::Padding => None,
        }
    }

    pub fn set_hash(&mut self, id: NodeId, new: Digest) {
        match &mut self.nodes[id.0].kind {
            NodeKind::Leaf { hash } => *hash = new,
            NodeKind::Internal { hash, .. } => *hash = new,
            NodeKind::Padding => unreachable!("padding carries no hash"),
        }
    }

    /// Child slots; `None` for leaves and padding
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match self.nodes[id.0].kind {
            NodeKind::Internal { left, right, .. } => Some((left, right)),
            _ => None,
        }
    }

    pub fn set_right(&mut self, id: NodeId, child: NodeId) {
        match &mut self.nodes[id.0].kind {
            NodeKind::Internal { right, .. } => *right = child,
            _ => unreachable!("only internal nodes have child slots"),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if id == PADDING {
            return None;
        }
        self.nodes[id.0].parent
    }

    /// Record a parent back-reference; a no-op for the padding sentinel
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if id != PADDING {
            self.nodes[id.0].parent = Some(parent);
        }
    }

    /// The node's position relative to its parent
    pub fn side(&self, id: NodeId) -> Side {
        match self.parent(id) {
            None => Side::Root,
            Some(parent) => {
                let (left, _) = self
                    .children(parent)
                    .expect("a parent is always an internal node");
                if left == id {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }

    /// The other child of this node's parent
    ///
    /// `None` for the root; may be [`PADDING`].
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let (left, right) = self
            .children(parent)
            .expect("a parent is always an internal node");
        Some(if left == id { right } else { left })
    }
}
