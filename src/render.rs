//! Human-readable tree rendering and export
//!
//! Read-only collaborators over the tree's public surface: a box-drawing
//! diagram for terminals and a generic `name`/`children` document for
//! tree-exchange tooling. Padding slots are omitted: they carry no hash
//! and are an implementation detail of unbalanced levels.

use crate::tree::{MerkleTree, NodeId};
use crate::Result;
use serde::{Deserialize, Serialize};

/// One node of the exported tree document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportNode {
    /// Hex hash of the node
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExportNode>,
}

/// Export the tree as a nested node-name document
///
/// `None` for an empty tree.
pub fn export(tree: &MerkleTree) -> Option<ExportNode> {
    tree.root_id().map(|root| export_node(tree, root))
}

/// Export the tree as pretty-printed JSON (`null` for an empty tree)
pub fn to_json(tree: &MerkleTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export(tree))?)
}

/// Render the tree as a box-drawing diagram of hex node names
///
/// The root is on the first line; children hang below it, left before
/// right. An empty tree renders as an empty string.
pub fn render(tree: &MerkleTree) -> String {
    let Some(root) = tree.root_id() else {
        return String::new();
    };
    let mut out = String::new();
    out.push_str(&name_of(tree, root));
    out.push('\n');
    render_children(tree, &tree.real_children(root), "", &mut out);
    out
}

fn export_node(tree: &MerkleTree, id: NodeId) -> ExportNode {
    ExportNode {
        name: name_of(tree, id),
        children: tree
            .real_children(id)
            .into_iter()
            .map(|child| export_node(tree, child))
            .collect(),
    }
}

fn render_children(tree: &MerkleTree, children: &[NodeId], prefix: &str, out: &mut String) {
    for (i, &child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&name_of(tree, child));
        out.push('\n');
        let deeper = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_children(tree, &tree.real_children(child), &deeper, out);
    }
}

fn name_of(tree: &MerkleTree, id: NodeId) -> String {
    tree.node_hash(id)
        .expect("rendered nodes are real nodes")
        .to_hex()
}
