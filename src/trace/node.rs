//! Syntax nodes and the node tree
//!
//! A producer identifies every instrumented construct with a [`SyntaxNode`].
//! Only the parent link is transmitted; child lists are derived here.

use super::location::SourceRange;
use rustc_hash::FxHashMap;

/// Unique identifier for syntax nodes
pub type NodeId = usize;

/// A lexical construct in the simulated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub range: SourceRange,
}

impl SyntaxNode {
    pub fn new(id: NodeId, parent_id: Option<NodeId>, range: SourceRange) -> Self {
        SyntaxNode {
            id,
            parent_id,
            range,
        }
    }
}

/// Immutable tree of syntax nodes indexed by id
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<SyntaxNode>,
    by_id: FxHashMap<NodeId, usize>,
    children: FxHashMap<NodeId, Vec<NodeId>>,
}

impl NodeTree {
    pub fn new(nodes: Vec<SyntaxNode>) -> Self {
        let mut by_id = FxHashMap::default();
        let mut children: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();

        for (position, node) in nodes.iter().enumerate() {
            by_id.insert(node.id, position);
            if let Some(parent) = node.parent_id {
                children.entry(parent).or_default().push(node.id);
            }
        }

        NodeTree {
            nodes,
            by_id,
            children,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.by_id.get(&id).map(|&position| &self.nodes[position])
    }

    pub fn parent(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.get(id)?.parent_id.and_then(|parent| self.get(parent))
    }

    /// Ids of the direct children of `id`, in producer order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walk from `id`'s parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node.id);
            Some(node)
        })
    }

    /// Nodes without a (known) parent
    pub fn roots(&self) -> impl Iterator<Item = &SyntaxNode> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.parent_id.map_or(true, |parent| !self.by_id.contains_key(&parent)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxNode> + '_ {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
