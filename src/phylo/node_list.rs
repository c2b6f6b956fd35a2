use super::node::{Child, NodeId, NodeKey, TreeNode};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::sync::Arc;
use thiserror::Error;

/// Append-only arena of internal nodes, kept in construction order.
///
/// Nodes are pushed in postorder: a node can only be added once every
/// internal child it names is already present. Iteration yields the nodes
/// in the order they were pushed.
#[derive(Debug, Default, Clone)]
pub struct NodeList {
    nodes: SlotMap<NodeKey, TreeNode>,
    order: Vec<NodeKey>,
    index: FxHashMap<NodeId, NodeKey>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeListError {
    #[error("Node with NodeId: {0} already exists.")]
    DuplicateNodeId(NodeId),
    #[error("Child node with NodeId: {0} does not exist.")]
    ChildNodeDoesNotExist(NodeId),
    #[error("Node with NodeId: {0} cannot be its own child.")]
    SelfReference(NodeId),
}

impl NodeList {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    pub fn push(&mut self, node: TreeNode) -> Result<NodeKey, NodeListError> {
        let node_id = node.id();
        if self.index.contains_key(&node_id) {
            return Err(NodeListError::DuplicateNodeId(node_id));
        }

        for child_id in node.children().iter().filter_map(|c| c.node_id()) {
            if child_id == node_id {
                return Err(NodeListError::SelfReference(node_id));
            }
            if !self.index.contains_key(&child_id) {
                return Err(NodeListError::ChildNodeDoesNotExist(child_id));
            }
        }

        let key = self.nodes.insert(node);
        self.order.push(key);
        _ = self.index.insert(node_id, key);
        Ok(key)
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.order.iter().filter_map(|key| self.nodes.get(*key))
    }

    pub fn get(&self, node_id: NodeId) -> Option<&TreeNode> {
        self.index.get(&node_id).and_then(|key| self.nodes.get(*key))
    }

    /// The last node pushed; for a complete tree this is the root.
    pub fn root(&self) -> Option<&TreeNode> {
        self.order.last().and_then(|key| self.nodes.get(*key))
    }

    pub fn leaf_count(&self) -> usize {
        self.iter()
            .flat_map(|node| node.children())
            .filter(|child| child.is_leaf())
            .count()
    }

    /// Finds the internal node that holds `child` in one of its slots.
    ///
    /// Leaf labels are not required to be unique; for a repeated label
    /// the earliest parent in construction order is returned.
    pub fn parent_of(&self, child: &Child) -> Option<NodeId> {
        if child.is_absent() {
            return None;
        }
        self.iter().find(|node| node.has_child(child)).map(TreeNode::id)
    }

    /// Leaf labels below every node, left to right, in construction order.
    ///
    /// Computed in one pass: children always precede their parent, so each
    /// internal child's leaf set is already known when its parent is reached.
    pub fn subtree_leaves(&self) -> Vec<(NodeId, Vec<Arc<str>>)> {
        let mut leaves_by_id: FxHashMap<NodeId, Vec<Arc<str>>> =
            FxHashMap::default();
        let mut rv: Vec<(NodeId, Vec<Arc<str>>)> =
            Vec::with_capacity(self.len());

        for node in self.iter() {
            let mut leaves: Vec<Arc<str>> = Vec::new();
            for child in node.children() {
                match child {
                    Child::Leaf(label) => leaves.push(label.clone()),
                    Child::Internal(child_id) => {
                        if let Some(child_leaves) = leaves_by_id.get(child_id)
                        {
                            leaves.extend(child_leaves.iter().cloned());
                        }
                    }
                    Child::Absent => (),
                }
            }
            _ = leaves_by_id.insert(node.id(), leaves.clone());
            rv.push((node.id(), leaves));
        }

        rv
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a TreeNode;
    type IntoIter = Box<dyn Iterator<Item = &'a TreeNode> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
