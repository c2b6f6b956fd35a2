use crate::TreeInt;
use slotmap::new_key_type;
use std::{fmt::Display, sync::Arc};

new_key_type! { pub struct NodeKey; }

/// Integer identifier the normalizer assigns to an internal node.
///
/// IDs start at [`NodeId::FIRST`] and increase by one for every closing
/// parenthesis in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(TreeInt);

impl NodeId {
    pub const FIRST: NodeId = NodeId(2);

    pub fn new(value: TreeInt) -> Self { Self(value) }
    pub fn value(&self) -> TreeInt { self.0 }
    pub(crate) fn next(&self) -> Self { Self(self.0 + 1) }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One child slot of an internal node.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Child {
    /// A leaf token, carrying its label verbatim.
    Leaf(Arc<str>),
    /// A previously resolved internal node.
    Internal(NodeId),
    /// No token was present in this slot, e.g. `(,A)`.
    #[default]
    Absent,
}

impl Child {
    pub fn leaf(label: impl Into<Arc<str>>) -> Self { Child::Leaf(label.into()) }
    pub fn is_leaf(&self) -> bool { matches!(self, Child::Leaf(_)) }
    pub fn is_absent(&self) -> bool { matches!(self, Child::Absent) }

    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Child::Internal(node_id) => Some(*node_id),
            _ => None,
        }
    }
}

impl Display for Child {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Child::Leaf(label) => write!(f, "{label}"),
            Child::Internal(node_id) => write!(f, "{node_id}"),
            Child::Absent => Ok(()),
        }
    }
}

impl From<NodeId> for Child {
    fn from(node_id: NodeId) -> Self { Child::Internal(node_id) }
}

impl<'a> From<&'a str> for Child {
    fn from(value: &'a str) -> Self {
        match value {
            "" => Child::Absent,
            v => Child::leaf(v),
        }
    }
}

/// An internal node and its two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    id: NodeId,
    left: Child,
    right: Child,
}

impl TreeNode {
    pub fn new(id: NodeId, left: Child, right: Child) -> Self {
        Self { id, left, right }
    }

    pub fn id(&self) -> NodeId { self.id }
    pub fn left(&self) -> &Child { &self.left }
    pub fn right(&self) -> &Child { &self.right }
    pub fn children(&self) -> [&Child; 2] { [&self.left, &self.right] }

    pub fn has_child(&self, child: &Child) -> bool {
        &self.left == child || &self.right == child
    }
}

impl Display for TreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={},{}", self.id, self.left, self.right)
    }
}
