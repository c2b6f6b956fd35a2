mod node;
mod node_list;

pub use node::{Child, NodeId, NodeKey, TreeNode};
pub use node_list::{NodeList, NodeListError};
