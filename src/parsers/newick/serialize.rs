use crate::TreeInt;
use crate::parsers::MalformedTree;
use crate::phylo::{NodeList, TreeNode};

use std::fmt::Display;

/// Serialized relationships of one tree.
///
/// Holds the extracted [NodeList] together with the three text maps built
/// from it. [Display] writes the children string followed by the parents
/// string.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    nodes: NodeList,
    children: String,
    parents: String,
    subtrees: String,
}

impl Relationships {
    pub fn from_nodes(nodes: NodeList) -> Self {
        let children = children_string(&nodes);
        let parents = parents_string(&nodes);
        let subtrees = subtrees_string(&nodes);
        Self { nodes, children, parents, subtrees }
    }

    pub fn nodes(&self) -> &NodeList { &self.nodes }

    /// `id=left,right` entries separated by `;`, ending in a newline.
    pub fn children(&self) -> &str { &self.children }

    /// `child:parent` entries separated by `,`, ending in a newline.
    pub fn parents(&self) -> &str { &self.parents }

    /// Space separated leaf labels of each node's subtree, entries
    /// separated by `,`, ending in a newline.
    pub fn subtrees(&self) -> &str { &self.subtrees }

    /// The children string immediately followed by the parents string.
    pub fn combined(&self) -> String {
        let mut rv = String::with_capacity(self.children.len() + self.parents.len());
        rv.push_str(&self.children);
        rv.push_str(&self.parents);
        rv
    }
}

impl Display for Relationships {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.children, self.parents)
    }
}

pub fn children_string(nodes: &NodeList) -> String {
    let mut rv = nodes
        .iter()
        .map(TreeNode::to_string)
        .collect::<Vec<String>>()
        .join(";");
    rv.push('\n');
    rv
}

pub fn parents_string(nodes: &NodeList) -> String {
    let mut rv = nodes
        .iter()
        .flat_map(|node| {
            let id = node.id();
            [format!("{}:{id}", node.left()), format!("{}:{id}", node.right())]
        })
        .collect::<Vec<String>>()
        .join(",");
    rv.push('\n');
    rv
}

pub fn subtrees_string(nodes: &NodeList) -> String {
    let mut rv = nodes
        .subtree_leaves()
        .iter()
        .map(|(_, leaves)| leaves.join(" "))
        .collect::<Vec<String>>()
        .join(",");
    rv.push('\n');
    rv
}

/// One `id=left,right` entry of a children string.
pub type ChildrenEntry = (String, String, String);

/// Parses a children string back into `(id, left, right)` triples.
///
/// Tokens are kept verbatim, so an empty token stays empty and a leaf label
/// that reads like an internal ID stays a plain string. Writing the triples
/// back as `id=left,right` reproduces the input.
pub fn parse_children_string(
    s: &str,
) -> Result<Vec<ChildrenEntry>, MalformedTree> {
    let s = s.trim_end_matches(['\n', '\r']);
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let mut rv: Vec<ChildrenEntry> = Vec::new();
    let mut position: usize = 0;
    for entry in s.split(';') {
        let invalid = || MalformedTree::InvalidEntry {
            position,
            entry: entry.to_string(),
        };

        let (id_text, children) = entry.split_once('=').ok_or_else(invalid)?;
        let (left, right) = children.split_once(',').ok_or_else(invalid)?;
        if id_text.parse::<TreeInt>().is_err() {
            return Err(MalformedTree::InvalidNodeId {
                position,
                text: id_text.to_string(),
            });
        }

        rv.push((id_text.to_string(), left.to_string(), right.to_string()));
        position += entry.len() + 1;
    }

    Ok(rv)
}
