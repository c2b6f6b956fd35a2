use super::NODE_ID_SEPARATOR;
use crate::parsers::MalformedTree;
use crate::phylo::{Child, NodeId, NodeList, TreeNode};

use std::iter::Peekable;
use std::str::CharIndices;

/// Entry on the extraction stack.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// An opening parenthesis whose node is not resolved yet.
    Open,
    /// A leaf, a resolved internal node, or an empty slot.
    Child(Child),
}

/// Tracks what was seen since the last structural delimiter.
///
/// A `,` or `)` that directly follows `(` or `,` closes an empty child
/// slot; the same delimiter after a resolved internal node does not.
#[derive(Debug, Default)]
struct ScanState {
    stack: Vec<Token>,
    label_start: Option<usize>,
    expecting_child: bool,
}

impl ScanState {
    fn flush_label(&mut self, s: &str, position: usize) {
        if let Some(start) = self.label_start.take() {
            self.stack.push(Token::Child(Child::leaf(&s[start..position])));
            self.expecting_child = false;
        }
    }

    fn close_slot(&mut self, s: &str, position: usize) {
        if self.label_start.is_some() {
            self.flush_label(s, position);
        } else if self.expecting_child {
            self.stack.push(Token::Child(Child::Absent));
        }
    }

    /// A new child may only start after `(`, `,` or at the top level.
    fn begin_child(&self, position: usize) -> Result<(), MalformedTree> {
        match self.stack.last() {
            Some(Token::Child(_)) if !self.expecting_child => {
                Err(MalformedTree::MissingSeparator { position })
            }
            _ => Ok(()),
        }
    }

    fn pop_child(
        &mut self,
        position: usize,
        id: NodeId,
    ) -> Result<Child, MalformedTree> {
        match self.stack.pop() {
            Some(Token::Child(child)) => Ok(child),
            Some(Token::Open) => {
                Err(MalformedTree::MissingChildren { position, id })
            }
            None => Err(MalformedTree::UnbalancedParentheses { position }),
        }
    }

    /// Pops the two children of the node closed at `position` and the
    /// parenthesis that opened it.
    fn resolve(
        &mut self,
        position: usize,
        id: NodeId,
    ) -> Result<TreeNode, MalformedTree> {
        let right = self.pop_child(position, id)?;
        let left = self.pop_child(position, id)?;
        match self.stack.pop() {
            Some(Token::Open) => Ok(TreeNode::new(id, left, right)),
            Some(Token::Child(_)) => {
                Err(MalformedTree::NotBinary { position, id })
            }
            None => Err(MalformedTree::UnbalancedParentheses { position }),
        }
    }
}

/// Reads the ID written after the `)` at `position`.
fn read_node_id(
    s: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    position: usize,
) -> Result<NodeId, MalformedTree> {
    _ = chars.next_if(|&(_, c)| c == NODE_ID_SEPARATOR);

    let start = match chars.peek() {
        Some(&(start, c)) if c.is_ascii_digit() => start,
        _ => return Err(MalformedTree::MissingNodeId { position }),
    };
    let mut end = start;
    while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        end = i + c.len_utf8();
    }

    let text = &s[start..end];
    text.parse().map(NodeId::new).map_err(|_| MalformedTree::InvalidNodeId {
        position: start,
        text: text.to_string(),
    })
}

/// Builds the node list from normalized tree text.
///
/// The text is scanned once. Labels and `(` are pushed on a stack; every
/// `)` pops its two children and the matching `(`, records the node, and
/// pushes the node's own ID back so the enclosing level sees it as an
/// ordinary child. A complete tree leaves exactly one token: the root.
pub(crate) fn extract_nodes(s: &str) -> Result<NodeList, MalformedTree> {
    let s = s.trim_end();
    let close_count = s.bytes().filter(|b| *b == b')').count();
    let mut nodes = NodeList::with_capacity(close_count);
    let mut state = ScanState::default();
    let mut chars = s.char_indices().peekable();
    let mut terminated = false;

    while let Some((position, character)) = chars.next() {
        if terminated {
            return Err(MalformedTree::TrailingText { position });
        }
        match character {
            '(' => {
                state.flush_label(s, position);
                state.begin_child(position)?;
                state.stack.push(Token::Open);
                state.expecting_child = true;
            }
            ',' => {
                state.close_slot(s, position);
                state.expecting_child = true;
            }
            ')' => {
                state.close_slot(s, position);
                state.expecting_child = false;
                let id = read_node_id(s, &mut chars, position)?;
                let node = state.resolve(position, id)?;
                _ = nodes.push(node).map_err(|source| {
                    MalformedTree::InvalidNode { position, source }
                })?;
                state.stack.push(Token::Child(id.into()));
            }
            ';' => {
                state.flush_label(s, position);
                terminated = true;
            }
            _ => {
                if state.label_start.is_none() {
                    state.begin_child(position)?;
                    state.label_start = Some(position);
                }
            }
        }
    }

    if !terminated {
        return Err(MalformedTree::MissingTerminator);
    }
    if nodes.is_empty() {
        return Err(MalformedTree::NoInternalNodes);
    }
    match state.stack.as_slice() {
        [Token::Child(Child::Internal(_))] => (),
        _ => {
            return Err(MalformedTree::UnbalancedParentheses {
                position: s.len(),
            });
        }
    }

    tracing::debug!(
        internal_nodes = nodes.len(),
        leaves = nodes.leaf_count(),
        "extracted node relationships"
    );
    Ok(nodes)
}
