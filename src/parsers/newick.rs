pub(crate) mod extract;
pub(crate) mod serialize;

use super::{MalformedTree, TreeParseError, TreeParseResult};
use crate::phylo::NodeId;
use extract::extract_nodes;
pub use serialize::Relationships;

use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use tracing::instrument;

/// Written between an internal node's `)` and its assigned ID.
pub(crate) const NODE_ID_SEPARATOR: char = '-';

/// Checks if a character is a NEWICK structural delimiter.
pub(crate) fn is_structural_delimiter(character: char) -> bool {
    matches!(character, ';' | '(' | ')' | ',')
}

/// Characters that can make up a branch length, e.g. `0.1`, `1e-06`.
fn is_branch_length_char(character: char) -> bool {
    character.is_ascii_digit() || matches!(character, '.' | '-' | '+' | 'e' | 'E')
}

/// Characters of a label written right after a closing parenthesis.
fn is_internal_label_char(character: char) -> bool {
    !is_structural_delimiter(character) && character != ':'
}

fn skip_while(chars: &mut Peekable<Chars<'_>>, predicate: impl Fn(char) -> bool) {
    while chars.next_if(|&c| predicate(c)).is_some() {}
}

/// Reads a NEWICK tree file and returns its normalized form.
///
/// See [normalize_newick] for the format of the returned string.
#[instrument(level = "trace", skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_reference_tree(path: impl AsRef<Path>) -> TreeParseResult<String> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| {
        TreeParseError::Io { path: path.to_path_buf(), source }
    })?;
    let normalized = normalize_newick(&raw)?;
    tracing::debug!(
        path = %path.display(),
        raw_len = raw.len(),
        normalized_len = normalized.len(),
        "normalized reference tree"
    );
    Ok(normalized)
}

/// Normalizes a NEWICK tree string for relationship extraction.
///
/// - Branch lengths (`:0.1`) are removed.
/// - Every `)` is followed by `-` and a unique ID, counting up from 2 in
///   the order the closing parentheses appear. The label an internal node
///   may carry in the source is dropped in favour of its ID.
/// - Whitespace around delimiters, branch lengths and the ends of the text
///   is removed. Whitespace inside a leaf label is kept, so
///   `(Homo sapiens,Mus musculus);` keeps both labels intact.
/// - Anything after the last internal node's ID is replaced with a
///   single `;`.
///
/// `"((A:0.1,B:0.2)C:0.3,D:0.4)E;"` becomes `"((A,B)-2,D)-3;"`.
pub fn normalize_newick(raw: &str) -> TreeParseResult<String> {
    let close_count = raw.bytes().filter(|b| *b == b')').count();
    if close_count == 0 {
        return Err(MalformedTree::NoInternalNodes.into());
    }

    let id_digits = (close_count + 1).ilog10() as usize + 1;
    let mut normalized = String::new();
    normalized.try_reserve(
        raw.len() + close_count * (NODE_ID_SEPARATOR.len_utf8() + id_digits) + 1,
    )?;

    let mut next_id = NodeId::FIRST;
    let mut last_id_end: usize = 0;
    // Whitespace inside a label is held back until the label continues.
    let mut in_label = false;
    let mut pending_space = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(character) = chars.next() {
        match character {
            ':' => {
                in_label = false;
                pending_space.clear();
                skip_while(&mut chars, |c| c.is_ascii_whitespace());
                skip_while(&mut chars, is_branch_length_char);
            }
            ')' => {
                in_label = false;
                pending_space.clear();
                normalized.push(')');
                normalized.push(NODE_ID_SEPARATOR);
                normalized.push_str(&next_id.to_string());
                last_id_end = normalized.len();
                next_id = next_id.next();
                skip_while(&mut chars, is_internal_label_char);
            }
            c if c.is_ascii_whitespace() => {
                if in_label {
                    pending_space.push(c);
                }
            }
            c if is_structural_delimiter(c) => {
                in_label = false;
                pending_space.clear();
                normalized.push(c);
            }
            c => {
                in_label = true;
                normalized.push_str(&pending_space);
                pending_space.clear();
                normalized.push(c);
            }
        }
    }

    normalized.truncate(last_id_end);
    normalized.push(';');
    Ok(normalized)
}

/// Extracts node relationships from normalized tree text.
///
/// Returns the children string immediately followed by the parents string:
///
/// ```text
/// 2=A,B;3=2,D
/// A:2,B:2,2:3,D:3
/// ```
pub fn extract_relationships(tree_text: &str) -> TreeParseResult<String> {
    Ok(relationships(tree_text)?.combined())
}

/// Like [extract_relationships], but keeps the node list and the subtree
/// leaf listing as well.
#[instrument(level = "trace", skip_all, fields(len = tree_text.len()))]
pub fn relationships(tree_text: &str) -> TreeParseResult<Relationships> {
    let nodes = extract_nodes(tree_text)?;
    Ok(Relationships::from_nodes(nodes))
}
