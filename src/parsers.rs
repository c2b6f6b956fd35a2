pub(crate) mod accessions;
pub(crate) mod newick;

use super::phylo::{NodeId, NodeListError};
use newick::{Relationships, parse_reference_tree, relationships};
use rayon::prelude::*;
use std::collections::TryReserveError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("The reference tree file {} could not be opened for reading: {source}.", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not allocate the tree buffer: {0}.")]
    Allocation(#[from] TryReserveError),
    #[error("Malformed tree: {0}.")]
    MalformedTree(#[from] MalformedTree),
}

/// Structural problems found while normalizing or extracting a tree.
///
/// Positions are byte offsets into the text being scanned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedTree {
    #[error("no internal nodes")]
    NoInternalNodes,
    #[error("closing parenthesis at byte {position} is not followed by a node ID")]
    MissingNodeId { position: usize },
    #[error("node ID \"{text}\" at byte {position} is not a valid integer")]
    InvalidNodeId { position: usize, text: String },
    #[error("unbalanced parentheses at byte {position}")]
    UnbalancedParentheses { position: usize },
    #[error("node {id} at byte {position} has fewer than two children")]
    MissingChildren { position: usize, id: NodeId },
    #[error("node {id} at byte {position} has more than two children")]
    NotBinary { position: usize, id: NodeId },
    #[error("missing ',' before the child at byte {position}")]
    MissingSeparator { position: usize },
    #[error("missing terminating ';'")]
    MissingTerminator,
    #[error("unexpected text after ';' at byte {position}")]
    TrailingText { position: usize },
    #[error("invalid entry \"{entry}\" at byte {position}")]
    InvalidEntry { position: usize, entry: String },
    #[error("invalid node at byte {position}: {source}")]
    InvalidNode {
        position: usize,
        #[source]
        source: NodeListError,
    },
}

pub type TreeParseResult<T> = Result<T, TreeParseError>;

/// Normalizes and extracts relationships from many tree files in parallel.
///
/// Results are returned in the same order as `paths`; a failure for one
/// file does not affect the others.
pub fn parse_reference_trees<P>(paths: &[P]) -> Vec<TreeParseResult<Relationships>>
where
    P: AsRef<Path> + Sync,
{
    tracing::debug!(count = paths.len(), "parsing reference trees");
    paths
        .par_iter()
        .map(|path| {
            let normalized = parse_reference_tree(path)?;
            relationships(&normalized)
        })
        .collect()
}
