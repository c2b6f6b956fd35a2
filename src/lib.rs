mod parsers;
mod phylo;

pub type TreeInt = i64;

pub use parsers::MalformedTree;
pub use parsers::TreeParseError;
pub use parsers::TreeParseResult;
pub use parsers::accessions::AccessionError;
pub use parsers::accessions::AccessionMatches;
pub use parsers::accessions::AccessionResult;
pub use parsers::accessions::match_accessions;
pub use parsers::newick::Relationships;
pub use parsers::newick::extract_relationships;
pub use parsers::newick::normalize_newick;
pub use parsers::newick::parse_reference_tree;
pub use parsers::newick::relationships;
pub use parsers::newick::serialize::ChildrenEntry;
pub use parsers::newick::serialize::children_string;
pub use parsers::newick::serialize::parents_string;
pub use parsers::newick::serialize::parse_children_string;
pub use parsers::newick::serialize::subtrees_string;
pub use parsers::parse_reference_trees;
pub use phylo::Child;
pub use phylo::NodeId;
pub use phylo::NodeKey;
pub use phylo::NodeList;
pub use phylo::NodeListError;
pub use phylo::TreeNode;
