mod hierarchy;
mod load;
mod pack;
mod parse;

pub use hierarchy::{Hierarchy, SubtreeStats, TreeNode};
pub use load::{LayoutOptions, load_repo_tree};
#[cfg(test)]
pub use load::build_repo_tree;
