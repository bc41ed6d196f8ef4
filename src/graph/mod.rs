//! Resolved build graph
//!
//! The build tool computes the authoritative graph; this module only loads
//! it and answers scope and existence queries against it.

pub mod traits;
pub mod tree;

pub use traits::{ResolvedGraph, ResolvedNode};
pub use tree::{DependencyTree, TreeNode};
