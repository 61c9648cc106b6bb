//! Markdown structure
//!
//! Builds the role-labelled [`SyntaxTree`](crate::model::SyntaxTree) the
//! reference document hands to the highlighting core.

mod tree_builder;

pub use tree_builder::build_tree;
