//! Document-side model: text buffer, edit mapping and the syntax tree
//!
//! These types play the part of the host editor. The highlighting core only
//! talks to them through [`crate::embed::host::EditorView`].

pub mod changes;
pub mod document;
pub mod tree;

pub use changes::{Assoc, ChangeSet, Replacement};
pub use document::{DisplayMode, Document, SelectionRange, TextEdit};
pub use tree::{roles, SyntaxNode, SyntaxTree};
