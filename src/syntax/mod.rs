//! Syntax highlighting module
//!
//! Tree-sitter grammars behind the [`Highlighter`](crate::embed::Highlighter)
//! seam:
//! - Language lookup from fence tags (`rs`, `py`, `js`, ...)
//! - Lazily loaded grammars and highlight queries
//! - Token production in the run-length line format the core consumes
//! - An LRU cache in front of any highlighter
//!
//! ## Flow
//!
//! ```text
//! region content + tag → LanguageId::from_tag → ParserState::tokenize
//!                      → TokenLines → (cache) → HighlightBuilder
//! ```

mod highlights;
mod languages;
mod parser;
mod service;

pub use highlights::{
    highlight_id_for_name, highlight_name, HighlightId, HighlightToken, TokenLines, TokenStyle,
    HIGHLIGHT_NAMES, PLAIN,
};
pub use languages::LanguageId;
pub use parser::ParserState;
pub use service::{CachedHighlighter, TreeSitterHighlighter};
