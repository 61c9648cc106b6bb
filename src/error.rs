//! Error types for the highlighting core

use thiserror::Error;

/// Host precondition violations.
///
/// These mean the editor handed over state the core cannot make sense of
/// (a tree that does not match the text, a range past the end of the
/// document). They are never swallowed: the controller returns them to the
/// caller and logs them at error level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("range {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },

    #[error("inverted range {from}..{to}")]
    InvertedRange { from: usize, to: usize },

    #[error("edit at {}..{} overlaps edit at {}..{}", first.0, first.1, second.0, second.1)]
    OverlappingEdits {
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("syntax node `{name}` at {from}..{to} does not fit the document (length {len})")]
    NodeOutOfBounds {
        name: String,
        from: usize,
        to: usize,
        len: usize,
    },
}

/// Failures inside a highlighter implementation.
///
/// Contained at the region boundary: a failing region is logged and left
/// unhighlighted, the rest of the cycle continues.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("failed to load grammar for {language}: {message}")]
    Grammar { language: String, message: String },

    #[error("failed to compile highlight query for {language}: {message}")]
    Query { language: String, message: String },

    #[error("parser produced no tree for {language}")]
    Parse { language: String },
}

/// Result alias for host-facing operations
pub type Result<T> = std::result::Result<T, HostError>;
