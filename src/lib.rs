//! fenced - embedded code highlighting for live markdown documents
//!
//! This crate finds fenced code blocks and inline `` `{lang} code` `` spans
//! in a markdown syntax tree, tokenizes them with tree-sitter and keeps a
//! per-view set of style annotations in sync while the document is edited.

pub mod cli;
pub mod config;
pub mod embed;
pub mod error;
pub mod markdown;
pub mod model;
pub mod syntax;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::HighlightConfig;
pub use embed::{
    AnnotationPayload, AnnotationSink, CycleReport, EditorView, Highlighter, StyleAnnotation,
    UpdateController, UpdateEvent,
};
pub use error::{HighlightError, HostError};
pub use model::{ChangeSet, DisplayMode, Document, SelectionRange};
pub use syntax::{CachedHighlighter, TreeSitterHighlighter};
pub use theme::StylePalette;
