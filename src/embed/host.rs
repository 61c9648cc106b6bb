//! Interfaces consumed from the host editor and the highlighter service

use async_trait::async_trait;

use super::annotation::StyleAnnotation;
use crate::error::HostError;
use crate::model::{ChangeSet, SelectionRange, SyntaxTree};
use crate::syntax::{HighlightToken, TokenLines, TokenStyle};

/// Read access to the live editor view
pub trait EditorView {
    /// Document length in characters
    fn len_chars(&self) -> usize;

    /// Exact text of `[from, to)`
    fn slice(&self, from: usize, to: usize) -> Result<String, HostError>;

    /// Syntax tree matching the current text
    fn syntax_tree(&self) -> &SyntaxTree;

    /// Current selection ranges
    fn selections(&self) -> &[SelectionRange];

    /// True when markup is hidden in favour of styled output
    fn is_rendered_mode(&self) -> bool;
}

/// Where the controller publishes the current annotation set
pub trait AnnotationSink {
    /// Replace what is rendered with `annotations` (sorted by range)
    fn publish(&mut self, annotations: &[StyleAnnotation]);

    /// Ask the host to re-measure and re-render the view
    fn request_measure(&mut self);
}

/// The external tokenizer.
///
/// Everything runs on one thread; implementations may hold `!Send` state.
#[async_trait(?Send)]
pub trait Highlighter {
    /// Tokenize `content` as `language`.
    ///
    /// `Ok(None)` means the language cannot be highlighted. `Err` is an
    /// internal failure of the highlighter.
    async fn highlight_tokens(
        &self,
        content: &str,
        language: &str,
    ) -> anyhow::Result<Option<TokenLines>>;

    /// Display style for a token. Pure and synchronous.
    fn token_style(&self, token: &HighlightToken) -> TokenStyle;
}

/// What triggered an update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    /// The document changed; carries the mapping of the edit
    Edit(ChangeSet),
    /// Only the selection moved
    Selection,
}

impl UpdateEvent {
    pub fn is_doc_change(&self) -> bool {
        matches!(self, UpdateEvent::Edit(_))
    }
}
