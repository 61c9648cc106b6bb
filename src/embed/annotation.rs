//! Style annotations - the output unit of the core

use serde::Serialize;

use crate::model::ChangeSet;
use crate::syntax::TokenStyle;

/// What an annotation does to its range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationPayload {
    /// Render the range with a style
    Style(TokenStyle),
    /// Replace the range with nothing
    Collapse,
}

/// An immutable `(range, payload)` pair over `[from, to)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleAnnotation {
    pub from: usize,
    pub to: usize,
    pub payload: AnnotationPayload,
}

impl StyleAnnotation {
    pub fn styled(from: usize, to: usize, style: TokenStyle) -> Self {
        Self {
            from,
            to,
            payload: AnnotationPayload::Style(style),
        }
    }

    pub fn collapse(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            payload: AnnotationPayload::Collapse,
        }
    }

    pub fn is_collapse(&self) -> bool {
        matches!(self.payload, AnnotationPayload::Collapse)
    }

    /// Half-open intersection with `[from, to)`
    #[inline]
    pub fn intersects(&self, from: usize, to: usize) -> bool {
        self.from < to && from < self.to
    }

    /// Carry the annotation over an edit; `None` if its text was deleted
    pub fn map(&self, changes: &ChangeSet) -> Option<Self> {
        let (from, to) = changes.map_range(self.from, self.to)?;
        Some(Self {
            from,
            to,
            payload: self.payload.clone(),
        })
    }
}
