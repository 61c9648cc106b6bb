//! Document model - the text buffer observed by the highlighting core
//!
//! A rope-backed markdown document with selection ranges and a display mode.
//! Every edit reparses the markdown structure and returns the [`ChangeSet`]
//! the controller needs to carry existing annotations over the edit.

use ropey::Rope;

use super::changes::{Assoc, ChangeSet, Replacement};
use super::tree::SyntaxTree;
use crate::embed::host::EditorView;
use crate::error::{HostError, Result};
use crate::markdown::build_tree;

/// A selection range in character offsets. `anchor == head` is a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection at `offset`
    pub fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    #[inline]
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    #[inline]
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// True if this selection touches the closed interval `[from, to]`
    pub fn touches(&self, from: usize, to: usize) -> bool {
        self.from() <= to && self.to() >= from
    }
}

/// How the editor currently presents markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Markup hidden in favour of styled output
    #[default]
    Rendered,
    /// Raw markdown source
    Source,
}

/// An edit in old-document coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl TextEdit {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }
}

/// Document state - the text buffer, selection and derived syntax tree
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    selections: Vec<SelectionRange>,
    mode: DisplayMode,
    tree: SyntaxTree,
    /// Incremented on each edit
    pub revision: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text, cursor at the start
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            selections: vec![SelectionRange::cursor(0)],
            mode: DisplayMode::default(),
            tree: build_tree(text),
            revision: 0,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::with_text(&content))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Replace the selection. Ranges are clamped to the document.
    pub fn set_selections(&mut self, selections: Vec<SelectionRange>) {
        let len = self.buffer.len_chars();
        self.selections = selections
            .into_iter()
            .map(|s| SelectionRange::new(s.anchor.min(len), s.head.min(len)))
            .collect();
    }

    /// Collapse the selection to a cursor at `offset`
    pub fn set_cursor(&mut self, offset: usize) {
        self.set_selections(vec![SelectionRange::cursor(offset)]);
    }

    /// Replace `[from, to)` with `insert`
    pub fn apply_edit(&mut self, from: usize, to: usize, insert: &str) -> Result<ChangeSet> {
        self.apply_edits(vec![TextEdit::new(from, to, insert)])
    }

    /// Apply several non-overlapping edits given in old-document coordinates
    pub fn apply_edits(&mut self, mut edits: Vec<TextEdit>) -> Result<ChangeSet> {
        let len = self.buffer.len_chars();
        for edit in &edits {
            if edit.from > edit.to {
                return Err(HostError::InvertedRange {
                    from: edit.from,
                    to: edit.to,
                });
            }
            if edit.to > len {
                return Err(HostError::OutOfBounds {
                    from: edit.from,
                    to: edit.to,
                    len,
                });
            }
        }

        // Apply back to front so earlier offsets stay valid
        edits.sort_by_key(|e| std::cmp::Reverse((e.from, e.to)));
        if let Some(pair) = edits.windows(2).find(|pair| pair[1].to > pair[0].from) {
            return Err(HostError::OverlappingEdits {
                first: (pair[1].from, pair[1].to),
                second: (pair[0].from, pair[0].to),
            });
        }
        for edit in &edits {
            self.buffer.remove(edit.from..edit.to);
            self.buffer.insert(edit.from, &edit.insert);
        }

        let changes = ChangeSet::from_replacements(
            edits
                .iter()
                .map(|e| Replacement {
                    from: e.from,
                    to: e.to,
                    inserted: e.insert.chars().count(),
                })
                .collect(),
        );

        self.selections = self
            .selections
            .iter()
            .map(|s| {
                SelectionRange::new(
                    changes.map_pos(s.anchor, Assoc::After),
                    changes.map_pos(s.head, Assoc::After),
                )
            })
            .collect();
        self.revision += 1;
        self.reparse();

        tracing::trace!(
            revision = self.revision,
            delta = changes.len_delta(),
            "document edited"
        );
        Ok(changes)
    }

    fn reparse(&mut self) {
        self.tree = build_tree(&self.buffer.to_string());
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorView for Document {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn slice(&self, from: usize, to: usize) -> Result<String> {
        if from > to {
            return Err(HostError::InvertedRange { from, to });
        }
        let len = self.buffer.len_chars();
        if to > len {
            return Err(HostError::OutOfBounds { from, to, len });
        }
        Ok(self.buffer.slice(from..to).to_string())
    }

    fn syntax_tree(&self) -> &SyntaxTree {
        &self.tree
    }

    fn selections(&self) -> &[SelectionRange] {
        &self.selections
    }

    fn is_rendered_mode(&self) -> bool {
        self.mode == DisplayMode::Rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edit_returns_mapping() {
        let mut doc = Document::with_text("hello world");
        let changes = doc.apply_edit(5, 5, ",").unwrap();
        assert_eq!(doc.text(), "hello, world");
        assert_eq!(changes.map_pos(6, Assoc::Before), 7);
        assert_eq!(doc.revision, 1);
    }

    #[test]
    fn test_apply_edits_back_to_front() {
        let mut doc = Document::with_text("abcdef");
        doc.apply_edits(vec![TextEdit::new(0, 1, "XX"), TextEdit::new(4, 6, "")])
            .unwrap();
        assert_eq!(doc.text(), "XXbcd");
    }

    #[test]
    fn test_edit_out_of_bounds_is_error() {
        let mut doc = Document::with_text("abc");
        let err = doc.apply_edit(1, 9, "x").unwrap_err();
        assert_eq!(
            err,
            HostError::OutOfBounds {
                from: 1,
                to: 9,
                len: 3
            }
        );
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_overlapping_edits_are_error() {
        let mut doc = Document::with_text("0123456789");
        let err = doc
            .apply_edits(vec![TextEdit::new(0, 10, ""), TextEdit::new(5, 6, "")])
            .unwrap_err();
        assert_eq!(
            err,
            HostError::OverlappingEdits {
                first: (0, 10),
                second: (5, 6)
            }
        );
        assert_eq!(doc.text(), "0123456789");
        assert_eq!(doc.revision, 0);

        // Touching edits are fine
        doc.apply_edits(vec![TextEdit::new(0, 5, "a"), TextEdit::new(5, 10, "b")])
            .unwrap();
        assert_eq!(doc.text(), "ab");
    }

    #[test]
    fn test_selection_follows_edit() {
        let mut doc = Document::with_text("abc");
        doc.set_cursor(2);
        doc.apply_edit(0, 0, "zz").unwrap();
        assert_eq!(doc.selections(), &[SelectionRange::cursor(4)]);
    }

    #[test]
    fn test_tree_reparsed_after_edit() {
        let mut doc = Document::with_text("text");
        doc.apply_edit(4, 4, " `code`").unwrap();
        assert!(doc
            .syntax_tree()
            .walk()
            .any(|n| n.has_role(crate::model::tree::roles::INLINE_CODE)));
    }

    #[test]
    fn test_slice_checks_bounds() {
        let doc = Document::with_text("abc");
        assert_eq!(doc.slice(1, 3).unwrap(), "bc");
        assert!(doc.slice(2, 1).is_err());
        assert!(doc.slice(0, 4).is_err());
    }
}
