//! Region descriptors and node classification

use crate::model::{roles, SyntaxNode};

/// One highlightable span found by the walker.
///
/// Block regions cover the fence interior; inline regions cover the whole
/// `{lang} code` span including the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    pub from: usize,
    pub to: usize,
    pub language: String,
    /// Exact document text of `[from, to)`
    pub content: String,
    /// Inline only: end of the `{lang} ` prefix
    pub hide_tag_to: Option<usize>,
    /// Inline only: collapse `[from, hide_tag_to)`
    pub hide_language_tag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Block,
    Inline,
}

impl RegionDescriptor {
    pub fn block(from: usize, to: usize, language: String, content: String) -> Self {
        Self {
            from,
            to,
            language,
            content,
            hide_tag_to: None,
            hide_language_tag: false,
        }
    }

    pub fn inline(
        from: usize,
        to: usize,
        language: String,
        content: String,
        hide_tag_to: usize,
        hide_language_tag: bool,
    ) -> Self {
        Self {
            from,
            to,
            language,
            content,
            hide_tag_to: Some(hide_tag_to),
            hide_language_tag,
        }
    }

    pub fn kind(&self) -> RegionKind {
        if self.hide_tag_to.is_some() {
            RegionKind::Inline
        } else {
            RegionKind::Block
        }
    }

    /// Start offset and text handed to the highlighter.
    ///
    /// For inline regions this is the code after the `{lang} ` tag.
    pub fn code(&self) -> (usize, &str) {
        let Some(tag_to) = self.hide_tag_to else {
            return (self.from, &self.content);
        };
        let skip = tag_to.saturating_sub(self.from);
        let code = match self.content.char_indices().nth(skip) {
            Some((byte, _)) => &self.content[byte..],
            None => "",
        };
        (tag_to.min(self.to), code)
    }
}

/// A walker output entry, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    Region(RegionDescriptor),
    /// Clear annotations over `[from, to)` without adding any
    Removal { from: usize, to: usize },
}

/// How the walker treats a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// Markup delimiter, never highlighted
    Ignore,
    InlineCandidate,
    BlockBegin,
    BlockEnd,
    BlockInterior,
    Other,
}

/// Classify by node roles. Checks run in priority order.
pub fn classify(node: &SyntaxNode) -> NodeClass {
    if node.has_role(roles::FORMATTING) {
        NodeClass::Ignore
    } else if node.has_role(roles::INLINE_CODE) {
        NodeClass::InlineCandidate
    } else if node.has_role(roles::CODEBLOCK_BEGIN) {
        NodeClass::BlockBegin
    } else if node.has_role(roles::CODEBLOCK_END) {
        NodeClass::BlockEnd
    } else if node.has_role(roles::CODEBLOCK) {
        NodeClass::BlockInterior
    } else {
        NodeClass::Other
    }
}
