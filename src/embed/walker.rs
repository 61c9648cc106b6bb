//! Tree walk producing region descriptors
//!
//! A single pre-order pass over the syntax tree. Inline code spans yield an
//! inline region or a removal; fenced blocks accumulate their interior lines
//! between a begin and an end fence and yield one block region each.

use std::sync::LazyLock;

use regex::Regex;

use super::host::EditorView;
use super::region::{classify, NodeClass, RegionDescriptor, WalkItem};
use crate::error::HostError;

/// Per-walk switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Block regions are only produced when the document changed
    pub doc_changed: bool,
    pub inline_highlighting: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            doc_changed: true,
            inline_highlighting: true,
        }
    }
}

/// `{lang} code` inside an inline code span
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\{(\S+)\} (.*)$").expect("valid inline tag pattern"));

/// Language after an opening fence
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\S+)").expect("valid fence pattern"));

/// Language of `{lang} code`, if the text has that shape
pub fn inline_language(text: &str) -> Option<&str> {
    INLINE_TAG
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Language named on a fence-open line, empty if none
pub fn fence_language(line: &str) -> &str {
    FENCE_OPEN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Walk the view's tree in document order.
///
/// Fails if a node lies outside the document or the view cannot slice it.
pub fn walk<V: EditorView + ?Sized>(
    view: &V,
    options: WalkOptions,
) -> Result<Vec<WalkItem>, HostError> {
    let len = view.len_chars();
    let mut items = Vec::new();
    let mut language = String::new();
    // First interior line start, last interior line end
    let mut interior: Option<(usize, usize)> = None;

    for node in view.syntax_tree().walk() {
        if node.from() > node.to() || node.to() > len {
            return Err(HostError::NodeOutOfBounds {
                name: node.name().to_string(),
                from: node.from(),
                to: node.to(),
                len,
            });
        }

        match classify(node) {
            NodeClass::Ignore => {}
            NodeClass::InlineCandidate => {
                items.push(inline_item(view, node.from(), node.to(), options)?);
            }
            _ if !options.doc_changed => {}
            NodeClass::BlockInterior => {
                interior = Some(match interior {
                    Some((from, _)) => (from, node.to()),
                    None => (node.from(), node.to()),
                });
            }
            NodeClass::BlockBegin => {
                let line = view.slice(node.from(), node.to())?;
                language = fence_language(&line).to_string();
                tracing::trace!(from = node.from(), language = %language, "fence open");
            }
            NodeClass::BlockEnd => {
                if let Some((from, to)) = interior.take() {
                    if !language.is_empty() && from < to {
                        let content = view.slice(from, to)?;
                        items.push(WalkItem::Region(RegionDescriptor::block(
                            from,
                            to,
                            std::mem::take(&mut language),
                            content,
                        )));
                    }
                }
                language.clear();
            }
            NodeClass::Other => {}
        }
    }

    tracing::trace!(items = items.len(), doc_changed = options.doc_changed, "walk done");
    Ok(items)
}

fn inline_item<V: EditorView + ?Sized>(
    view: &V,
    from: usize,
    to: usize,
    options: WalkOptions,
) -> Result<WalkItem, HostError> {
    if !options.inline_highlighting {
        return Ok(WalkItem::Removal { from, to });
    }

    let text = view.slice(from, to)?;
    let Some(language) = inline_language(&text) else {
        return Ok(WalkItem::Removal { from, to });
    };

    let hide_tag_to = from + language.chars().count() + 3;
    let near_selection = view
        .selections()
        .iter()
        .any(|sel| sel.touches(from.saturating_sub(1), to + 1));
    let hide_language_tag = view.is_rendered_mode() && !near_selection;

    Ok(WalkItem::Region(RegionDescriptor::inline(
        from,
        to,
        language.to_string(),
        text.clone(),
        hide_tag_to,
        hide_language_tag,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayMode, Document};

    fn regions(items: &[WalkItem]) -> Vec<&RegionDescriptor> {
        items
            .iter()
            .filter_map(|item| match item {
                WalkItem::Region(r) => Some(r),
                WalkItem::Removal { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_patterns() {
        assert_eq!(inline_language("{js} 1+1"), Some("js"));
        assert_eq!(inline_language("{js}1+1"), None);
        assert_eq!(inline_language("plain text"), None);
        assert_eq!(fence_language("```python"), "python");
        assert_eq!(fence_language("```"), "");
        assert_eq!(fence_language("~~~python"), "");
    }

    #[test]
    fn test_block_region_covers_interior() {
        let doc = Document::with_text("```python\nprint(1)\nx = 2\n```\n");
        let items = walk(&doc, WalkOptions::default()).unwrap();
        let found = regions(&items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].language, "python");
        assert_eq!(found[0].from, 10);
        assert_eq!(found[0].content, "print(1)\nx = 2");
    }

    #[test]
    fn test_untagged_and_unclosed_blocks_are_skipped() {
        let doc = Document::with_text("```\nplain\n```\n\n```rust\nfn main() {}\n");
        let items = walk(&doc, WalkOptions::default()).unwrap();
        assert!(regions(&items).is_empty());
    }

    #[test]
    fn test_empty_block_is_skipped() {
        let doc = Document::with_text("```rust\n```\n");
        let items = walk(&doc, WalkOptions::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_selection_only_walk_skips_blocks() {
        let doc = Document::with_text("```rust\nlet x = 1;\n```\n\n`{js} 1+1`\n");
        let options = WalkOptions {
            doc_changed: false,
            ..WalkOptions::default()
        };
        let items = walk(&doc, options).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(regions(&items)[0].language, "js");
    }

    #[test]
    fn test_inline_tag_hidden_away_from_cursor() {
        let mut doc = Document::with_text("See `{js} 1+1` and more text here");
        doc.set_cursor(30);
        let items = walk(&doc, WalkOptions::default()).unwrap();
        let region = regions(&items)[0];
        assert_eq!(region.from, 5);
        assert_eq!(region.hide_tag_to, Some(10));
        assert!(region.hide_language_tag);
    }

    #[test]
    fn test_inline_tag_shown_near_cursor() {
        let mut doc = Document::with_text("See `{js} 1+1` and more");
        // Just after the closing backtick
        doc.set_cursor(14);
        let items = walk(&doc, WalkOptions::default()).unwrap();
        assert!(!regions(&items)[0].hide_language_tag);
    }

    #[test]
    fn test_inline_tag_shown_in_source_mode() {
        let mut doc = Document::with_text("See `{js} 1+1` and more text here");
        doc.set_cursor(30);
        doc.set_display_mode(DisplayMode::Source);
        let items = walk(&doc, WalkOptions::default()).unwrap();
        assert!(!regions(&items)[0].hide_language_tag);
    }

    #[test]
    fn test_plain_inline_is_removal() {
        let doc = Document::with_text("a `plain text` b");
        let items = walk(&doc, WalkOptions::default()).unwrap();
        assert_eq!(items, vec![WalkItem::Removal { from: 3, to: 13 }]);
    }

    #[test]
    fn test_inline_disabled_is_removal() {
        let doc = Document::with_text("a `{js} 1` b");
        let options = WalkOptions {
            inline_highlighting: false,
            ..WalkOptions::default()
        };
        let items = walk(&doc, options).unwrap();
        assert_eq!(items, vec![WalkItem::Removal { from: 3, to: 9 }]);
    }
}
