//! Markdown → role-labelled syntax tree using pulldown-cmark
//!
//! Fenced code blocks are split into one node per line so the walker sees an
//! opening fence, interior lines and (when present) a closing fence. Inline
//! code spans become a backtick delimiter, the span text and a closing
//! delimiter. All offsets in the resulting tree are character offsets.

use std::cell::Cell;
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::model::tree::{roles, SyntaxNode, SyntaxTree};

const BEGIN_NAME: &str = "codeblock codeblock-begin";
const END_NAME: &str = "codeblock codeblock-end";
const DELIMITER_NAME: &str = "formatting formatting-code";

/// Parse `text` as markdown and build its syntax tree
pub fn build_tree(text: &str) -> SyntaxTree {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let offsets = CharOffsets::new(text);
    let len_chars = offsets.len_chars();

    let mut stack: Vec<SyntaxNode> = vec![SyntaxNode::new(SyntaxTree::ROOT, 0, len_chars)];
    // Depth of the fenced/indented block whose text events we skip
    let mut code_depth: Option<usize> = None;

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                let span = offsets.range(&range);
                let node = match &tag {
                    Tag::CodeBlock(CodeBlockKind::Fenced(_)) => {
                        code_depth = Some(stack.len());
                        SyntaxNode::new("fenced-block", span.start, span.end)
                            .with_children(fence_lines(text, range.clone(), &offsets))
                    }
                    Tag::CodeBlock(CodeBlockKind::Indented) => {
                        code_depth = Some(stack.len());
                        SyntaxNode::new("indented-block", span.start, span.end)
                    }
                    other => SyntaxNode::new(tag_name(other), span.start, span.end),
                };
                stack.push(node);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if code_depth == Some(stack.len() - 1) {
                        code_depth = None;
                    }
                    if let Some(node) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.push(node);
                        }
                    }
                }
            }
            Event::Text(_) if code_depth.is_none() => {
                let span = offsets.range(&range);
                if let Some(parent) = stack.last_mut() {
                    parent.push(SyntaxNode::new("text", span.start, span.end));
                }
            }
            Event::Code(_) => {
                if let Some(parent) = stack.last_mut() {
                    for node in code_span(text, range, &offsets) {
                        parent.push(node);
                    }
                }
            }
            _ => {}
        }
    }

    // Unbalanced events should not happen, but never lose nodes if they do
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.push(node);
            }
        }
    }

    match stack.pop() {
        Some(root) => SyntaxTree::new(root),
        None => SyntaxTree::empty(len_chars),
    }
}

fn tag_name(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::Paragraph => "paragraph",
        Tag::Heading { .. } => "heading",
        Tag::BlockQuote(_) => "blockquote",
        Tag::List(_) => "list",
        Tag::Item => "item",
        Tag::Emphasis => "emphasis",
        Tag::Strong => "strong",
        Tag::Strikethrough => "strikethrough",
        Tag::Link { .. } => "link",
        Tag::Image { .. } => "image",
        Tag::Table(_) => "table",
        Tag::TableHead => "table-head",
        Tag::TableRow => "table-row",
        Tag::TableCell => "table-cell",
        _ => "block",
    }
}

/// Split a fenced block into begin / interior / end line nodes
fn fence_lines(text: &str, range: Range<usize>, offsets: &CharOffsets) -> Vec<SyntaxNode> {
    let block = &text[range.clone()];
    let mut lines: Vec<Range<usize>> = Vec::new();
    let mut start = range.start;
    for piece in block.split_inclusive('\n') {
        let body = piece.trim_end_matches(['\n', '\r']);
        lines.push(start..start + body.len());
        start += piece.len();
    }

    let Some(first) = lines.first() else {
        return Vec::new();
    };
    let opener = strip_prefix_markers(&text[first.clone()]);
    let Some(fence_char) = opener.chars().next() else {
        return Vec::new();
    };
    let fence_len = opener.chars().take_while(|&c| c == fence_char).count();

    let closed = lines.len() > 1
        && lines.last().is_some_and(|last| {
            let candidate = strip_prefix_markers(&text[last.clone()]).trim_end();
            candidate.chars().count() >= fence_len && candidate.chars().all(|c| c == fence_char)
        });
    let interior_end = if closed { lines.len() - 1 } else { lines.len() };

    let mut nodes = Vec::with_capacity(lines.len());
    let span = offsets.range(first);
    nodes.push(SyntaxNode::new(BEGIN_NAME, span.start, span.end));
    let (depth, indent) = fence_prefix(text, first.start);
    for line in &lines[1..interior_end] {
        let skip = interior_prefix(&text[line.clone()], depth, indent);
        let span = offsets.range(&(line.start + skip..line.end));
        nodes.push(SyntaxNode::new(roles::CODEBLOCK, span.start, span.end));
    }
    if closed {
        if let Some(last) = lines.last() {
            let span = offsets.range(last);
            nodes.push(SyntaxNode::new(END_NAME, span.start, span.end));
        }
    }
    nodes
}

/// `>` depth of the line holding the opening fence, and the fence's
/// column inside the innermost container
fn fence_prefix(text: &str, fence_start: usize) -> (usize, usize) {
    let line_start = text[..fence_start].rfind('\n').map_or(0, |i| i + 1);
    let mut rest = &text[line_start..fence_start];
    let mut depth = 0;
    while let Some(after) = rest.trim_start_matches([' ', '\t']).strip_prefix('>') {
        depth += 1;
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    (depth, rest.chars().count())
}

/// Bytes of container prefix in front of an interior fence line: up to
/// `depth` quote markers, then up to `indent` spaces
fn interior_prefix(line: &str, depth: usize, indent: usize) -> usize {
    let mut rest = line;
    for _ in 0..depth {
        match rest.trim_start_matches([' ', '\t']).strip_prefix('>') {
            Some(after) => rest = after.strip_prefix(' ').unwrap_or(after),
            // Lazy continuation line
            None => break,
        }
    }
    let spaces = rest.bytes().take(indent).take_while(|&b| b == b' ').count();
    line.len() - rest.len() + spaces
}

/// Blockquote markers and indentation in front of a fence
fn strip_prefix_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || c == '>')
}

/// Split an inline code event into delimiter / text / delimiter nodes
fn code_span(text: &str, range: Range<usize>, offsets: &CharOffsets) -> Vec<SyntaxNode> {
    let raw = &text[range.clone()];
    let ticks = raw.bytes().take_while(|&b| b == b'`').count();
    let closing = raw.bytes().rev().take_while(|&b| b == b'`').count();

    if ticks == 0 || ticks + closing > raw.len() {
        let span = offsets.range(&range);
        return vec![SyntaxNode::new(roles::INLINE_CODE, span.start, span.end)];
    }

    let inner = range.start + ticks..range.end - closing;
    let mut nodes = Vec::with_capacity(3);
    let open = offsets.range(&(range.start..inner.start));
    nodes.push(SyntaxNode::new(DELIMITER_NAME, open.start, open.end));
    if inner.start < inner.end {
        let span = offsets.range(&inner);
        nodes.push(SyntaxNode::new(roles::INLINE_CODE, span.start, span.end));
    }
    let close = offsets.range(&(inner.end..range.end));
    nodes.push(SyntaxNode::new(DELIMITER_NAME, close.start, close.end));
    nodes
}

/// Byte → char offset conversion with an ASCII fast path.
///
/// Non-ASCII conversions count from the previous conversion point, so a
/// pass over mostly increasing offsets stays linear in the text length.
struct CharOffsets<'a> {
    text: &'a str,
    ascii: bool,
    /// Last converted `(byte, char)` pair
    cursor: Cell<(usize, usize)>,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            ascii: text.is_ascii(),
            cursor: Cell::new((0, 0)),
        }
    }

    fn len_chars(&self) -> usize {
        if self.ascii {
            self.text.len()
        } else {
            count_chars(self.text)
        }
    }

    fn char_at(&self, byte: usize) -> usize {
        if self.ascii {
            return byte;
        }
        let (at_byte, at_char) = self.cursor.get();
        let chars = if byte >= at_byte {
            at_char + count_chars(&self.text[at_byte..byte])
        } else {
            at_char - count_chars(&self.text[byte..at_byte])
        };
        self.cursor.set((byte, chars));
        chars
    }

    fn range(&self, bytes: &Range<usize>) -> Range<usize> {
        self.char_at(bytes.start)..self.char_at(bytes.end)
    }
}

fn count_chars(text: &str) -> usize {
    ropey::str_utils::byte_to_char_idx(text, text.len())
}
