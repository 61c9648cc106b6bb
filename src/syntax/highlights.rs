//! Token data handed back by a highlighter
//!
//! Defines classified tokens, their line grouping and resolved display styles.

use serde::Serialize;

/// Standard tree-sitter capture names understood by the style palette.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (null, nil)
    "constructor",           // @constructor (new Foo)
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (echo, print)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "keyword.return",        // @keyword.return
    "keyword.function",      // @keyword.function (function, fn)
    "keyword.operator",      // @keyword.operator (and, or)
    "label",                 // @label
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, heredoc)
    "tag",                   // @tag
    "tag.attribute",         // @tag.attribute
    "text",                  // unclassified text
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, string, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin (self, this)
    "variable.parameter",    // @variable.parameter
];

/// Classification given to text no capture claimed
pub const PLAIN: &str = "text";

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A classified token.
///
/// `offset` is in characters from the start of the highlighted content. A
/// token extends to the next token's offset; the last one to the end of the
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightToken {
    pub offset: usize,
    pub classification: String,
}

impl HighlightToken {
    pub fn new(offset: usize, classification: impl Into<String>) -> Self {
        Self {
            offset,
            classification: classification.into(),
        }
    }
}

/// Tokens grouped by source line, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLines {
    pub lines: Vec<Vec<HighlightToken>>,
}

impl TokenLines {
    pub fn new(lines: Vec<Vec<HighlightToken>>) -> Self {
        Self { lines }
    }

    /// All tokens as one ordered sequence
    pub fn flatten(self) -> impl Iterator<Item = HighlightToken> {
        self.lines.into_iter().flatten()
    }

    pub fn token_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

/// Display style resolved for a token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TokenStyle {
    /// Inline style declarations, e.g. `color: #569cd6; font-style: italic`
    pub style: String,
    /// Class names for renderers that style through a stylesheet
    pub classes: Vec<String>,
}

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// Capture name for a highlight ID, plain text for `None`
pub fn highlight_name(id: Option<HighlightId>) -> &'static str {
    id.and_then(|id| HIGHLIGHT_NAMES.get(id as usize).copied())
        .unwrap_or(PLAIN)
}
