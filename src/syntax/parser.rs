//! Tree-sitter tokenizer for code snippets
//!
//! Manages parsers and highlight queries per language. Grammars are loaded on
//! first use so a document that only ever contains Python never pays for the
//! other grammars.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use super::highlights::{
    highlight_id_for_name, highlight_name, HighlightId, HighlightToken, TokenLines,
};
use super::languages::LanguageId;
use crate::error::HighlightError;

// Phase 1 languages
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const JAVASCRIPT_HIGHLIGHTS: &str = tree_sitter_javascript::HIGHLIGHT_QUERY;
const JSON_HIGHLIGHTS: &str = tree_sitter_json::HIGHLIGHTS_QUERY;

// Phase 2 languages (common)
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const PHP_HIGHLIGHTS: &str = tree_sitter_php::HIGHLIGHTS_QUERY;

// Phase 3 languages (extended) - some crates name it HIGHLIGHT_QUERY (singular)
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;

// Phase 4 languages (specialized)
const SCHEME_HIGHLIGHTS: &str = tree_sitter_racket::HIGHLIGHTS_QUERY;
const INI_HIGHLIGHTS: &str = tree_sitter_ini::HIGHLIGHTS_QUERY;

/// A loaded grammar: parser plus compiled highlight query
struct Grammar {
    parser: Parser,
    query: Query,
}

/// Parser state (tree-sitter parsers are !Sync, keep it on one thread)
#[derive(Default)]
pub struct ParserState {
    /// Grammars loaded so far
    grammars: HashMap<LanguageId, Grammar>,
    /// Languages whose grammar failed to load, with the reason
    failed: HashMap<LanguageId, String>,
}

impl ParserState {
    /// Create an empty parser state; grammars load lazily
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the grammar for `lang` has been loaded successfully
    pub fn is_loaded(&self, lang: LanguageId) -> bool {
        self.grammars.contains_key(&lang)
    }

    fn language_source(lang: LanguageId) -> (Language, &'static str) {
        match lang {
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            LanguageId::JavaScript => (
                tree_sitter_javascript::LANGUAGE.into(),
                JAVASCRIPT_HIGHLIGHTS,
            ),
            LanguageId::Json => (tree_sitter_json::LANGUAGE.into(), JSON_HIGHLIGHTS),
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS),
            LanguageId::Php => (tree_sitter_php::LANGUAGE_PHP.into(), PHP_HIGHLIGHTS),
            LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS),
            LanguageId::Cpp => (tree_sitter_cpp::LANGUAGE.into(), CPP_HIGHLIGHTS),
            LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS),
            LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS),
            LanguageId::Scheme => (tree_sitter_racket::LANGUAGE.into(), SCHEME_HIGHLIGHTS),
            LanguageId::Ini => (tree_sitter_ini::LANGUAGE.into(), INI_HIGHLIGHTS),
        }
    }

    /// Load a language's parser and query
    fn load_grammar(lang: LanguageId) -> Result<Grammar, HighlightError> {
        let (ts_lang, highlights_scm) = Self::language_source(lang);

        let mut parser = Parser::new();
        parser
            .set_language(&ts_lang)
            .map_err(|e| HighlightError::Grammar {
                language: lang.display_name().to_string(),
                message: e.to_string(),
            })?;

        let query = Query::new(&ts_lang, highlights_scm).map_err(|e| HighlightError::Query {
            language: lang.display_name().to_string(),
            message: format!("{:?}", e),
        })?;

        tracing::debug!("Loaded grammar for {:?}", lang);
        Ok(Grammar { parser, query })
    }

    fn grammar(&mut self, lang: LanguageId) -> Result<&mut Grammar, HighlightError> {
        if let Some(message) = self.failed.get(&lang) {
            return Err(HighlightError::Grammar {
                language: lang.display_name().to_string(),
                message: message.clone(),
            });
        }

        if !self.grammars.contains_key(&lang) {
            match Self::load_grammar(lang) {
                Ok(grammar) => {
                    self.grammars.insert(lang, grammar);
                }
                Err(e) => {
                    tracing::error!("Failed to load grammar for {:?}: {}", lang, e);
                    self.failed.insert(lang, e.to_string());
                    return Err(e);
                }
            }
        }

        self.grammars
            .get_mut(&lang)
            .ok_or_else(|| HighlightError::Grammar {
                language: lang.display_name().to_string(),
                message: "grammar missing after load".to_string(),
            })
    }

    /// Tokenize `source` as `lang`.
    ///
    /// The result covers the whole source: every line starts a new token and
    /// text no capture claims is classified as plain text.
    pub fn tokenize(
        &mut self,
        source: &str,
        lang: LanguageId,
    ) -> Result<TokenLines, HighlightError> {
        let grammar = self.grammar(lang)?;
        let tree = grammar
            .parser
            .parse(source, None)
            .ok_or_else(|| HighlightError::Parse {
                language: lang.display_name().to_string(),
            })?;

        // Collect capture spans (byte ranges) that map to a known highlight
        let mut spans: Vec<(usize, usize, HighlightId)> = Vec::new();
        let mut cursor = QueryCursor::new();
        let query = &grammar.query;
        let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];
            let Some(id) = highlight_id_for_name(capture_name) else {
                continue;
            };
            let node = capture.node;
            if node.start_byte() < node.end_byte() {
                spans.push((node.start_byte(), node.end_byte(), id));
            }
        }

        let painted = paint(source.len(), spans);
        let lines = run_length_lines(source, &painted);
        tracing::trace!(
            "Tokenized {} bytes of {:?} into {} lines",
            source.len(),
            lang,
            lines.lines.len()
        );
        Ok(lines)
    }
}

/// Resolve overlapping captures to one highlight per byte.
///
/// Outer nodes are painted first so nested captures override them; for two
/// captures on the same range the first pattern keeps it.
fn paint(len: usize, mut spans: Vec<(usize, usize, HighlightId)>) -> Vec<Option<HighlightId>> {
    spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut painted: Vec<Option<HighlightId>> = vec![None; len];
    let mut previous: Option<(usize, usize)> = None;
    for (start, end, id) in spans {
        if previous == Some((start, end)) {
            continue;
        }
        previous = Some((start, end));
        let end = end.min(len);
        for slot in &mut painted[start.min(end)..end] {
            *slot = Some(id);
        }
    }
    painted
}

/// Turn per-byte highlights into line-grouped tokens with char offsets
fn run_length_lines(source: &str, painted: &[Option<HighlightId>]) -> TokenLines {
    let mut lines = Vec::new();
    let mut current: Vec<HighlightToken> = Vec::new();
    let mut last: Option<Option<HighlightId>> = None;

    for (char_idx, (byte_idx, ch)) in source.char_indices().enumerate() {
        let class = painted.get(byte_idx).copied().flatten();
        if last != Some(class) {
            current.push(HighlightToken::new(char_idx, highlight_name(class)));
            last = Some(class);
        }
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            last = None;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    TokenLines::new(lines)
}
