//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::oneshot;

use fenced::config::HighlightConfig;
use fenced::embed::{
    AnnotationPayload, AnnotationSink, EditorView, Highlighter, StyleAnnotation, UpdateController,
};
use fenced::model::Document;
use fenced::syntax::{HighlightToken, TokenLines, TokenStyle};

/// Deterministic highlighter for tests.
///
/// Splits content into `word` / `space` tokens, one line per source line.
/// Languages can be made to fail or report no result, and individual
/// contents can be held back until a gate is released.
#[derive(Default)]
pub struct ScriptedHighlighter {
    failing: HashSet<String>,
    unsupported: HashSet<String>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    calls: Cell<usize>,
}

impl ScriptedHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, language: &str) -> Self {
        self.failing.insert(language.to_string());
        self
    }

    pub fn unsupported(mut self, language: &str) -> Self {
        self.unsupported.insert(language.to_string());
        self
    }

    /// Hold back the next request for `content` until the sender fires
    pub fn gate(&self, content: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(content.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

/// `word`/`space` tokens with char offsets
pub fn word_tokens(content: &str) -> TokenLines {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut last: Option<bool> = None;
    for (i, ch) in content.chars().enumerate() {
        let is_space = ch.is_whitespace();
        if last != Some(is_space) {
            current.push(HighlightToken::new(i, if is_space { "space" } else { "word" }));
            last = Some(is_space);
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

#[async_trait(?Send)]
impl Highlighter for ScriptedHighlighter {
    async fn highlight_tokens(
        &self,
        content: &str,
        language: &str,
    ) -> anyhow::Result<Option<TokenLines>> {
        self.calls.set(self.calls.get() + 1);

        let gate = self.gates.borrow_mut().remove(content);
        if let Some(gate) = gate {
            gate.await?;
        }

        if self.failing.contains(language) {
            anyhow::bail!("scripted failure for {language}");
        }
        if self.unsupported.contains(language) {
            return Ok(None);
        }
        Ok(Some(word_tokens(content)))
    }

    fn token_style(&self, token: &HighlightToken) -> TokenStyle {
        TokenStyle {
            style: format!("class: {}", token.classification),
            classes: vec![token.classification.clone()],
        }
    }
}

/// Records every publish and measure request
#[derive(Default)]
pub struct RecordingSink {
    pub published: Vec<Vec<StyleAnnotation>>,
    pub measures: usize,
}

impl RecordingSink {
    pub fn last(&self) -> &[StyleAnnotation] {
        self.published.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl AnnotationSink for RecordingSink {
    fn publish(&mut self, annotations: &[StyleAnnotation]) {
        self.published.push(annotations.to_vec());
    }

    fn request_measure(&mut self) {
        self.measures += 1;
    }
}

pub type TestController = UpdateController<ScriptedHighlighter, RecordingSink>;

pub fn controller() -> TestController {
    controller_with(ScriptedHighlighter::new(), HighlightConfig::default())
}

pub fn controller_with(highlighter: ScriptedHighlighter, config: HighlightConfig) -> TestController {
    UpdateController::new(highlighter, RecordingSink::default(), config)
}

/// Document with the cursor parked at the end, away from any span
pub fn doc(text: &str) -> Document {
    let mut doc = Document::with_text(text);
    let end = doc.len_chars();
    doc.set_cursor(end);
    doc
}

/// Char offset of the first occurrence of `needle`
pub fn offset_of(doc: &Document, needle: &str) -> usize {
    let text = doc.text();
    let byte = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not in document"));
    text[..byte].chars().count()
}

/// `(covered text, label)` for each annotation
pub fn labelled(doc: &Document, annotations: &[StyleAnnotation]) -> Vec<(String, String)> {
    annotations
        .iter()
        .map(|a| {
            let label = match &a.payload {
                AnnotationPayload::Collapse => "collapse".to_string(),
                AnnotationPayload::Style(style) => style.classes.join(" "),
            };
            (doc.slice(a.from, a.to).unwrap(), label)
        })
        .collect()
}

/// Styled annotations inside `[from, to)`
pub fn styled_within(annotations: &[StyleAnnotation], from: usize, to: usize) -> Vec<StyleAnnotation> {
    annotations
        .iter()
        .filter(|a| !a.is_collapse() && a.from >= from && a.to <= to)
        .cloned()
        .collect()
}

/// Assert the styled annotations exactly tile `[from, to)`
pub fn assert_tiles(annotations: &[StyleAnnotation], from: usize, to: usize) {
    let styled = styled_within(annotations, from, to);
    assert!(!styled.is_empty(), "no annotations in {from}..{to}");
    assert_eq!(styled[0].from, from, "first annotation starts late");
    for pair in styled.windows(2) {
        assert_eq!(pair[0].to, pair[1].from, "gap or overlap at {}", pair[0].to);
    }
    assert_eq!(styled[styled.len() - 1].to, to, "last annotation ends early");
}

/// Assert no two annotations overlap
pub fn assert_disjoint(annotations: &[StyleAnnotation]) {
    for pair in annotations.windows(2) {
        assert!(
            pair[0].to <= pair[1].from,
            "{:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}
