//! Highlighter implementations
//!
//! [`TreeSitterHighlighter`] tokenizes with the bundled grammars.
//! [`CachedHighlighter`] memoizes any highlighter by `(language, content)`.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;

use super::highlights::{HighlightToken, TokenLines, TokenStyle};
use super::languages::LanguageId;
use super::parser::ParserState;
use crate::embed::Highlighter;
use crate::theme::StylePalette;

/// Highlighter backed by tree-sitter grammars
pub struct TreeSitterHighlighter {
    state: RefCell<ParserState>,
    palette: StylePalette,
}

impl TreeSitterHighlighter {
    pub fn new(palette: StylePalette) -> Self {
        Self {
            state: RefCell::new(ParserState::new()),
            palette,
        }
    }
}

impl Default for TreeSitterHighlighter {
    fn default() -> Self {
        Self::new(StylePalette::default())
    }
}

#[async_trait(?Send)]
impl Highlighter for TreeSitterHighlighter {
    async fn highlight_tokens(
        &self,
        content: &str,
        language: &str,
    ) -> anyhow::Result<Option<TokenLines>> {
        let Some(lang) = LanguageId::from_tag(language) else {
            tracing::debug!(language, "no grammar for language tag");
            return Ok(None);
        };

        // Let other cycles progress before a potentially long parse
        tokio::task::yield_now().await;

        let lines = self.state.borrow_mut().tokenize(content, lang)?;
        tracing::trace!(
            language = lang.display_name(),
            tokens = lines.token_count(),
            "tokenized region"
        );
        Ok(Some(lines))
    }

    fn token_style(&self, token: &HighlightToken) -> TokenStyle {
        self.palette.style_for(&token.classification)
    }
}

type CacheKey = (String, String);

/// LRU memoization in front of another highlighter.
///
/// "No result" answers are cached too; errors are not.
pub struct CachedHighlighter<H> {
    inner: H,
    cache: RefCell<Option<LruCache<CacheKey, Option<TokenLines>>>>,
}

impl<H> CachedHighlighter<H> {
    /// `capacity == 0` disables caching
    pub fn new(inner: H, capacity: usize) -> Self {
        Self {
            inner,
            cache: RefCell::new(NonZeroUsize::new(capacity).map(LruCache::new)),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Number of cached entries
    pub fn cached(&self) -> usize {
        self.cache.borrow().as_ref().map_or(0, |c| c.len())
    }

    pub fn clear(&self) {
        if let Some(cache) = self.cache.borrow_mut().as_mut() {
            cache.clear();
        }
    }
}

#[async_trait(?Send)]
impl<H: Highlighter> Highlighter for CachedHighlighter<H> {
    async fn highlight_tokens(
        &self,
        content: &str,
        language: &str,
    ) -> anyhow::Result<Option<TokenLines>> {
        let key = (language.to_string(), content.to_string());
        if let Some(cache) = self.cache.borrow_mut().as_mut() {
            if let Some(hit) = cache.get(&key) {
                tracing::trace!(language, "token cache hit");
                return Ok(hit.clone());
            }
        }

        // The cache is not borrowed across the await
        let result = self.inner.highlight_tokens(content, language).await?;

        if let Some(cache) = self.cache.borrow_mut().as_mut() {
            cache.put(key, result.clone());
        }
        Ok(result)
    }

    fn token_style(&self, token: &HighlightToken) -> TokenStyle {
        self.inner.token_style(token)
    }
}
