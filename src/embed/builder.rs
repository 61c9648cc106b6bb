//! Token → annotation conversion for one region

use anyhow::ensure;

use super::annotation::StyleAnnotation;
use super::host::Highlighter;
use super::region::RegionDescriptor;
use crate::syntax::HighlightToken;

/// Build the styled annotations for code at `[from, to)`.
///
/// Consecutive tokens tile the range: each one runs to the next token's
/// start and the last one to `to`. The first token is pulled back to `from`
/// so the range is covered even when the highlighter skips leading text.
/// Zero-width tokens are skipped.
pub async fn build<H: Highlighter + ?Sized>(
    highlighter: &H,
    from: usize,
    to: usize,
    language: &str,
    content: &str,
) -> anyhow::Result<Vec<StyleAnnotation>> {
    if language.is_empty() || from >= to {
        return Ok(Vec::new());
    }

    let Some(lines) = highlighter.highlight_tokens(content, language).await? else {
        tracing::debug!(language, from, "highlighter has no result");
        return Ok(Vec::new());
    };

    let tokens: Vec<HighlightToken> = lines.flatten().collect();
    let len = to - from;
    let mut annotations = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1).map_or(len, |n| n.offset);
        ensure!(
            token.offset <= next && next <= len,
            "token offsets out of order or past region end ({} -> {}, len {})",
            token.offset,
            next,
            len
        );
        let start = if i == 0 { 0 } else { token.offset };
        if start == next {
            continue;
        }
        annotations.push(StyleAnnotation::styled(
            from + start,
            from + next,
            highlighter.token_style(token),
        ));
    }

    tracing::trace!(
        language,
        from,
        to,
        annotations = annotations.len(),
        "built region"
    );
    Ok(annotations)
}

/// All annotations for a region: the tag collapse (if any) plus styled code
pub async fn build_region<H: Highlighter + ?Sized>(
    highlighter: &H,
    region: &RegionDescriptor,
) -> anyhow::Result<Vec<StyleAnnotation>> {
    let mut annotations = Vec::new();
    if region.hide_language_tag {
        if let Some(tag_to) = region.hide_tag_to {
            annotations.push(StyleAnnotation::collapse(region.from, tag_to.min(region.to)));
        }
    }

    let (code_from, code) = region.code();
    annotations.extend(build(highlighter, code_from, region.to, &region.language, code).await?);
    Ok(annotations)
}
