//! Merging of highlight spans from every checker into one non-overlapping list.

use serde::{Deserialize, Serialize};

use crate::spelling::LexicalReport;
use crate::text::Span;
use crate::traits::{ProofIssueKind, ProofResult};

/// Which checker asked for a span to be marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightSource {
    Misspelling,
    UnknownWord,
    RemoteSpelling,
    RemoteGrammar,
}

impl HighlightSource {
    /// CSS class used when rendering.
    pub fn css_class(self) -> &'static str {
        match self {
            HighlightSource::Misspelling => "hl-misspelling",
            HighlightSource::UnknownWord => "hl-unknown",
            HighlightSource::RemoteSpelling => "hl-spelling",
            HighlightSource::RemoteGrammar => "hl-grammar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub span: Span,
    pub source: HighlightSource,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize, source: HighlightSource) -> Self {
        Self {
            span: Span::new(start, end),
            source,
        }
    }
}

/// Collect candidate spans in source order: misspellings, unknown words, proofing.
pub fn collect_highlights(
    spelling: &LexicalReport,
    unknown_words: &LexicalReport,
    proof: Option<&ProofResult>,
) -> Vec<HighlightSpan> {
    let lexical = spelling
        .tokens
        .iter()
        .map(|t| HighlightSpan {
            span: t.span,
            source: HighlightSource::Misspelling,
        })
        .chain(unknown_words.tokens.iter().map(|t| HighlightSpan {
            span: t.span,
            source: HighlightSource::UnknownWord,
        }));

    let remote = proof
        .into_iter()
        .flat_map(|p| p.tokens_for_highlight.iter())
        .filter_map(|t| {
            let source = match t.kind {
                ProofIssueKind::Spelling => HighlightSource::RemoteSpelling,
                ProofIssueKind::Grammar => HighlightSource::RemoteGrammar,
                ProofIssueKind::Style | ProofIssueKind::Other => return None,
            };
            Some(HighlightSpan { span: t.span, source })
        });

    lexical.chain(remote).collect()
}

/// Sort by start (stable) and keep only spans that begin at or after the end
/// of the last kept span. Empty spans are dropped.
pub fn merge_highlights(mut spans: Vec<HighlightSpan>) -> Vec<HighlightSpan> {
    spans.retain(|h| !h.span.is_empty());
    spans.sort_by_key(|h| h.span.start);

    let mut merged: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for h in spans {
        match merged.last() {
            Some(last) if h.span.start < last.span.end => {}
            _ => merged.push(h),
        }
    }
    merged
}
