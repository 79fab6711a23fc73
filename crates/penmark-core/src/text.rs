//! Word tokenization and character spans.
//!
//! All spans handed out by the engine are half-open ranges of Unicode scalar
//! values (characters), not bytes, so they line up with what an editor shows.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Letters (including the Latin-1/Latin Extended-A range) with an optional
/// internal apostrophe, so "don't" is a single word.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-zÀ-ž]+(?:'[A-Za-zÀ-ž]+)?").expect("valid word pattern"));

/// Half-open character range `[start, end)` into the submission text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The covered characters of `text`, clamped to its length.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        char_slice(text, self.start, self.end)
    }
}

/// A word token with its character span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Split `text` into word tokens, in document order.
pub fn tokens(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut last_byte = 0;
    let mut chars_before = 0;

    for m in WORD_RE.find_iter(text) {
        chars_before += text[last_byte..m.start()].chars().count();
        let len = m.as_str().chars().count();
        out.push(Token {
            text: m.as_str(),
            span: Span::new(chars_before, chars_before + len),
        });
        chars_before += len;
        last_byte = m.end();
    }

    out
}

/// Number of word tokens in `text`.
pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Slice `text` by character offsets, clamping out-of-range bounds.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let Some(from) = indices.by_ref().nth(start) else {
        return "";
    };
    let to = indices.nth(end - start - 1).unwrap_or(text.len());
    &text[from..to]
}
