//! Local lexical checks: known misspellings and dictionary lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lexicon::{Dictionary, Lexicon};
use crate::text::{self, Span, Token};

/// Suggestion attached to words missing from the dictionary.
pub const UNKNOWN_WORD_SUGGESTION: &str = "check spelling";

/// A flagged word with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalIssue {
    /// Lowercase form of the flagged word.
    pub word: String,
    pub suggestion: String,
    pub count: usize,
}

/// One flagged occurrence, as written in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalToken {
    pub word: String,
    pub suggestion: String,
    pub span: Span,
}

/// Result of a lexical check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalReport {
    /// Issues sorted by descending count, ties in first-seen order.
    pub issues: Vec<LexicalIssue>,
    /// Total flagged occurrences.
    pub total: usize,
    /// Flagged occurrences in document order.
    pub tokens: Vec<LexicalToken>,
}

impl LexicalReport {
    fn from_flags<'a>(flags: impl IntoIterator<Item = (Token<'a>, String)>) -> Self {
        let mut issues: Vec<LexicalIssue> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut tokens = Vec::new();

        for (token, suggestion) in flags {
            let lower = token.text.to_lowercase();
            match index.get(&lower) {
                Some(&i) => issues[i].count += 1,
                None => {
                    index.insert(lower.clone(), issues.len());
                    issues.push(LexicalIssue {
                        word: lower,
                        suggestion: suggestion.clone(),
                        count: 1,
                    });
                }
            }
            tokens.push(LexicalToken {
                word: token.text.to_string(),
                suggestion,
                span: token.span,
            });
        }

        // stable: equal counts keep first-seen order
        issues.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total: tokens.len(),
            issues,
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Flag words found in the lexicon's misspelling map.
pub fn check_spelling(text: &str, lexicon: &Lexicon) -> LexicalReport {
    let flags = text::tokens(text).into_iter().filter_map(|token| {
        let lower = token.text.to_lowercase();
        if lexicon.is_ignored(&lower) {
            return None;
        }
        lexicon
            .correction(&lower)
            .map(|fix| (token, fix.to_string()))
    });
    LexicalReport::from_flags(flags)
}

/// Flag words whose lowercase form is absent from `dictionary`.
///
/// Lookups use the lowercase form, so ordinary words capitalised at the start
/// of a sentence are accepted. Short words, ignored acronyms and known
/// misspellings (reported by [`check_spelling`]) are skipped.
pub fn check_unknown_words(
    text: &str,
    lexicon: &Lexicon,
    dictionary: Option<&Dictionary>,
) -> LexicalReport {
    let Some(dictionary) = dictionary else {
        return LexicalReport::default();
    };

    let flags = text::tokens(text).into_iter().filter_map(|token| {
        if token.text.chars().count() <= 2 {
            return None;
        }
        if token.text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let lower = token.text.to_lowercase();
        if lexicon.is_ignored(&lower) || lexicon.correction(&lower).is_some() {
            return None;
        }
        if dictionary.contains(&lower) {
            return None;
        }
        Some((token, UNKNOWN_WORD_SUGGESTION.to_string()))
    });
    LexicalReport::from_flags(flags)
}
