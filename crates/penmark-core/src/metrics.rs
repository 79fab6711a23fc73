//! Text metrics extracted from a submission.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, LinkMatcher};
use crate::text;

/// Measurements of a submission, recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    /// Word tokens (contractions count once).
    pub words: usize,
    /// Blocks of non-blank lines separated by blank lines.
    pub paragraphs: usize,
    /// Distinct linking expressions present.
    pub linking_words: usize,
    /// Total contraction occurrences.
    pub contractions: usize,
    /// Distinct tokens divided by total tokens.
    pub type_token_ratio: f64,
    /// Distinct formality cues present.
    pub formality_cues: usize,
}

impl TextMetrics {
    pub fn compute(text: &str, lexicon: &Lexicon) -> Self {
        let lower = text.to_lowercase();
        Self {
            words: text::word_count(text),
            paragraphs: paragraph_count(text),
            linking_words: linking_word_count(&lower, lexicon),
            contractions: contraction_count(text, lexicon),
            type_token_ratio: type_token_ratio(&lower),
            formality_cues: formality_cue_count(&lower, lexicon),
        }
    }
}

/// Count blocks of consecutive non-blank lines.
pub fn paragraph_count(text: &str) -> usize {
    let mut blocks = 0;
    let mut in_block = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_block = false;
        } else if !in_block {
            blocks += 1;
            in_block = true;
        }
    }
    if blocks == 0 && !text.trim().is_empty() {
        return 1;
    }
    blocks
}

/// Distinct linking expressions in an already-lowercased text.
pub fn linking_word_count(lower: &str, lexicon: &Lexicon) -> usize {
    let padded = format!(" {lower} ");
    lexicon
        .linking()
        .iter()
        .filter(|(_, matcher)| match matcher {
            LinkMatcher::Phrase(phrase) => padded.contains(phrase.as_str()),
            LinkMatcher::Word(re) => re.is_match(&padded),
        })
        .count()
}

pub fn contraction_count(text: &str, lexicon: &Lexicon) -> usize {
    lexicon
        .contraction_re()
        .map_or(0, |re| re.find_iter(text).count())
}

/// Distinct lowercase tokens over total tokens; 0 when there are no tokens.
pub fn type_token_ratio(lower: &str) -> f64 {
    let tokens = text::tokens(lower);
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&str> = tokens.iter().map(|t| t.text).collect();
    distinct.len() as f64 / tokens.len() as f64
}

/// Distinct formality cues in an already-lowercased text.
pub fn formality_cue_count(lower: &str, lexicon: &Lexicon) -> usize {
    lexicon
        .formality_cues()
        .iter()
        .filter(|cue| lower.contains(cue.as_str()))
        .count()
}
