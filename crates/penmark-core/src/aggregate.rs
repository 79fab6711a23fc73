//! Combines the rubric scorecard with every checker's output.

use serde::{Deserialize, Serialize};

use crate::grammar::GrammarReport;
use crate::highlight::{collect_highlights, merge_highlights, HighlightSpan};
use crate::scoring::Scorecard;
use crate::spelling::LexicalReport;
use crate::traits::ProofResult;

/// Complete evaluation of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    #[serde(flatten)]
    pub scorecard: Scorecard,
    pub spelling: LexicalReport,
    pub unknown_words: LexicalReport,
    pub grammar: GrammarReport,
    /// Absent when proofing was not attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofResult>,
    /// Non-overlapping spans to mark, ordered by start.
    pub highlights: Vec<HighlightSpan>,
}

impl EvalResult {
    pub fn total(&self) -> u32 {
        self.scorecard.total
    }

    /// Local plus remote issue occurrences.
    pub fn issue_count(&self) -> usize {
        self.spelling.total
            + self.unknown_words.total
            + self.grammar.total
            + self.proof.as_ref().map_or(0, |p| p.counts.total)
    }
}

/// Assemble the final result and compute its merged highlights.
pub fn aggregate(
    scorecard: Scorecard,
    spelling: LexicalReport,
    unknown_words: LexicalReport,
    grammar: GrammarReport,
    proof: Option<ProofResult>,
) -> EvalResult {
    let highlights = merge_highlights(collect_highlights(
        &spelling,
        &unknown_words,
        proof.as_ref(),
    ));
    EvalResult {
        scorecard,
        spelling,
        unknown_words,
        grammar,
        proof,
        highlights,
    }
}
