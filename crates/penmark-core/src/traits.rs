//! The proofing seam: a remote spelling/grammar/style checker.
//!
//! Implemented by the `penmark-proof` crate. The core engine only depends on
//! the [`Proofer`] trait and the result shapes defined here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProofError;
use crate::model::ProofLanguage;
use crate::text::Span;

/// Trait for services that proofread a text.
#[async_trait]
pub trait Proofer: Send + Sync {
    /// Human-readable service name (e.g. "languagetool").
    fn name(&self) -> &str;

    /// Check `text` in the given language variant.
    ///
    /// Implementations return an empty [`ProofResult`] for blank text without
    /// contacting the service.
    async fn check(&self, text: &str, language: ProofLanguage) -> Result<ProofResult, ProofError>;
}

/// Coarse classification of a proofing match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofIssueKind {
    Spelling,
    Grammar,
    Style,
    Other,
}

impl ProofIssueKind {
    /// Spelling and grammar matches are marked in the text.
    pub fn is_highlighted(self) -> bool {
        matches!(self, ProofIssueKind::Spelling | ProofIssueKind::Grammar)
    }
}

/// One match reported by the proofing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofIssue {
    pub kind: ProofIssueKind,
    pub message: String,
    /// Surrounding context of the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub span: Span,
    /// First replacement offered by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A span to mark in the submission text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofToken {
    pub span: Span,
    pub kind: ProofIssueKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofCounts {
    pub spelling: usize,
    pub grammar: usize,
    pub style: usize,
    pub other: usize,
    pub total: usize,
}

impl ProofCounts {
    pub fn record(&mut self, kind: ProofIssueKind) {
        match kind {
            ProofIssueKind::Spelling => self.spelling += 1,
            ProofIssueKind::Grammar => self.grammar += 1,
            ProofIssueKind::Style => self.style += 1,
            ProofIssueKind::Other => self.other += 1,
        }
        self.total += 1;
    }
}

/// Everything a proofing pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofResult {
    pub issues: Vec<ProofIssue>,
    pub tokens_for_highlight: Vec<ProofToken>,
    pub counts: ProofCounts,
}

impl ProofResult {
    /// The shape returned for blank text and for any recovered failure.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from issues, deriving highlight tokens and counts.
    pub fn from_issues(issues: Vec<ProofIssue>) -> Self {
        let mut counts = ProofCounts::default();
        let mut tokens_for_highlight = Vec::new();
        for issue in &issues {
            counts.record(issue.kind);
            if issue.kind.is_highlighted() {
                tokens_for_highlight.push(ProofToken {
                    span: issue.span,
                    kind: issue.kind,
                });
            }
        }
        Self {
            issues,
            tokens_for_highlight,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: ProofIssueKind, start: usize, end: usize) -> ProofIssue {
        ProofIssue {
            kind,
            message: "msg".into(),
            example: None,
            span: Span::new(start, end),
            suggestion: None,
        }
    }

    #[test]
    fn from_issues_counts_every_kind() {
        let result = ProofResult::from_issues(vec![
            issue(ProofIssueKind::Spelling, 0, 3),
            issue(ProofIssueKind::Style, 4, 6),
            issue(ProofIssueKind::Grammar, 7, 9),
            issue(ProofIssueKind::Spelling, 10, 12),
            issue(ProofIssueKind::Other, 13, 14),
        ]);
        assert_eq!(
            result.counts,
            ProofCounts {
                spelling: 2,
                grammar: 1,
                style: 1,
                other: 1,
                total: 5
            }
        );
    }

    #[test]
    fn only_spelling_and_grammar_are_highlighted() {
        let result = ProofResult::from_issues(vec![
            issue(ProofIssueKind::Style, 0, 2),
            issue(ProofIssueKind::Grammar, 3, 5),
        ]);
        assert_eq!(result.tokens_for_highlight.len(), 1);
        assert_eq!(result.tokens_for_highlight[0].span, Span::new(3, 5));
    }

    #[test]
    fn empty_result_shape() {
        let empty = ProofResult::empty();
        assert!(empty.is_empty());
        assert!(empty.tokens_for_highlight.is_empty());
        assert_eq!(empty.counts.total, 0);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&ProofIssueKind::Spelling).unwrap();
        assert_eq!(json, "\"spelling\"");
    }
}
