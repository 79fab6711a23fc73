//! Fixed-rule grammar and punctuation heuristics.
//!
//! These rules are deliberately shallow: they look at adjacent tokens and
//! punctuation, never at sentence structure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;

static LOWER_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("valid pattern"));
static LOWERCASE_I_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").expect("valid pattern"));
static A_BEFORE_VOWEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\ba\s+[aeiou]\w*").expect("valid pattern"));
static AN_BEFORE_CONSONANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\ban\s+[b-df-hj-np-tv-z]\w*").expect("valid pattern"));
static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid pattern"));
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid pattern"));
static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s[,.;:!?]").expect("valid pattern"));

const EXAMPLE_CHARS: usize = 40;

/// Which heuristic produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarRule {
    RepeatedWord,
    LowercaseI,
    ArticleMismatch,
    SentenceStartLower,
    MissingEndPunctuation,
    DoubleSpace,
    SpaceBeforePunctuation,
    NoSpaceAfterPunctuation,
    SubjectVerbAgreement,
}

/// All occurrences of one rule, aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub rule: GrammarRule,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarReport {
    pub issues: Vec<GrammarIssue>,
    /// Sum of all issue counts.
    pub total: usize,
}

impl GrammarReport {
    /// Record `count` occurrences, merging with an existing (rule, message) entry.
    fn add(&mut self, rule: GrammarRule, message: &str, example: Option<String>, count: usize) {
        if count == 0 {
            return;
        }
        self.total += count;
        if let Some(existing) = self
            .issues
            .iter_mut()
            .find(|i| i.rule == rule && i.message == message)
        {
            existing.count += count;
            return;
        }
        self.issues.push(GrammarIssue {
            rule,
            message: message.to_string(),
            example,
            count,
        });
    }

    pub fn count_of(&self, rule: GrammarRule) -> usize {
        self.issues
            .iter()
            .filter(|i| i.rule == rule)
            .map(|i| i.count)
            .sum()
    }
}

/// Run every heuristic over `text`.
pub fn check_grammar(text: &str, lexicon: &Lexicon) -> GrammarReport {
    let mut report = GrammarReport::default();
    let lower = text.to_lowercase();

    let (repeats, example) = repeated_words(&lower);
    report.add(GrammarRule::RepeatedWord, "Repeated word", example, repeats);

    report.add(
        GrammarRule::LowercaseI,
        "Pronoun 'I' should be capitalized",
        Some("i".to_string()),
        LOWERCASE_I_RE.find_iter(text).count(),
    );

    let bad_a: Vec<&str> = A_BEFORE_VOWEL_RE.find_iter(&lower).map(|m| m.as_str()).collect();
    let bad_an: Vec<&str> = AN_BEFORE_CONSONANT_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .collect();
    report.add(
        GrammarRule::ArticleMismatch,
        "Use 'a' before a consonant sound and 'an' before a vowel sound",
        bad_a.first().or(bad_an.first()).map(|m| m.trim().to_string()),
        bad_a.len() + bad_an.len(),
    );

    let sentences = split_sentences(text);
    let lower_starts: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|s| s.chars().next().is_some_and(|c| c.is_ascii_lowercase()))
        .collect();
    report.add(
        GrammarRule::SentenceStartLower,
        "Sentence should start with a capital letter",
        lower_starts.first().map(|s| shorten(s)),
        lower_starts.len(),
    );
    report.add(
        GrammarRule::MissingEndPunctuation,
        "Finish sentences with . ! or ?",
        None,
        sentences
            .iter()
            .filter(|s| !s.ends_with(['.', '!', '?']))
            .count(),
    );

    report.add(
        GrammarRule::DoubleSpace,
        "Use a single space between words",
        None,
        MULTI_SPACE_RE.find_iter(text).count(),
    );
    report.add(
        GrammarRule::SpaceBeforePunctuation,
        "No space before punctuation",
        None,
        SPACE_BEFORE_PUNCT_RE.find_iter(text).count(),
    );
    report.add(
        GrammarRule::NoSpaceAfterPunctuation,
        "Add a space after punctuation",
        None,
        missing_space_after(text),
    );

    let agreement: Vec<&str> = lexicon
        .agreement_re()
        .map(|re| re.find_iter(text).map(|m| m.as_str()).collect())
        .unwrap_or_default();
    report.add(
        GrammarRule::SubjectVerbAgreement,
        "Use 3rd person singular: he/she/it + verb-s (e.g. 'he works')",
        agreement.first().map(|m| m.to_string()),
        agreement.len(),
    );

    report
}

/// Count adjacent identical words separated only by whitespace.
fn repeated_words(lower: &str) -> (usize, Option<String>) {
    let mut count = 0;
    let mut example = None;
    let mut prev: Option<regex::Match<'_>> = None;

    for cur in LOWER_WORD_RE.find_iter(lower) {
        if let Some(p) = prev {
            let gap = &lower[p.end()..cur.start()];
            if !gap.is_empty()
                && gap.chars().all(char::is_whitespace)
                && p.as_str() == cur.as_str()
            {
                count += 1;
                example.get_or_insert_with(|| lower[p.start()..cur.end()].to_string());
                // a pair is consumed; "the the the" counts once
                prev = None;
                continue;
            }
        }
        prev = Some(cur);
    }

    (count, example)
}

/// Trimmed, non-empty sentences: split on line breaks and after terminal
/// punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut last = 0;
        for m in SENTENCE_BREAK_RE.find_iter(line) {
            out.push(&line[last..m.start() + 1]);
            last = m.end();
        }
        out.push(&line[last..]);
    }
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `, : ;` directly followed by a non-whitespace character.
fn missing_space_after(text: &str) -> usize {
    let mut chars = text.chars().peekable();
    let mut count = 0;
    while let Some(c) = chars.next() {
        if matches!(c, ',' | ':' | ';') && chars.peek().is_some_and(|next| !next.is_whitespace()) {
            count += 1;
        }
    }
    count
}

fn shorten(s: &str) -> String {
    if s.chars().count() <= EXAMPLE_CHARS {
        return s.to_string();
    }
    let cut: String = s.chars().take(EXAMPLE_CHARS).collect();
    format!("{cut}...")
}
