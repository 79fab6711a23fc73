//! Fixed word lists and the external dictionary.
//!
//! A [`Lexicon`] is built once (see [`Lexicon::standard`]) and passed by
//! reference into the stateless checks. It also owns the regexes derived from
//! its lists so that they are compiled exactly once.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const LINKING_WORDS: &[&str] = &[
    "firstly",
    "secondly",
    "however",
    "moreover",
    "therefore",
    "in addition",
    "for example",
    "for instance",
    "on the other hand",
    "as a result",
    "furthermore",
    "nevertheless",
    "in conclusion",
    "to sum up",
];

const CONTRACTIONS: &[&str] = &[
    "I'm", "I've", "I'd", "I'll", "isn't", "aren't", "don't", "doesn't", "didn't", "won't",
    "can't", "couldn't", "shouldn't", "it's", "that's", "there's", "we're", "they're",
];

const FORMALITY_CUES: &[&str] = &[
    "dear sir or madam",
    "to whom it may concern",
    "i am writing to",
    "yours faithfully",
    "yours sincerely",
    "best regards",
    "regards",
    "introduction",
    "findings",
    "recommendations",
    "conclusion",
    "background",
    "analysis",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "for", "of", "in", "on", "at", "with", "about", "from",
    "is", "are", "be", "as", "by", "that", "this", "these", "those",
];

const MISSPELLINGS: &[(&str, &str)] = &[
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occurence", "occurrence"),
    ("adress", "address"),
    ("accomodation", "accommodation"),
    ("acheive", "achieve"),
    ("beleive", "believe"),
    ("enviroment", "environment"),
    ("goverment", "government"),
    ("independant", "independent"),
    ("inteligent", "intelligent"),
    ("neccessary", "necessary"),
    ("posession", "possession"),
    ("recomend", "recommend"),
    ("suceed", "succeed"),
    ("thier", "their"),
    ("teh", "the"),
    ("embarass", "embarrass"),
    ("publically", "publicly"),
    ("arguement", "argument"),
    ("concensus", "consensus"),
    ("liason", "liaison"),
    ("maintanance", "maintenance"),
];

/// Acronyms and abbreviations that are never reported by the lexical checks.
const IGNORED_TOKENS: &[&str] = &[
    "nato", "stanag", "un", "eu", "uk", "usa", "hq", "ok", "id", "cv", "faq", "pc", "tv", "ceo",
];

const BASE_VERBS: &[&str] = &[
    "do", "go", "need", "want", "say", "work", "write", "use", "think", "plan", "ask", "tell",
    "make", "like", "call", "know", "see", "seem", "look", "take", "give", "move", "help",
    "require", "expect", "include",
];

static STANDARD: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_lists(LexiconLists::standard()).expect("standard lexicon patterns are valid")
});

/// Raw word lists a [`Lexicon`] is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconLists {
    pub linking_words: Vec<String>,
    pub contractions: Vec<String>,
    pub formality_cues: Vec<String>,
    pub stop_words: Vec<String>,
    pub misspellings: Vec<(String, String)>,
    pub ignored: Vec<String>,
    pub base_verbs: Vec<String>,
}

impl LexiconLists {
    /// The built-in English lists.
    pub fn standard() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            linking_words: owned(LINKING_WORDS),
            contractions: owned(CONTRACTIONS),
            formality_cues: owned(FORMALITY_CUES),
            stop_words: owned(STOP_WORDS),
            misspellings: MISSPELLINGS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ignored: owned(IGNORED_TOKENS),
            base_verbs: owned(BASE_VERBS),
        }
    }
}

/// How a linking expression is located in a text.
#[derive(Debug, Clone)]
pub(crate) enum LinkMatcher {
    /// Multi-word phrase, padded with spaces for a plain substring search.
    Phrase(String),
    /// Single word, matched on word boundaries.
    Word(Regex),
}

/// Immutable lexical configuration shared by all evaluations.
#[derive(Debug, Clone)]
pub struct Lexicon {
    linking: Vec<(String, LinkMatcher)>,
    contraction_re: Option<Regex>,
    formality_cues: Vec<String>,
    stop_words: HashSet<String>,
    misspellings: HashMap<String, String>,
    ignored: HashSet<String>,
    agreement_re: Option<Regex>,
}

impl Lexicon {
    /// The process-wide standard lexicon.
    pub fn standard() -> &'static Lexicon {
        &STANDARD
    }

    /// Build a lexicon from raw lists, compiling its derived patterns.
    pub fn from_lists(lists: LexiconLists) -> Result<Self, regex::Error> {
        let linking = lists
            .linking_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .map(|w| {
                let matcher = if w.contains(' ') {
                    LinkMatcher::Phrase(format!(" {w} "))
                } else {
                    LinkMatcher::Word(Regex::new(&format!(r"\b{}\b", regex::escape(&w)))?)
                };
                Ok((w, matcher))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let contraction_re = alternation(&lists.contractions)
            .map(|alt| Regex::new(&format!(r"(?i)\b(?:{alt})\b")))
            .transpose()?;

        let agreement_re = alternation(&lists.base_verbs)
            .map(|alt| Regex::new(&format!(r"(?i)\b(he|she|it)\s+({alt})\b")))
            .transpose()?;

        let mut misspellings = HashMap::new();
        for (typo, fix) in lists.misspellings {
            let typo = typo.trim().to_lowercase();
            let fix = fix.trim().to_lowercase();
            if typo.is_empty() || fix.is_empty() || typo == fix {
                continue;
            }
            misspellings.insert(typo, fix);
        }

        Ok(Self {
            linking,
            contraction_re,
            formality_cues: lowercase_all(lists.formality_cues),
            stop_words: lowercase_all(lists.stop_words).into_iter().collect(),
            misspellings,
            ignored: lowercase_all(lists.ignored).into_iter().collect(),
            agreement_re,
        })
    }

    pub(crate) fn linking(&self) -> &[(String, LinkMatcher)] {
        &self.linking
    }

    /// `None` when the contraction list is empty.
    pub(crate) fn contraction_re(&self) -> Option<&Regex> {
        self.contraction_re.as_ref()
    }

    /// `None` when the base-verb list is empty.
    pub(crate) fn agreement_re(&self) -> Option<&Regex> {
        self.agreement_re.as_ref()
    }

    pub fn formality_cues(&self) -> &[String] {
        &self.formality_cues
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Correction for a known misspelling (expects a lowercase word).
    pub fn correction(&self, word: &str) -> Option<&str> {
        self.misspellings.get(word).map(String::as_str)
    }

    pub fn is_ignored(&self, word: &str) -> bool {
        self.ignored.contains(word)
    }
}

/// Escaped `a|b|c` alternation, or `None` for a list with no usable words.
/// An empty alternation would match the empty string at every boundary.
fn alternation(words: &[String]) -> Option<String> {
    let parts: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    (!parts.is_empty()).then(|| parts.join("|"))
}

fn lowercase_all(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// An externally supplied word list used for unknown-word detection.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a one-word-per-line list. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a word list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary: {}", path.display()))?;
        let dictionary = Self::parse(&content);
        tracing::debug!(
            "loaded {} dictionary words from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
