//! Rubric scoring with length-based hard caps.
//!
//! Four criteria are scored on a 0-10 scale (40 in total):
//!
//! | Criterion | Driven by |
//! |-----------|-----------|
//! | language | vocabulary richness, linking words, contractions |
//! | form | formality cues, meeting the word target, contractions |
//! | organisation | paragraphing, linking words, task coverage |
//! | effect | formality cues, paragraphing, length, coverage |
//!
//! Every criterion is clamped to 0-10, organisation and effect are held at 7
//! while any task point is missing, and finally all four are limited by the
//! length cap: 2 below half the target, 4 below 70% of it.

use serde::{Deserialize, Serialize};

use crate::coverage::{all_covered, detect_coverage, PointCoverage};
use crate::lexicon::Lexicon;
use crate::metrics::TextMetrics;
use crate::model::{TaskCategory, WritingTask};

/// Submissions with fewer words than this are not assessed at all.
pub const MIN_ASSESSABLE_WORDS: usize = 5;

const MAX_SCORE: i32 = 10;
const UNCOVERED_CEILING: i32 = 7;

/// Per-criterion scores, each 0-10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub language: u32,
    pub form: u32,
    pub organisation: u32,
    pub effect: u32,
}

impl Scores {
    pub fn total(&self) -> u32 {
        self.language + self.form + self.organisation + self.effect
    }
}

/// Rubric outcome for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub scores: Scores,
    /// Sum of the four criteria, 0-40.
    pub total: u32,
    /// Highest score any criterion could reach given the length.
    pub length_cap: u32,
    pub coverage: Vec<PointCoverage>,
    pub advice: Vec<String>,
    pub facts: TextMetrics,
}

/// Word thresholds derived from a task's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthThresholds {
    pub fifty_pct: usize,
    pub seventy_pct: usize,
    pub target: usize,
    pub bonus: usize,
}

impl LengthThresholds {
    pub fn for_min_words(min_words: u32) -> Self {
        let pct = |factor: f64| (f64::from(min_words) * factor).round() as usize;
        Self {
            fifty_pct: pct(0.5),
            seventy_pct: pct(0.7),
            target: min_words as usize,
            bonus: pct(1.2),
        }
    }

    /// Ceiling applied to every criterion for a text of `words` words.
    pub fn cap(&self, words: usize) -> u32 {
        if words < self.fifty_pct {
            2
        } else if words < self.seventy_pct {
            4
        } else {
            MAX_SCORE as u32
        }
    }
}

/// Compute metrics and coverage for `text`, then score it.
pub fn evaluate_submission(text: &str, task: &WritingTask, lexicon: &Lexicon) -> Scorecard {
    let facts = TextMetrics::compute(text, lexicon);
    let coverage = detect_coverage(text, &task.points, lexicon);
    score(facts, coverage, task)
}

/// Turn metrics and coverage into a scorecard.
pub fn score(facts: TextMetrics, coverage: Vec<PointCoverage>, task: &WritingTask) -> Scorecard {
    let limits = LengthThresholds::for_min_words(task.min_words);

    if facts.words < MIN_ASSESSABLE_WORDS {
        return Scorecard {
            scores: Scores::default(),
            total: 0,
            length_cap: 0,
            coverage,
            advice: vec![
                "Start writing: the text is too short to be assessed.".to_string(),
                format!("The target for this task is {} words.", task.min_words),
            ],
            facts,
        };
    }

    let covered = all_covered(&coverage);
    let cap = limits.cap(facts.words);

    let scores = Scores {
        language: finish(language_score(&facts), None, cap),
        form: finish(form_score(&facts, &limits), None, cap),
        organisation: finish(
            organisation_score(&facts, covered),
            (!covered).then_some(UNCOVERED_CEILING),
            cap,
        ),
        effect: finish(
            effect_score(&facts, &limits, covered),
            (!covered).then_some(UNCOVERED_CEILING),
            cap,
        ),
    };

    let advice = build_advice(&facts, &coverage, task, cap);

    Scorecard {
        total: scores.total(),
        scores,
        length_cap: cap,
        coverage,
        advice,
        facts,
    }
}

/// Clamp to 0-10, apply an optional criterion ceiling, then the length cap.
fn finish(raw: i32, ceiling: Option<i32>, cap: u32) -> u32 {
    let mut value = raw.clamp(0, MAX_SCORE);
    if let Some(ceiling) = ceiling {
        value = value.min(ceiling);
    }
    (value as u32).min(cap)
}

fn language_score(m: &TextMetrics) -> i32 {
    let mut s = 0;
    if m.type_token_ratio >= 0.30 {
        s += 2;
    }
    if m.type_token_ratio >= 0.50 {
        s += 2;
    }
    if m.type_token_ratio >= 0.65 {
        s += 2;
    }
    if m.linking_words >= 2 {
        s += 1;
    }
    if m.linking_words >= 4 {
        s += 1;
    }
    if m.contractions == 0 {
        s += 2;
    } else if m.contractions >= 2 {
        s -= 1;
    }
    s
}

fn form_score(m: &TextMetrics, limits: &LengthThresholds) -> i32 {
    let mut s = 0;
    if m.formality_cues >= 1 {
        s += 2;
    }
    if m.formality_cues >= 3 {
        s += 1;
    }
    if m.words >= limits.target {
        s += 4;
    }
    if m.words >= limits.bonus {
        s += 1;
    }
    if m.contractions == 0 {
        s += 1;
    } else if m.contractions >= 3 {
        s -= 1;
    }
    s
}

fn organisation_score(m: &TextMetrics, covered: bool) -> i32 {
    let mut s = 0;
    if m.paragraphs >= 2 {
        s += 2;
    }
    if m.paragraphs >= 3 {
        s += 2;
    }
    if m.linking_words >= 3 {
        s += 1;
    }
    if covered {
        s += 3;
    }
    s
}

fn effect_score(m: &TextMetrics, limits: &LengthThresholds, covered: bool) -> i32 {
    let mut s = 0;
    if m.formality_cues >= 2 {
        s += 2;
    }
    if m.paragraphs >= 3 {
        s += 1;
    }
    if m.words >= limits.target {
        s += 3;
    }
    if !covered {
        s -= 1;
    }
    s
}

fn build_advice(
    m: &TextMetrics,
    coverage: &[PointCoverage],
    task: &WritingTask,
    cap: u32,
) -> Vec<String> {
    let mut advice = Advice::default();

    if m.words < task.min_words as usize {
        let mut tip = format!(
            "Write at least {} words (currently {}).",
            task.min_words, m.words
        );
        if cap < MAX_SCORE as u32 {
            tip.push_str(&format!(" Each criterion is capped at {cap}/10 until the text is longer."));
        }
        advice.push(tip);
    }

    let missing: Vec<&str> = coverage
        .iter()
        .filter(|c| !c.covered)
        .map(|c| c.id.as_str())
        .collect();
    if !missing.is_empty() {
        advice.push(format!(
            "Cover every task point; missing points lower the score ({}).",
            missing.join(", ")
        ));
    }

    if m.linking_words < 3 {
        advice.push("Use more linking words (Firstly, However, Therefore, For example...).");
    }

    if m.contractions > 0 {
        advice.push("Avoid contractions (don't, won't...) to keep a formal register.");
    }

    if m.paragraphs < 3 {
        advice.push("Split the text into at least three paragraphs with clear topic sentences.");
    }

    match task.category {
        TaskCategory::Letter | TaskCategory::Email => advice.push(
            "Use a formal opening and closing (Dear Sir or Madam, ... Yours faithfully, ...).",
        ),
        TaskCategory::Report => advice.push(
            "Use headings (Introduction, Findings/Analysis, Conclusion/Recommendations).",
        ),
        TaskCategory::Memo => {}
    }

    advice.into_inner()
}

/// Ordered advice list that ignores repeated entries.
#[derive(Default)]
struct Advice(Vec<String>);

impl Advice {
    fn push(&mut self, tip: impl Into<String>) {
        let tip = tip.into();
        if !self.0.contains(&tip) {
            self.0.push(tip);
        }
    }

    fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskPoint;

    fn task(category: TaskCategory, min_words: u32, points: &[&str]) -> WritingTask {
        WritingTask {
            id: "t".into(),
            label: "Test".into(),
            category,
            instruction: "Write".into(),
            min_words,
            points: points
                .iter()
                .enumerate()
                .map(|(i, text)| TaskPoint {
                    id: format!("p{}", i + 1),
                    text: text.to_string(),
                })
                .collect(),
            hints: vec![],
        }
    }

    fn facts(words: usize) -> TextMetrics {
        TextMetrics {
            words,
            paragraphs: 1,
            linking_words: 0,
            contractions: 0,
            type_token_ratio: 0.0,
            formality_cues: 0,
        }
    }

    fn covered(ids: &[(&str, bool)]) -> Vec<PointCoverage> {
        ids.iter()
            .map(|(id, c)| PointCoverage {
                id: id.to_string(),
                text: String::new(),
                covered: *c,
            })
            .collect()
    }

    /// Distinct, non-repeating filler words: `n` unique tokens.
    fn unique_words(n: usize) -> String {
        (0..n)
            .map(|i| {
                let mut w = String::from("w");
                let mut k = i;
                loop {
                    w.push((b'a' + (k % 26) as u8) as char);
                    k /= 26;
                    if k == 0 {
                        break;
                    }
                }
                w
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn thresholds_round_half_up() {
        let t = LengthThresholds::for_min_words(120);
        assert_eq!((t.fifty_pct, t.seventy_pct, t.target, t.bonus), (60, 84, 120, 144));
        let odd = LengthThresholds::for_min_words(5);
        assert_eq!(odd.fifty_pct, 3);
        assert_eq!(odd.seventy_pct, 4);
    }

    #[test]
    fn cap_bands() {
        let t = LengthThresholds::for_min_words(120);
        assert_eq!(t.cap(59), 2);
        assert_eq!(t.cap(60), 4);
        assert_eq!(t.cap(83), 4);
        assert_eq!(t.cap(84), 10);
    }

    #[test]
    fn fewer_than_five_words_scores_zero() {
        let t = task(TaskCategory::Letter, 120, &["Apologise"]);
        for text in ["", "   ", "One two three four", "42 17 ???"] {
            let card = evaluate_submission(text, &t, Lexicon::standard());
            assert_eq!(card.scores, Scores::default(), "text: {text:?}");
            assert_eq!(card.total, 0);
            assert_eq!(card.advice.len(), 2);
            assert!(card.advice[1].contains("120"));
        }
    }

    #[test]
    fn rich_formal_text_scores_full_language() {
        let t = task(TaskCategory::Report, 120, &[]);
        let mut text = String::from(
            "Firstly however moreover therefore in addition furthermore nevertheless ",
        );
        text.push_str(&unique_words(130));
        let card = evaluate_submission(&text, &t, Lexicon::standard());
        assert!(card.facts.words >= 120);
        assert!(card.facts.linking_words >= 4);
        assert_eq!(card.facts.contractions, 0);
        assert!(card.facts.type_token_ratio >= 0.65);
        assert_eq!(card.scores.language, 10);
    }

    #[test]
    fn length_cap_limits_every_criterion() {
        let t = task(TaskCategory::Letter, 120, &[]);
        let mut m = facts(50);
        m.type_token_ratio = 0.9;
        m.linking_words = 5;
        m.formality_cues = 3;
        m.paragraphs = 3;
        let card = score(m.clone(), vec![], &t);
        assert_eq!(card.length_cap, 2);
        assert_eq!(card.scores.language, 2);
        assert_eq!(card.scores.form, 2);
        assert_eq!(card.scores.organisation, 2);
        assert_eq!(card.scores.effect, 2);

        m.words = 70;
        let card = score(m, vec![], &t);
        assert_eq!(card.length_cap, 4);
        assert_eq!(card.scores.language, 4);
    }

    #[test]
    fn form_rewards_length_and_formality() {
        let t = task(TaskCategory::Letter, 120, &[]);
        let mut m = facts(150);
        m.formality_cues = 3;
        let card = score(m, vec![], &t);
        // 2 + 1 + 4 + 1 + 1
        assert_eq!(card.scores.form, 9);
    }

    #[test]
    fn contractions_penalise_language_and_form() {
        let t = task(TaskCategory::Memo, 120, &[]);
        let mut m = facts(130);
        m.contractions = 3;
        let card = score(m, vec![], &t);
        assert_eq!(card.scores.language, 0);
        // 4 (target) - 1 (contractions) = 3
        assert_eq!(card.scores.form, 3);
    }

    #[test]
    fn uncovered_points_hold_organisation_and_effect() {
        let t = task(TaskCategory::Report, 120, &["a", "b"]);
        let mut m = facts(200);
        m.paragraphs = 4;
        m.linking_words = 3;
        m.formality_cues = 2;

        let all = score(m.clone(), covered(&[("p1", true), ("p2", true)]), &t);
        assert_eq!(all.scores.organisation, 8);
        assert_eq!(all.scores.effect, 6);

        let partial = score(m, covered(&[("p1", true), ("p2", false)]), &t);
        assert_eq!(partial.scores.organisation, 5);
        assert_eq!(partial.scores.effect, 5);
        assert!(partial.advice.iter().any(|a| a.contains("p2")));
    }

    #[test]
    fn advice_follows_priority_order() {
        let t = task(TaskCategory::Letter, 120, &["x"]);
        let mut m = facts(40);
        m.contractions = 1;
        let card = score(m, covered(&[("p1", false)]), &t);
        assert_eq!(card.advice.len(), 6);
        assert!(card.advice[0].starts_with("Write at least 120 words"));
        assert!(card.advice[0].contains("capped at 2/10"));
        assert!(card.advice[1].contains("p1"));
        assert!(card.advice[2].contains("linking words"));
        assert!(card.advice[3].contains("contractions"));
        assert!(card.advice[4].contains("paragraphs"));
        assert!(card.advice[5].contains("formal opening"));
    }

    #[test]
    fn memo_has_no_category_tip() {
        let t = task(TaskCategory::Memo, 10, &[]);
        let mut m = facts(20);
        m.paragraphs = 3;
        m.linking_words = 3;
        let card = score(m, vec![], &t);
        assert!(card.advice.is_empty());
    }

    #[test]
    fn top_vocabulary_band_is_worth_two_points() {
        let t = task(TaskCategory::Memo, 120, &[]);
        let mut below = facts(130);
        below.contractions = 1;
        below.type_token_ratio = 0.64;
        let mut at = below.clone();
        at.type_token_ratio = 0.65;

        assert_eq!(score(below, vec![], &t).scores.language, 4);
        // the 0.65 step adds 2, so the full 10 is reachable
        assert_eq!(score(at, vec![], &t).scores.language, 6);
    }

    #[test]
    fn scoring_is_deterministic() {
        let t = task(TaskCategory::Email, 30, &["Request documentation", "Explain urgency"]);
        let text = "Dear Sir or Madam,\n\nI am writing to request documentation.\n\nHowever, it is urgent.";
        let a = evaluate_submission(text, &t, Lexicon::standard());
        let b = evaluate_submission(text, &t, Lexicon::standard());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
