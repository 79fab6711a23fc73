//! Content-point coverage detection by key-term overlap.

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::model::TaskPoint;

/// Whether one task point is addressed by the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCoverage {
    pub id: String,
    pub text: String,
    pub covered: bool,
}

/// Lowercased, stop-word-free, de-duplicated terms of a point, in order.
pub fn key_terms(point_text: &str, lexicon: &Lexicon) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for raw in point_text.split(|c: char| !c.is_alphabetic()) {
        if raw.is_empty() {
            continue;
        }
        let term = raw.to_lowercase();
        if lexicon.is_stop_word(&term) || terms.contains(&term) {
            continue;
        }
        terms.push(term);
    }
    terms
}

/// Apply the overlap rule to an already-lowercased submission.
pub fn is_covered(lower_text: &str, terms: &[String]) -> bool {
    let hits = terms
        .iter()
        .filter(|term| lower_text.contains(term.as_str()))
        .count();
    match terms.len() {
        0 => false,
        1 | 2 => hits >= 1,
        _ => hits >= 2,
    }
}

/// Coverage for every point, parallel to `points`.
pub fn detect_coverage(text: &str, points: &[TaskPoint], lexicon: &Lexicon) -> Vec<PointCoverage> {
    let lower = text.to_lowercase();
    points
        .iter()
        .map(|point| PointCoverage {
            id: point.id.clone(),
            text: point.text.clone(),
            covered: is_covered(&lower, &key_terms(&point.text, lexicon)),
        })
        .collect()
}

/// True when every point is covered (vacuously true for no points).
pub fn all_covered(coverage: &[PointCoverage]) -> bool {
    coverage.iter().all(|c| c.covered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = "Inform about the schedule change (what changed and why)";

    fn point(id: &str, text: &str) -> TaskPoint {
        TaskPoint {
            id: id.into(),
            text: text.into(),
        }
    }

    #[test]
    fn key_terms_drop_stop_words_and_duplicates() {
        let terms = key_terms(SCHEDULE, Lexicon::standard());
        assert_eq!(
            terms,
            vec!["inform", "schedule", "change", "what", "changed", "why"]
        );
        assert_eq!(
            key_terms("Ask for confirmation of arrival / receipt", Lexicon::standard()),
            vec!["ask", "confirmation", "arrival", "receipt"]
        );
        assert!(key_terms("the and of", Lexicon::standard()).is_empty());
    }

    #[test]
    fn three_or_more_terms_need_two_hits() {
        let points = vec![point("p1", SCHEDULE)];
        let covered = detect_coverage(
            "We must inform you that the schedule has moved.",
            &points,
            Lexicon::standard(),
        );
        assert!(covered[0].covered);

        let not_covered =
            detect_coverage("We must inform you soon.", &points, Lexicon::standard());
        assert!(!not_covered[0].covered);
    }

    #[test]
    fn two_terms_need_one_hit() {
        let points = vec![point("p1", "Apologise for the inconvenience")];
        let cov = detect_coverage("Sorry for any inconvenience.", &points, Lexicon::standard());
        assert!(cov[0].covered);
    }

    #[test]
    fn single_term_and_empty_points() {
        let points = vec![point("p1", "Recommendations"), point("p2", "the of and")];
        let cov = detect_coverage("My recommendations follow.", &points, Lexicon::standard());
        assert!(cov[0].covered);
        assert!(!cov[1].covered);
    }

    #[test]
    fn coverage_is_parallel_to_points() {
        let points = vec![point("a", "One"), point("b", "Two"), point("c", "Three")];
        let cov = detect_coverage("", &points, Lexicon::standard());
        let ids: Vec<&str> = cov.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!all_covered(&cov));
        assert!(all_covered(&[]));
    }
}
