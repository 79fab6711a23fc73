//! Central assessment engine.
//!
//! Runs the pure local checks, optionally consults a proofing service, and
//! fans batches out with bounded parallelism.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::instrument;

use crate::aggregate::{aggregate, EvalResult};
use crate::grammar::check_grammar;
use crate::lexicon::{Dictionary, Lexicon};
use crate::model::{ProofLanguage, Submission, WritingTask};
use crate::scoring::{evaluate_submission, Scorecard};
use crate::spelling::{check_spelling, check_unknown_words};
use crate::traits::{ProofResult, Proofer};

/// What happened to the remote proofing step of an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProofingStatus {
    /// No proofer is configured.
    Disabled,
    /// The text was blank, so nothing was sent.
    Skipped,
    Completed,
    /// The service failed; the result carries an empty proof section.
    Degraded { reason: String },
}

impl ProofingStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ProofingStatus::Degraded { .. })
    }
}

impl std::fmt::Display for ProofingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofingStatus::Disabled => f.write_str("disabled"),
            ProofingStatus::Skipped => f.write_str("skipped"),
            ProofingStatus::Completed => f.write_str("completed"),
            ProofingStatus::Degraded { reason } => write!(f, "degraded ({reason})"),
        }
    }
}

/// An evaluation plus the outcome of its proofing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: EvalResult,
    pub proofing: ProofingStatus,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_assess_start(&self, index: usize, task_id: &str);
    fn on_assess_complete(&self, index: usize, assessment: &Assessment);
    fn on_batch_complete(&self, total: usize, degraded: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_assess_start(&self, _: usize, _: &str) {}
    fn on_assess_complete(&self, _: usize, _: &Assessment) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Owns the shared read-only lexical data and the optional proofer.
pub struct Assessor {
    lexicon: Arc<Lexicon>,
    dictionary: Option<Arc<Dictionary>>,
    proofer: Option<Arc<dyn Proofer>>,
    language: ProofLanguage,
}

impl Default for Assessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Assessor {
    /// Offline assessor with the standard lexicon and no dictionary.
    pub fn new() -> Self {
        Self {
            lexicon: Arc::new(Lexicon::standard().clone()),
            dictionary: None,
            proofer: None,
            language: ProofLanguage::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = Some(Arc::new(dictionary));
        self
    }

    pub fn with_proofer(mut self, proofer: Arc<dyn Proofer>) -> Self {
        self.proofer = Some(proofer);
        self
    }

    pub fn with_language(mut self, language: ProofLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn language(&self) -> ProofLanguage {
        self.language
    }

    pub fn proofer_name(&self) -> Option<&str> {
        self.proofer.as_deref().map(|p| p.name())
    }

    /// Rubric only: metrics, coverage, scores and advice.
    pub fn evaluate(&self, text: &str, task: &WritingTask) -> Scorecard {
        evaluate_submission(text, task, &self.lexicon)
    }

    /// Every local check, without touching the network.
    pub fn assess_offline(&self, submission: &Submission<'_>) -> EvalResult {
        self.assemble(submission, None)
    }

    /// Local checks plus remote proofing when a proofer is configured.
    ///
    /// Proofing failures never propagate: they are logged and reported as
    /// [`ProofingStatus::Degraded`] with an empty proof section.
    #[instrument(skip_all, fields(task = %submission.task.id))]
    pub async fn assess(&self, submission: &Submission<'_>) -> Assessment {
        let Some(proofer) = &self.proofer else {
            return Assessment {
                result: self.assess_offline(submission),
                proofing: ProofingStatus::Disabled,
            };
        };

        if submission.text.trim().is_empty() {
            return Assessment {
                result: self.assess_offline(submission),
                proofing: ProofingStatus::Skipped,
            };
        }

        let (proof, proofing) = match proofer.check(&submission.text, self.language).await {
            Ok(proof) => {
                tracing::debug!(
                    "{} reported {} issues",
                    proofer.name(),
                    proof.counts.total
                );
                (proof, ProofingStatus::Completed)
            }
            Err(e) => {
                tracing::warn!("proofing via {} failed: {e}", proofer.name());
                (
                    ProofResult::empty(),
                    ProofingStatus::Degraded {
                        reason: e.to_string(),
                    },
                )
            }
        };

        Assessment {
            result: self.assemble(submission, Some(proof)),
            proofing,
        }
    }

    /// Assess many submissions concurrently, at most `parallelism` at a time.
    ///
    /// Results keep the order of `submissions`.
    pub async fn assess_batch(
        &self,
        submissions: &[Submission<'_>],
        parallelism: usize,
        progress: &dyn ProgressReporter,
    ) -> Vec<Assessment> {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                // the semaphore is never closed, so a permit is always granted
                let _permit = semaphore.acquire().await.ok();
                progress.on_assess_start(index, &submission.task.id);
                (index, self.assess(submission).await)
            });
        }

        let mut slots: Vec<Option<Assessment>> = vec![None; submissions.len()];
        let mut degraded = 0usize;
        while let Some((index, assessment)) = futures.next().await {
            if assessment.proofing.is_degraded() {
                degraded += 1;
            }
            progress.on_assess_complete(index, &assessment);
            slots[index] = Some(assessment);
        }

        progress.on_batch_complete(submissions.len(), degraded, start.elapsed());
        slots.into_iter().flatten().collect()
    }

    fn assemble(&self, submission: &Submission<'_>, proof: Option<ProofResult>) -> EvalResult {
        let text = submission.text.as_str();
        let lexicon = self.lexicon.as_ref();
        aggregate(
            evaluate_submission(text, submission.task, lexicon),
            check_spelling(text, lexicon),
            check_unknown_words(text, lexicon, self.dictionary.as_deref()),
            check_grammar(text, lexicon),
            proof,
        )
    }
}
