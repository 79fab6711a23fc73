//! Live assessment while the user types: debouncing and stale-result suppression.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{Assessment, Assessor};
use crate::model::{Submission, WritingTask};

/// Quiet period before an edit is assessed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Identifies one request; later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer ticket has been issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Assesses successive drafts of one task, keeping only the newest answer.
pub struct LiveSession {
    assessor: Arc<Assessor>,
    task: WritingTask,
    sequencer: Sequencer,
    debounce: Duration,
}

impl LiveSession {
    pub fn new(assessor: Arc<Assessor>, task: WritingTask) -> Self {
        Self {
            assessor,
            task,
            sequencer: Sequencer::new(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn task(&self) -> &WritingTask {
        &self.task
    }

    /// Assess `text` after the debounce period.
    ///
    /// Returns `None` when a newer draft was submitted before this one was
    /// started or before its result arrived. In-flight work is not aborted.
    pub async fn submit(&self, text: impl Into<String>) -> Option<Assessment> {
        let ticket = self.sequencer.issue();
        tokio::time::sleep(self.debounce).await;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!("draft {ticket:?} superseded during debounce");
            return None;
        }

        let submission = Submission::new(text, &self.task);
        let assessment = self.assessor.assess(&submission).await;

        if !self.sequencer.is_current(ticket) {
            tracing::debug!("discarding stale result for {ticket:?}");
            return None;
        }
        Some(assessment)
    }
}
