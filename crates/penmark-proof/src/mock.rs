//! Mock proofer for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use penmark_core::error::ProofError;
use penmark_core::model::ProofLanguage;
use penmark_core::traits::{ProofIssue, ProofResult, Proofer};

/// What the mock answers with.
enum Behaviour {
    Issues(Vec<ProofIssue>),
    /// Fail with a network error carrying this message.
    Fail(String),
}

/// A mock proofer for exercising the assessor without a real service.
pub struct MockProofer {
    behaviour: Behaviour,
    call_count: AtomicU32,
    last_request: Mutex<Option<(String, ProofLanguage)>>,
}

impl MockProofer {
    /// Answer every non-blank text with the given issues.
    pub fn with_issues(issues: Vec<ProofIssue>) -> Self {
        Self::from_behaviour(Behaviour::Issues(issues))
    }

    /// Fail every non-blank request.
    pub fn failing(message: &str) -> Self {
        Self::from_behaviour(Behaviour::Fail(message.to_string()))
    }

    fn from_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of non-blank texts checked.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last text and language received.
    pub fn last_request(&self) -> Option<(String, ProofLanguage)> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Proofer for MockProofer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(&self, text: &str, language: ProofLanguage) -> Result<ProofResult, ProofError> {
        if text.trim().is_empty() {
            return Ok(ProofResult::empty());
        }
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((text.to_string(), language));
        }

        match &self.behaviour {
            Behaviour::Issues(issues) => Ok(ProofResult::from_issues(issues.clone())),
            Behaviour::Fail(message) => Err(ProofError::Network(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penmark_core::text::Span;
    use penmark_core::traits::ProofIssueKind;

    #[tokio::test]
    async fn records_requests() {
        let mock = MockProofer::with_issues(vec![ProofIssue {
            kind: ProofIssueKind::Spelling,
            message: "typo".into(),
            example: None,
            span: Span::new(0, 4),
            suggestion: Some("Teh".into()),
        }]);
        let result = mock.check("Teh end.", ProofLanguage::EnCa).await.unwrap();
        assert_eq!(result.counts.spelling, 1);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(
            mock.last_request(),
            Some(("Teh end.".to_string(), ProofLanguage::EnCa))
        );
    }

    #[tokio::test]
    async fn blank_text_is_not_counted() {
        let mock = MockProofer::failing("down");
        assert!(mock.check(" ", ProofLanguage::EnGb).await.unwrap().is_empty());
        assert_eq!(mock.call_count(), 0);
        assert!(mock.check("text", ProofLanguage::EnGb).await.is_err());
    }
}
