//! Assessment report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::EvalResult;
use crate::engine::{Assessment, ProofingStatus};
use crate::model::{ProofLanguage, TaskCategory, WritingTask};

/// A persisted assessment of one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub task: TaskSummary,
    /// Where the submission came from (usually a file path).
    #[serde(default)]
    pub source: Option<String>,
    pub text: String,
    pub language: ProofLanguage,
    pub proofing: ProofingStatus,
    pub result: EvalResult,
}

/// Summary of a task (without points and hints).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub label: String,
    pub category: TaskCategory,
    pub min_words: u32,
}

impl From<&WritingTask> for TaskSummary {
    fn from(task: &WritingTask) -> Self {
        Self {
            id: task.id.clone(),
            label: task.label.clone(),
            category: task.category,
            min_words: task.min_words,
        }
    }
}

impl AssessmentReport {
    pub fn new(
        task: &WritingTask,
        text: impl Into<String>,
        language: ProofLanguage,
        assessment: Assessment,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            task: task.into(),
            source: None,
            text: text.into(),
            language,
            proofing: assessment.proofing,
            result: assessment.result,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// One-line summary, e.g. `t1_memo_safety: 24/40 (language 6, form 6, ...)`.
    pub fn summary_line(&self) -> String {
        let s = &self.result.scorecard.scores;
        format!(
            "{}: {}/40 (language {}, form {}, organisation {}, effect {})",
            self.task.id,
            self.result.scorecard.total,
            s.language,
            s.form,
            s.organisation,
            s.effect
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assessor;
    use crate::model::{Submission, TaskPoint};

    fn make_report() -> AssessmentReport {
        let task = WritingTask {
            id: "t1_memo_safety".into(),
            label: "Memo (Safety Notice)".into(),
            category: TaskCategory::Memo,
            instruction: "Write a memo.".into(),
            min_words: 120,
            points: vec![TaskPoint {
                id: "p1".into(),
                text: "State what is new in the procedure".into(),
            }],
            hints: vec![],
        };
        let text = "The new procedure starts on Monday. Wear helmets at all times.";
        let assessor = Assessor::new();
        let result = assessor.assess_offline(&Submission::new(text, &task));
        AssessmentReport::new(
            &task,
            text,
            ProofLanguage::EnGb,
            Assessment {
                result,
                proofing: ProofingStatus::Disabled,
            },
        )
        .with_source("memo.txt")
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("memo.json");
        report.save_json(&path).unwrap();

        let loaded = AssessmentReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.task.id, "t1_memo_safety");
        assert_eq!(loaded.source.as_deref(), Some("memo.txt"));
        assert_eq!(loaded.proofing, ProofingStatus::Disabled);
        assert_eq!(loaded.result.scorecard.scores, report.result.scorecard.scores);
        assert_eq!(loaded.result.highlights, report.result.highlights);
    }

    #[test]
    fn load_missing_file_fails_with_context() {
        let err = AssessmentReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn summary_line_lists_criteria() {
        let line = make_report().summary_line();
        assert!(line.starts_with("t1_memo_safety: "));
        assert!(line.contains("/40"));
        assert!(line.contains("organisation"));
    }
}
