//! Core data model types for penmark.
//!
//! These are the reference records the engine reads (writing tasks and their
//! content points) and the per-call inputs it evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A writing prompt with its length requirement and required content points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingTask {
    /// Unique identifier for this task.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Genre of the expected answer.
    pub category: TaskCategory,
    /// Instruction shown to the writer.
    pub instruction: String,
    /// Minimum number of words the answer should reach.
    pub min_words: u32,
    /// Required content points, in prompt order.
    #[serde(default)]
    pub points: Vec<TaskPoint>,
    /// Optional phrasing hints (e.g. "Dear Sir or Madam,").
    #[serde(default)]
    pub hints: Vec<String>,
}

/// A single content point the answer must address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPoint {
    pub id: String,
    pub text: String,
}

/// Genre of a writing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Letter,
    Email,
    Memo,
    Report,
}

impl TaskCategory {
    /// Exam section the category belongs to.
    pub fn section(self) -> TaskSection {
        match self {
            TaskCategory::Letter | TaskCategory::Email | TaskCategory::Memo => TaskSection::Task1,
            TaskCategory::Report => TaskSection::Task2,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCategory::Letter => write!(f, "letter"),
            TaskCategory::Email => write!(f, "email"),
            TaskCategory::Memo => write!(f, "memo"),
            TaskCategory::Report => write!(f, "report"),
        }
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Ok(TaskCategory::Letter),
            "email" | "e-mail" => Ok(TaskCategory::Email),
            "memo" => Ok(TaskCategory::Memo),
            "report" => Ok(TaskCategory::Report),
            other => Err(format!("unknown task category: {other}")),
        }
    }
}

/// Exam section: Task 1 is short correspondence, Task 2 is a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSection {
    Task1,
    Task2,
}

/// A piece of writing submitted against one task.
#[derive(Debug, Clone)]
pub struct Submission<'a> {
    pub text: String,
    pub task: &'a WritingTask,
}

impl<'a> Submission<'a> {
    pub fn new(text: impl Into<String>, task: &'a WritingTask) -> Self {
        Self {
            text: text.into(),
            task,
        }
    }
}

/// Language variants accepted by the proofing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProofLanguage {
    #[default]
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-AU")]
    EnAu,
    #[serde(rename = "en-CA")]
    EnCa,
    #[serde(rename = "en-NZ")]
    EnNz,
    #[serde(rename = "en-ZA")]
    EnZa,
}

impl ProofLanguage {
    /// Language code as sent on the wire.
    pub fn code(self) -> &'static str {
        match self {
            ProofLanguage::EnGb => "en-GB",
            ProofLanguage::EnUs => "en-US",
            ProofLanguage::EnAu => "en-AU",
            ProofLanguage::EnCa => "en-CA",
            ProofLanguage::EnNz => "en-NZ",
            ProofLanguage::EnZa => "en-ZA",
        }
    }
}

impl fmt::Display for ProofLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProofLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_lowercase().as_str() {
            "en-gb" => Ok(ProofLanguage::EnGb),
            "en-us" => Ok(ProofLanguage::EnUs),
            "en-au" => Ok(ProofLanguage::EnAu),
            "en-ca" => Ok(ProofLanguage::EnCa),
            "en-nz" => Ok(ProofLanguage::EnNz),
            "en-za" => Ok(ProofLanguage::EnZa),
            other => Err(format!("unsupported language code: {other}")),
        }
    }
}
