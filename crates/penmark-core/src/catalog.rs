//! TOML task catalog parser.
//!
//! Loads writing tasks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::coverage::key_terms;
use crate::lexicon::Lexicon;
use crate::model::{TaskCategory, TaskPoint, TaskSection, WritingTask};

const BUILTIN_TOML: &str = include_str!("../catalog/default.toml");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    parse_catalog_str(BUILTIN_TOML, Path::new("catalog/default.toml"))
        .expect("embedded catalog is valid")
});

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    tasks: Vec<TomlTask>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlTask {
    id: String,
    #[serde(default)]
    label: Option<String>,
    category: String,
    instruction: String,
    min_words: u32,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    points: Vec<TomlPoint>,
}

#[derive(Debug, Deserialize)]
struct TomlPoint {
    id: String,
    text: String,
}

/// A named collection of writing tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tasks: Vec<WritingTask>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn get(&self, id: &str) -> Option<&WritingTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn by_category(&self, category: TaskCategory) -> impl Iterator<Item = &WritingTask> {
        self.tasks.iter().filter(move |t| t.category == category)
    }

    /// Task 1 is letters, e-mails and memos; Task 2 is reports.
    pub fn section(&self, section: TaskSection) -> impl Iterator<Item = &WritingTask> {
        self.tasks
            .iter()
            .filter(move |t| t.category.section() == section)
    }

    /// Combine several catalogs into one, keeping task order.
    pub fn merge(id: impl Into<String>, name: impl Into<String>, parts: Vec<Catalog>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tasks: parts.into_iter().flat_map(|c| c.tasks).collect(),
        }
    }
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog`.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let tasks = parsed
        .tasks
        .into_iter()
        .map(|t| {
            let category: TaskCategory = t
                .category
                .parse()
                .map_err(|e: String| anyhow::anyhow!("task {}: {}", t.id, e))?;

            Ok(WritingTask {
                label: t.label.unwrap_or_else(|| t.id.clone()),
                id: t.id,
                category,
                instruction: t.instruction,
                min_words: t.min_words,
                points: t
                    .points
                    .into_iter()
                    .map(|p| TaskPoint {
                        id: p.id,
                        text: p.text,
                    })
                    .collect(),
                hints: t.hints,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog {
        id: parsed.catalog.id,
        name: parsed.catalog.name,
        description: parsed.catalog.description,
        tasks,
    })
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// Load a catalog from a file, or merge every catalog found under a directory.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.is_dir() {
        return parse_catalog(path);
    }
    let mut parts = load_catalog_directory(path)?;
    // read_dir order is platform dependent
    parts.sort_by(|a, b| a.id.cmp(&b.id));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    Ok(Catalog::merge(name.clone(), name, parts))
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The task ID (if applicable).
    pub task_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common authoring mistakes.
pub fn validate_catalog(catalog: &Catalog, lexicon: &Lexicon) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |task: &WritingTask, message: String| ValidationWarning {
        task_id: Some(task.id.clone()),
        message,
    };

    let mut seen_ids = HashSet::new();
    for task in &catalog.tasks {
        if !seen_ids.insert(&task.id) {
            warnings.push(warn(task, format!("duplicate task ID: {}", task.id)));
        }
    }

    for task in &catalog.tasks {
        if task.min_words == 0 {
            warnings.push(warn(task, "min_words is 0".into()));
        }
        if task.instruction.trim().is_empty() {
            warnings.push(warn(task, "instruction is empty".into()));
        }
        if task.points.is_empty() {
            warnings.push(warn(task, "task has no content points".into()));
        }

        let mut point_ids = HashSet::new();
        for point in &task.points {
            if !point_ids.insert(&point.id) {
                warnings.push(warn(task, format!("duplicate point ID: {}", point.id)));
            }
            if key_terms(&point.text, lexicon).is_empty() {
                warnings.push(warn(
                    task,
                    format!("point {} has no key terms and can never be covered", point.id),
                ));
            }
        }
    }

    warnings
}
