//! The `penmark evaluate` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use penmark_core::engine::{Assessment, Assessor, ProgressReporter};
use penmark_core::lexicon::Dictionary;
use penmark_core::model::Submission;
use penmark_core::report::AssessmentReport;
use penmark_proof::config::load_config_from;
use penmark_proof::create_proofer;
use penmark_proof::languagetool::parse_language;
use penmark_report::write_html_report;

use super::load_catalog_or_builtin;

const FORMATS: [&str; 4] = ["text", "json", "html", "all"];

pub struct EvaluateArgs {
    pub task: String,
    pub files: Vec<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub language: Option<String>,
    pub endpoint: Option<String>,
    pub offline: bool,
    pub dictionary: Option<PathBuf>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub parallelism: Option<usize>,
    pub config: Option<PathBuf>,
}

/// Console progress reporter.
struct ConsoleReporter {
    sources: Vec<String>,
}

impl ProgressReporter for ConsoleReporter {
    fn on_assess_start(&self, index: usize, task_id: &str) {
        eprintln!("  Assessing: {} :: {task_id}", self.source(index));
    }

    fn on_assess_complete(&self, index: usize, assessment: &Assessment) {
        eprintln!(
            "  Done: {} {}/40 (proofing {})",
            self.source(index),
            assessment.result.total(),
            assessment.proofing
        );
    }

    fn on_batch_complete(&self, total: usize, degraded: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {total} assessed, {degraded} with degraded proofing ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

impl ConsoleReporter {
    fn source(&self, index: usize) -> &str {
        self.sources.get(index).map(String::as_str).unwrap_or("?")
    }
}

pub async fn execute(args: EvaluateArgs) -> Result<()> {
    let formats: Vec<&str> = if args.format == "all" {
        vec!["text", "json", "html"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            FORMATS.contains(fmt),
            "unknown format '{fmt}' (expected one of: {})",
            FORMATS.join(", ")
        );
    }

    let config = load_config_from(args.config.as_deref())?;
    let parallelism = args.parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let language = match &args.language {
        Some(code) => parse_language(code)?,
        None => config.language()?,
    };

    let catalog_path = args.catalog.as_deref().or(config.catalog.as_deref());
    let catalog = load_catalog_or_builtin(catalog_path)?;
    let task = catalog.get(&args.task).with_context(|| {
        let ids: Vec<&str> = catalog.tasks.iter().map(|t| t.id.as_str()).collect();
        format!("task '{}' not found. Available: {}", args.task, ids.join(", "))
    })?;

    let mut assessor = Assessor::new().with_language(language);

    if let Some(path) = args.dictionary.as_deref().or(config.dictionary.as_deref()) {
        let dictionary = Dictionary::load(path)?;
        tracing::info!("loaded {} dictionary words from {}", dictionary.len(), path.display());
        assessor = assessor.with_dictionary(dictionary);
    }

    if !args.offline {
        let mut proofing = config.proofing.clone();
        if let Some(endpoint) = &args.endpoint {
            proofing.endpoint = endpoint.clone();
        }
        if let Some(proofer) = create_proofer(&proofing)? {
            assessor = assessor.with_proofer(proofer);
        }
    }

    let mut texts = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission: {}", path.display()))?;
        texts.push(text);
    }
    let submissions: Vec<Submission<'_>> =
        texts.iter().map(|t| Submission::new(t.as_str(), task)).collect();

    eprintln!(
        "penmark v{}: assessing {} submission(s) for {} ({}, proofing {})",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        task.id,
        language,
        assessor.proofer_name().unwrap_or("off")
    );

    let reporter = ConsoleReporter {
        sources: args.files.iter().map(|p| p.display().to_string()).collect(),
    };
    let assessments = assessor
        .assess_batch(&submissions, parallelism, &reporter)
        .await;

    let reports: Vec<AssessmentReport> = assessments
        .into_iter()
        .zip(texts.iter().zip(&args.files))
        .map(|(assessment, (text, path))| {
            AssessmentReport::new(task, text.as_str(), language, assessment)
                .with_source(path.display().to_string())
        })
        .collect();

    if formats.contains(&"text") {
        print_summary(&reports);
        for report in &reports {
            print_details(report);
        }
    }

    let output = args.output.unwrap_or(config.output_dir);
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    for (report, path) in reports.iter().zip(&args.files) {
        let stem = file_stem(path);
        if formats.contains(&"json") {
            let path = output.join(format!("{stem}-{timestamp}.json"));
            report.save_json(&path)?;
            eprintln!("Results saved to: {}", path.display());
        }
        if formats.contains(&"html") {
            let path = output.join(format!("{stem}-{timestamp}.html"));
            write_html_report(report, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "submission".to_string())
}

fn print_summary(reports: &[AssessmentReport]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Submission",
        "Words",
        "Language",
        "Form",
        "Organisation",
        "Effect",
        "Total",
        "Issues",
        "Proofing",
    ]);

    for report in reports {
        let card = &report.result.scorecard;
        table.add_row(vec![
            Cell::new(report.source.as_deref().unwrap_or("-")),
            Cell::new(format!("{}/{}", card.facts.words, report.task.min_words)),
            Cell::new(card.scores.language),
            Cell::new(card.scores.form),
            Cell::new(card.scores.organisation),
            Cell::new(card.scores.effect),
            Cell::new(format!("{}/40", card.total)),
            Cell::new(report.result.issue_count()),
            Cell::new(&report.proofing),
        ]);
    }

    println!("{table}");
}

fn print_details(report: &AssessmentReport) {
    let card = &report.result.scorecard;
    println!("\n{}", report.summary_line());

    let missing: Vec<&str> = card
        .coverage
        .iter()
        .filter(|c| !c.covered)
        .map(|c| c.text.as_str())
        .collect();
    if !missing.is_empty() {
        println!("  Missing points:");
        for text in missing {
            println!("    - {text}");
        }
    }

    for issue in &report.result.spelling.issues {
        println!("  spelling: {} -> {} (x{})", issue.word, issue.suggestion, issue.count);
    }
    for issue in &report.result.unknown_words.issues {
        println!("  unknown: {} (x{})", issue.word, issue.count);
    }
    for issue in &report.result.grammar.issues {
        match &issue.example {
            Some(example) => println!("  grammar: {} \"{example}\" (x{})", issue.message, issue.count),
            None => println!("  grammar: {} (x{})", issue.message, issue.count),
        }
    }
    if let Some(proof) = &report.result.proof {
        for issue in &proof.issues {
            match &issue.suggestion {
                Some(s) => println!("  proof: {} -> {s}", issue.message),
                None => println!("  proof: {}", issue.message),
            }
        }
    }

    if !card.advice.is_empty() {
        println!("  Advice:");
        for tip in &card.advice {
            println!("    - {tip}");
        }
    }
}
