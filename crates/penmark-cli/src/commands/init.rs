//! The `penmark init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("penmark.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("catalog").context("failed to create catalog directory")?;
    write_if_missing(Path::new("catalog/example.toml"), EXAMPLE_CATALOG)?;

    println!("\nNext steps:");
    println!("  1. Edit penmark.toml (language, proofing endpoint, API key)");
    println!("  2. Run: penmark validate --catalog catalog/example.toml");
    println!("  3. Run: penmark evaluate --catalog catalog --task ex_email_delivery --file answer.txt");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# penmark configuration

language = "en-GB"
parallelism = 4
output_dir = "./penmark-results"
# catalog = "catalog"
# dictionary = "words.txt"

[proofing]
enabled = true
endpoint = "https://api.languagetool.org/v2/check"
# Premium accounts only; both must be set.
# username = "you@example.com"
# api_key = "${LANGUAGETOOL_API_KEY}"
timeout_secs = 20
"#;

const EXAMPLE_CATALOG: &str = r#"[catalog]
id = "example"
name = "Example tasks"
description = "A starter catalog to copy from"

[[tasks]]
id = "ex_email_delivery"
label = "Formal E-mail (Late Delivery)"
category = "email"
instruction = "Write a formal e-mail to a supplier about a late delivery. Cover all three points."
min_words = 120
hints = ["Dear Sir or Madam,", "I am writing regarding...", "Yours faithfully,"]

[[tasks.points]]
id = "p1"
text = "Explain which delivery is late"

[[tasks.points]]
id = "p2"
text = "Describe the impact on your team"

[[tasks.points]]
id = "p3"
text = "Request a new delivery date"

[[tasks]]
id = "ex_report_training"
label = "Report (Training Facilities)"
category = "report"
instruction = "Write a report on the training facilities at your unit with recommendations."
min_words = 200

[[tasks.points]]
id = "p1"
text = "Describe the current facilities"

[[tasks.points]]
id = "p2"
text = "Identify the main problems"

[[tasks.points]]
id = "p3"
text = "Recommend improvements"
"#;
