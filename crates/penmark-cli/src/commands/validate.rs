//! The `penmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

use penmark_core::catalog::{load_catalog_directory, parse_catalog, validate_catalog};
use penmark_core::lexicon::Lexicon;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalogs = if catalog_path.is_dir() {
        load_catalog_directory(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };
    anyhow::ensure!(
        !catalogs.is_empty(),
        "no catalog files found in {}",
        catalog_path.display()
    );

    let mut total_warnings = 0;

    for catalog in &catalogs {
        println!("Catalog: {} ({} tasks)", catalog.name, catalog.tasks.len());

        let warnings = validate_catalog(catalog, Lexicon::standard());
        for w in &warnings {
            let prefix = w
                .task_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
