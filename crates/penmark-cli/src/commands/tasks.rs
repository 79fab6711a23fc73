//! The `penmark tasks` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use penmark_core::model::{TaskCategory, TaskSection};

use super::load_catalog_or_builtin;

pub fn execute(category: Option<String>, catalog_path: Option<PathBuf>) -> Result<()> {
    let category = category
        .map(|c| c.parse::<TaskCategory>().map_err(anyhow::Error::msg))
        .transpose()?;
    let catalog = load_catalog_or_builtin(catalog_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Section", "Min words", "Points", "Label"]);

    let mut shown = 0;
    for task in catalog
        .tasks
        .iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
    {
        let section = match task.category.section() {
            TaskSection::Task1 => "task 1",
            TaskSection::Task2 => "task 2",
        };
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(task.category),
            Cell::new(section),
            Cell::new(task.min_words),
            Cell::new(task.points.len()),
            Cell::new(&task.label),
        ]);
        shown += 1;
    }

    println!("Catalog: {} ({shown} tasks)", catalog.name);
    println!("{table}");
    Ok(())
}
