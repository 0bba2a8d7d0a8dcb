//! The `quizcheck categories` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizcheck_core::bank::load_bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = load_bank(&bank_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Section", "Key", "Questions", "Description"]);

    for info in bank.categories() {
        table.add_row(vec![
            Cell::new(&info.name),
            Cell::new(info.kind.slug()),
            Cell::new(info.count),
            Cell::new(&info.description),
        ]);
    }

    println!("{table}");
    Ok(())
}
