//! The `quizcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizcheck_core::bank::{lint_bank, load_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = load_bank(&bank_path)?;

    println!(
        "Question bank: {} ({} questions)",
        bank_path.display(),
        bank.len()
    );

    let warnings = lint_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All question banks valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
