//! The `quizcheck bookmark` and `quizcheck bookmarks` commands.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use quizcheck_core::bank::{load_bank, QuestionBank, Section};
use quizcheck_core::store::Bookmarks;

use crate::config::QuizcheckConfig;
use crate::store::JsonFileStore;

const UNCATEGORIZED: &str = "Uncategorized";
const NOT_FOUND: &str = "Not in question bank";

pub fn toggle(config: &QuizcheckConfig, id: &str) -> Result<()> {
    if let Some(bank) = try_load_bank(&config.bank_dir) {
        if bank.find(id).is_none() && bank.find_script(id).is_none() {
            tracing::warn!(question = id, "bookmarked id not found in question bank");
        }
    }

    let mut bookmarks = Bookmarks::open(JsonFileStore::new(&config.state_dir));
    if bookmarks.toggle(id)? {
        println!("Bookmarked {id}");
    } else {
        println!("Removed bookmark {id}");
    }
    Ok(())
}

pub fn list(config: &QuizcheckConfig) -> Result<()> {
    let bookmarks = Bookmarks::open(JsonFileStore::new(&config.state_dir));

    if bookmarks.count() == 0 {
        println!("No bookmarks yet.");
        return Ok(());
    }

    let bank = try_load_bank(&config.bank_dir).unwrap_or_default();
    let groups = group_by_category(&bank, bookmarks.ids());

    println!("{} bookmarked question(s):", bookmarks.count());
    for (category, lines) in &groups {
        println!();
        println!("{category}");
        for line in lines {
            println!("  {line}");
        }
    }
    Ok(())
}

fn try_load_bank(path: &Path) -> Option<QuestionBank> {
    match load_bank(path) {
        Ok(bank) => Some(bank),
        Err(e) => {
            tracing::warn!(error = %e, "question bank not loaded, bookmarks not resolved");
            None
        }
    }
}

/// One display line per question an id resolves to, keyed by category.
///
/// Ids are only unique within a collection, so one bookmark can list
/// several questions. Ids that resolve to nothing get their own group.
fn group_by_category<'a>(
    bank: &QuestionBank,
    ids: impl Iterator<Item = &'a str>,
) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut missing = Vec::new();

    for id in ids {
        let entries = resolve(bank, id);
        if entries.is_empty() {
            missing.push(id.to_string());
        }
        for (category, line) in entries {
            groups.entry(category).or_default().push(line);
        }
    }

    if !missing.is_empty() {
        groups.insert(NOT_FOUND.to_string(), missing);
    }
    groups
}

fn resolve(bank: &QuestionBank, id: &str) -> Vec<(String, String)> {
    let questions = bank
        .mcq_single
        .iter()
        .chain(&bank.mcq_multi)
        .chain(&bank.fill_gaps)
        .chain(&bank.complete_code)
        .chain(&bank.unsupported)
        .filter(|q| q.id == id)
        .map(|q| {
            let section = Section::of(&q.kind).map_or(q.kind.type_name(), |s| s.name());
            entry(id, &q.category, section, &q.prompt)
        });

    let scripts = bank.scripts.iter().filter(|s| s.id == id).map(|s| {
        let heading = [&s.title, &s.description, &s.code]
            .into_iter()
            .find(|text| !text.trim().is_empty())
            .map_or("", String::as_str);
        entry(id, &s.category, Section::CompleteCode.name(), heading)
    });

    questions.chain(scripts).collect()
}

fn entry(id: &str, category: &str, section: &str, text: &str) -> (String, String) {
    let category = if category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        category
    };
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    (category.to_string(), format!("{id} [{section}] {first_line}"))
}
