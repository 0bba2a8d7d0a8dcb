//! Question bank loading and linting.
//!
//! Loads question banks from JSON or TOML files and directories, sorts
//! them into the four quiz sections, and checks them for common data
//! problems.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{count_gap_markers, CodeScript, Question, QuestionKind};
use crate::randomizer::derive_code_question_with;

/// On-disk shape of a bank file. Both arrays are optional.
#[derive(Debug, Default, Deserialize)]
struct BankFile {
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    scripts: Vec<CodeScript>,
}

/// One of the four quiz sections a bank is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    McqSingle,
    McqMulti,
    FillGaps,
    CompleteCode,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::McqSingle,
        Section::McqMulti,
        Section::FillGaps,
        Section::CompleteCode,
    ];

    /// Display name, also accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Section::McqSingle => "MCQ questions (One answer)",
            Section::McqMulti => "MCQ questions (Multiple answers)",
            Section::FillGaps => "Fill in the Gaps",
            Section::CompleteCode => "Complete the code",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Section::McqSingle => "Multiple choice questions with one correct answer",
            Section::McqMulti => "Multiple choice questions with multiple correct answers",
            Section::FillGaps => "Complete the missing words or phrases",
            Section::CompleteCode => "Fill in missing lines of code",
        }
    }

    /// Short name used on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Section::McqSingle => "single",
            Section::McqMulti => "multi",
            Section::FillGaps => "gaps",
            Section::CompleteCode => "code",
        }
    }

    /// Wire name of the question type played in this section.
    pub fn type_name(&self) -> &'static str {
        match self {
            Section::McqSingle => "mcq_single",
            Section::McqMulti => "mcq_multi",
            Section::FillGaps => "fill_gaps",
            Section::CompleteCode => "complete_code",
        }
    }

    /// The section a question of this kind belongs to.
    pub fn of(kind: &QuestionKind) -> Option<Section> {
        match kind {
            QuestionKind::McqSingle { .. } => Some(Section::McqSingle),
            QuestionKind::McqMulti { .. } => Some(Section::McqMulti),
            QuestionKind::FillGaps(_) => Some(Section::FillGaps),
            QuestionKind::CompleteCode(_) => Some(Section::CompleteCode),
            QuestionKind::Unsupported => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| {
                wanted == section.name().to_lowercase()
                    || wanted == section.slug()
                    || wanted == section.type_name()
            })
            .ok_or_else(|| format!("unknown section: {}", s.trim()))
    }
}

/// Summary of one section, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub count: usize,
    pub kind: Section,
    pub description: String,
}

/// All loaded questions, split by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    pub mcq_single: Vec<Question>,
    pub mcq_multi: Vec<Question>,
    pub fill_gaps: Vec<Question>,
    /// Stored code questions with fixed gaps.
    pub complete_code: Vec<Question>,
    /// Code templates, eligible-line filter already applied.
    pub scripts: Vec<CodeScript>,
    /// Questions of a type this version cannot grade.
    pub unsupported: Vec<Question>,
}

impl QuestionBank {
    /// File a question under its section.
    pub fn insert_question(&mut self, question: Question) {
        let slot = match Section::of(&question.kind) {
            Some(Section::McqSingle) => &mut self.mcq_single,
            Some(Section::McqMulti) => &mut self.mcq_multi,
            Some(Section::FillGaps) => &mut self.fill_gaps,
            Some(Section::CompleteCode) => &mut self.complete_code,
            None => &mut self.unsupported,
        };
        slot.push(question);
    }

    pub fn insert_script(&mut self, script: CodeScript) {
        self.scripts.push(script.prepared());
    }

    /// Append everything from `other`.
    pub fn merge(&mut self, other: QuestionBank) {
        self.mcq_single.extend(other.mcq_single);
        self.mcq_multi.extend(other.mcq_multi);
        self.fill_gaps.extend(other.fill_gaps);
        self.complete_code.extend(other.complete_code);
        self.scripts.extend(other.scripts);
        self.unsupported.extend(other.unsupported);
    }

    /// Number of playable items in a section.
    pub fn count(&self, section: Section) -> usize {
        match section {
            Section::McqSingle => self.mcq_single.len(),
            Section::McqMulti => self.mcq_multi.len(),
            Section::FillGaps => self.fill_gaps.len(),
            Section::CompleteCode => self.complete_code.len() + self.scripts.len(),
        }
    }

    pub fn len(&self) -> usize {
        Section::ALL.iter().map(|s| self.count(*s)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> Vec<CategoryInfo> {
        Section::ALL
            .iter()
            .map(|section| CategoryInfo {
                name: section.name().to_string(),
                count: self.count(*section),
                kind: *section,
                description: section.description().to_string(),
            })
            .collect()
    }

    /// Questions of a section in bank order. Code scripts are derived
    /// afresh on every call.
    pub fn questions_for<R: Rng + ?Sized>(&self, section: Section, rng: &mut R) -> Vec<Question> {
        match section {
            Section::McqSingle => self.mcq_single.clone(),
            Section::McqMulti => self.mcq_multi.clone(),
            Section::FillGaps => self.fill_gaps.clone(),
            Section::CompleteCode => {
                let mut questions = self.complete_code.clone();
                questions.extend(
                    self.scripts
                        .iter()
                        .map(|script| derive_code_question_with(script, rng).question),
                );
                questions
            }
        }
    }

    /// Look up a stored question by id.
    pub fn find(&self, id: &str) -> Option<&Question> {
        self.mcq_single
            .iter()
            .chain(&self.mcq_multi)
            .chain(&self.fill_gaps)
            .chain(&self.complete_code)
            .chain(&self.unsupported)
            .find(|q| q.id == id)
    }

    pub fn find_script(&self, id: &str) -> Option<&CodeScript> {
        self.scripts.iter().find(|s| s.id == id)
    }
}

/// Shuffle a question list in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    use rand::seq::SliceRandom;
    items.shuffle(rng);
}

/// Parse a single bank file. The format follows the extension: `.toml`
/// is TOML, anything else is JSON.
pub fn load_bank_file(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    load_bank_str(&content, path)
}

/// Parse bank content (useful for testing). `source_path` picks the format
/// and names the source in errors.
pub fn load_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: BankFile = if source_path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?
    };

    let mut bank = QuestionBank::default();
    for question in parsed.questions {
        bank.insert_question(question);
    }
    for script in parsed.scripts {
        bank.insert_script(script);
    }
    Ok(bank)
}

/// Recursively load every `.json` and `.toml` bank under `dir`.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<QuestionBank> {
    let mut bank = QuestionBank::default();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            bank.merge(load_bank_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "json" || ext == "toml")
        {
            match load_bank_file(&path) {
                Ok(file_bank) => bank.merge(file_bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(bank)
}

/// Load a bank from a file or a directory.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        load_bank_file(path)
    }
}

/// A data problem found by [`lint_bank`].
#[derive(Debug, Clone)]
pub struct BankWarning {
    /// The question or script id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl BankWarning {
    fn new(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Check a bank for data problems the grader would otherwise silently
/// mark wrong.
pub fn lint_bank(bank: &QuestionBank) -> Vec<BankWarning> {
    let mut warnings = Vec::new();

    // Ids only need to be unique within their own collection
    for collection in [
        &bank.mcq_single,
        &bank.mcq_multi,
        &bank.fill_gaps,
        &bank.complete_code,
    ] {
        duplicate_ids(collection.iter().map(|q| q.id.as_str()), &mut warnings);
    }
    duplicate_ids(bank.scripts.iter().map(|s| s.id.as_str()), &mut warnings);

    for question in bank
        .mcq_single
        .iter()
        .chain(&bank.mcq_multi)
        .chain(&bank.fill_gaps)
        .chain(&bank.complete_code)
    {
        lint_question(question, &mut warnings);
    }

    for question in &bank.unsupported {
        warnings.push(BankWarning::new(
            &question.id,
            "unsupported question type, it will always be graded incorrect",
        ));
    }

    for script in &bank.scripts {
        if script.code.trim().is_empty() {
            warnings.push(BankWarning::new(&script.id, "code is empty"));
        }
        if script.blankable_lines.is_empty() {
            warnings.push(BankWarning::new(&script.id, "no eligible blankable lines"));
        }
        if script.settings.max_blanks == 0 {
            warnings.push(BankWarning::new(
                &script.id,
                "maxBlanks is 0, no gaps will be produced",
            ));
        }
    }

    warnings
}

fn duplicate_ids<'a>(ids: impl Iterator<Item = &'a str>, warnings: &mut Vec<BankWarning>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warnings.push(BankWarning::new(id, format!("duplicate id: {id}")));
        }
    }
}

fn lint_question(question: &Question, warnings: &mut Vec<BankWarning>) {
    let id = question.id.as_str();

    if question.prompt.trim().is_empty() {
        warnings.push(BankWarning::new(id, "prompt is empty"));
    }

    match &question.kind {
        QuestionKind::McqSingle {
            options,
            correct_answer,
        } => {
            if options.len() < 2 {
                warnings.push(BankWarning::new(id, "fewer than two options"));
            }
            if *correct_answer >= options.len() {
                warnings.push(BankWarning::new(
                    id,
                    format!("correctAnswer {correct_answer} is out of range"),
                ));
            }
        }
        QuestionKind::McqMulti {
            options,
            correct_answer,
        } => {
            if options.len() < 2 {
                warnings.push(BankWarning::new(id, "fewer than two options"));
            }
            if correct_answer.is_empty() {
                warnings.push(BankWarning::new(id, "correctAnswer is empty"));
            }
            let unique: HashSet<_> = correct_answer.iter().collect();
            if unique.len() != correct_answer.len() {
                warnings.push(BankWarning::new(id, "correctAnswer repeats an option"));
            }
            for idx in correct_answer.iter().filter(|&&idx| idx >= options.len()) {
                warnings.push(BankWarning::new(
                    id,
                    format!("correctAnswer {idx} is out of range"),
                ));
            }
        }
        QuestionKind::FillGaps(key) | QuestionKind::CompleteCode(key) => {
            if key.correct_answer.is_empty() {
                warnings.push(BankWarning::new(id, "no gaps defined"));
            }
            if key.correct_answer.iter().any(|a| a.trim().is_empty()) {
                warnings.push(BankWarning::new(
                    id,
                    "a gap has an empty answer and can never be answered correctly",
                ));
            }
            if let Some(accepted) = &key.accepted_answers {
                if accepted.len() != key.gap_count() {
                    warnings.push(BankWarning::new(
                        id,
                        format!(
                            "acceptedAnswers has {} entries for {} gaps",
                            accepted.len(),
                            key.gap_count()
                        ),
                    ));
                }
            }
            if matches!(question.kind, QuestionKind::FillGaps(_)) {
                let markers = count_gap_markers(&question.prompt);
                if markers != key.gap_count() {
                    warnings.push(BankWarning::new(
                        id,
                        format!(
                            "prompt has {markers} gap markers but correctAnswer has {} entries",
                            key.gap_count()
                        ),
                    ));
                }
            }
        }
        QuestionKind::Unsupported => {}
    }
}
