//! Core data model types for quizcheck.
//!
//! A [`Question`] is a set of common fields plus a [`QuestionKind`] carrying
//! the options and answer key of one question type. [`CodeScript`] is the
//! template that code-completion questions are derived from, and
//! [`ValidationResult`] is what grading returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::Answer;

/// Gap markers recognised inside `fill_gaps` prompts.
pub const GAP_MARKERS: [&str; 2] = ["___", "{{gap}}"];

/// A single practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier within its collection.
    pub id: String,
    /// Display grouping (not unique).
    #[serde(default)]
    pub category: String,
    /// Question text. May embed gap markers, or be full source code.
    pub prompt: String,
    /// Shown after grading.
    #[serde(default)]
    pub explanation: String,
    /// Per-question switches.
    #[serde(default)]
    pub settings: QuestionSettings,
    /// Type-specific options and answer key.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Whether gap comparison is case sensitive for this question.
    ///
    /// Unset means case-insensitive for `fill_gaps` and case-sensitive for
    /// `complete_code`.
    pub fn case_sensitive(&self) -> bool {
        self.settings
            .case_sensitive
            .unwrap_or(matches!(self.kind, QuestionKind::CompleteCode(_)))
    }
}

/// Optional per-question switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_options: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

/// The question type, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuestionKind {
    /// One correct option.
    McqSingle {
        options: Vec<String>,
        correct_answer: usize,
    },
    /// A set of correct options.
    McqMulti {
        options: Vec<String>,
        correct_answer: Vec<usize>,
    },
    /// Words or phrases missing from a prose prompt.
    FillGaps(GapKey),
    /// Lines missing from a code listing.
    CompleteCode(GapKey),
    /// Any `type` this version does not know. Always graded incorrect.
    #[serde(other)]
    Unsupported,
}

impl QuestionKind {
    /// The wire name of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::McqSingle { .. } => "mcq_single",
            QuestionKind::McqMulti { .. } => "mcq_multi",
            QuestionKind::FillGaps(_) => "fill_gaps",
            QuestionKind::CompleteCode(_) => "complete_code",
            QuestionKind::Unsupported => "unsupported",
        }
    }

    /// The choice options, for MCQ kinds.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::McqSingle { options, .. } | QuestionKind::McqMulti { options, .. } => {
                Some(options)
            }
            _ => None,
        }
    }

    /// The gap key, for gap kinds.
    pub fn gap_key(&self) -> Option<&GapKey> {
        match self {
            QuestionKind::FillGaps(key) | QuestionKind::CompleteCode(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Answer key of a gap question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapKey {
    /// One expected string per gap, in gap order.
    pub correct_answer: Vec<String>,
    /// Per-gap alternatives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_answers: Option<Vec<Vec<String>>>,
}

impl GapKey {
    pub fn gap_count(&self) -> usize {
        self.correct_answer.len()
    }

    /// Alternatives listed for gap `index`, if any.
    pub fn alternatives(&self, index: usize) -> Option<&[String]> {
        self.accepted_answers
            .as_ref()
            .and_then(|all| all.get(index))
            .map(Vec::as_slice)
    }

    /// The accepted set for gap `index`: its alternatives when listed,
    /// otherwise just the primary answer.
    pub fn accepted_for(&self, index: usize) -> Vec<&str> {
        match self.alternatives(index) {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => self
                .correct_answer
                .get(index)
                .map(String::as_str)
                .into_iter()
                .collect(),
        }
    }
}

/// Count gap markers (`___` or `{{gap}}`) in a prompt, left to right.
pub fn count_gap_markers(prompt: &str) -> usize {
    let mut count = 0;
    let mut rest = prompt;
    while !rest.is_empty() {
        if let Some(marker) = GAP_MARKERS.iter().find(|m| rest.starts_with(*m)) {
            count += 1;
            rest = &rest[marker.len()..];
        } else {
            let next = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[next..];
        }
    }
    count
}

/// A code listing from which `complete_code` questions are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeScript {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Multi-line source.
    pub code: String,
    /// 0-based line indices that may become blanks.
    #[serde(default)]
    pub blankable_lines: Vec<usize>,
    #[serde(default)]
    pub settings: ScriptSettings,
    /// Whether blanks are re-drawn on every attempt.
    #[serde(default = "default_true")]
    pub randomize: bool,
}

impl CodeScript {
    /// Blankable lines that exist and are not blank, ascending and unique.
    pub fn eligible_lines(&self) -> Vec<usize> {
        let lines: Vec<&str> = self.code.split('\n').collect();
        let mut eligible: Vec<usize> = self
            .blankable_lines
            .iter()
            .copied()
            .filter(|&i| lines.get(i).is_some_and(|line| !line.trim().is_empty()))
            .collect();
        eligible.sort_unstable();
        eligible.dedup();
        eligible
    }

    /// This script with `blankable_lines` narrowed to the eligible ones.
    pub fn prepared(mut self) -> Self {
        self.blankable_lines = self.eligible_lines();
        self
    }
}

/// Settings of a [`CodeScript`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSettings {
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Upper bound on blanks per attempt.
    #[serde(default = "default_max_blanks")]
    pub max_blanks: usize,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_blanks: default_max_blanks(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_blanks() -> usize {
    3
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_correct: bool,
    /// Set only by graders that award partial credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_partially_correct: Option<bool>,
    /// Echo of the submitted answer.
    pub user_answer: Option<Answer>,
    /// Echo of the key; `None` for unsupported question types.
    pub correct_answer: Option<Answer>,
    #[serde(default)]
    pub feedback: Feedback,
}

impl ValidationResult {
    pub fn partially_correct(&self) -> bool {
        self.is_partially_correct.unwrap_or(false)
    }
}

/// Human-readable feedback lines, grouped by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub correct: Vec<String>,
    #[serde(default)]
    pub incorrect: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self.correct.is_empty() && self.incorrect.is_empty() && self.missing.is_empty()
    }
}
