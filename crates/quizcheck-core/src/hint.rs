//! One-line hints shown on request during a quiz.

use crate::model::{Question, QuestionKind};

const FALLBACK: &str = "Review the explanation for guidance.";

/// Hint for `question`, revealing the first word of its key.
///
/// Falls back to a generic hint when the key cannot be resolved.
pub fn hint(question: &Question) -> String {
    match &question.kind {
        QuestionKind::McqSingle {
            options,
            correct_answer,
        } => option_hint(options, Some(*correct_answer)),
        QuestionKind::McqMulti {
            options,
            correct_answer,
        } => option_hint(options, correct_answer.first().copied()),
        QuestionKind::FillGaps(key) | QuestionKind::CompleteCode(key) => {
            match key.correct_answer.first().map(|a| first_word(a)) {
                Some(word) if !word.is_empty() => {
                    format!("The first gap starts with: \"{word}...\"")
                }
                _ => FALLBACK.to_string(),
            }
        }
        QuestionKind::Unsupported => FALLBACK.to_string(),
    }
}

fn option_hint(options: &[String], index: Option<usize>) -> String {
    match index.and_then(|i| options.get(i)).map(|o| first_word(o)) {
        Some(word) if !word.is_empty() => {
            format!("The correct answer starts with: \"{word}...\"")
        }
        _ => FALLBACK.to_string(),
    }
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}
