//! Answer validation.
//!
//! [`validate`] grades a submitted answer against a question's key and
//! returns a fresh [`ValidationResult`]. Grading is pure: no state is kept
//! between calls and degenerate input (no answer, a blank gap, an answer of
//! the wrong shape, an unknown question type) is graded incorrect instead of
//! failing.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::answer::Answer;
use crate::model::{Feedback, GapKey, Question, QuestionKind, ValidationResult};

/// Shown when a code question is submitted without any answers.
pub const NO_CODE_ANSWERS: &str = "Please provide answers for all gaps";

/// Grade `user_answer` against `question`.
pub fn validate(question: &Question, user_answer: Option<&Answer>) -> ValidationResult {
    let normalizer = Normalizer {
        case_sensitive: question.case_sensitive(),
    };

    let result = match &question.kind {
        QuestionKind::McqSingle { correct_answer, .. } => {
            validate_mcq_single(*correct_answer, user_answer)
        }
        QuestionKind::McqMulti {
            options,
            correct_answer,
        } => validate_mcq_multi(options, correct_answer, user_answer),
        QuestionKind::FillGaps(key) => validate_fill_gaps(key, normalizer, user_answer),
        QuestionKind::CompleteCode(key) => validate_complete_code(key, normalizer, user_answer),
        QuestionKind::Unsupported => ValidationResult {
            is_correct: false,
            is_partially_correct: None,
            user_answer: user_answer.cloned(),
            correct_answer: None,
            feedback: Feedback::default(),
        },
    };

    tracing::debug!(
        question = %question.id,
        kind = question.kind.type_name(),
        correct = result.is_correct,
        partial = result.partially_correct(),
        "graded answer"
    );

    result
}

/// Trim-and-fold comparison shared by the gap graders.
#[derive(Debug, Clone, Copy)]
struct Normalizer {
    case_sensitive: bool,
}

impl Normalizer {
    fn normalize<'a>(&self, s: &'a str) -> Cow<'a, str> {
        let trimmed = s.trim();
        if self.case_sensitive {
            Cow::Borrowed(trimmed)
        } else {
            Cow::Owned(trimmed.to_lowercase())
        }
    }

    /// Blank on either side never matches.
    fn matches(&self, submitted: &str, expected: &str) -> bool {
        if is_blank(submitted) || is_blank(expected) {
            return false;
        }
        self.normalize(submitted) == self.normalize(expected)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn validate_mcq_single(correct: usize, user_answer: Option<&Answer>) -> ValidationResult {
    let is_correct = matches!(user_answer, Some(Answer::Choice(chosen)) if *chosen == correct);

    ValidationResult {
        is_correct,
        is_partially_correct: None,
        user_answer: user_answer.cloned(),
        correct_answer: Some(Answer::Choice(correct)),
        feedback: Feedback::default(),
    }
}

fn validate_mcq_multi(
    options: &[String],
    correct: &[usize],
    user_answer: Option<&Answer>,
) -> ValidationResult {
    let correct_set = unique(correct);
    let label = |idx: &usize| option_label(options, *idx);

    let selected = match user_answer {
        Some(Answer::Choices(selected)) if !selected.is_empty() => selected,
        _ => {
            return ValidationResult {
                is_correct: false,
                is_partially_correct: Some(false),
                user_answer: Some(Answer::Choices(Vec::new())),
                correct_answer: Some(Answer::Choices(correct.to_vec())),
                feedback: Feedback {
                    missing: correct_set.iter().map(label).collect(),
                    ..Default::default()
                },
            };
        }
    };

    let user_set = unique(selected);
    let is_correct = correct_set.len() == user_set.len()
        && correct_set.iter().all(|idx| user_set.contains(idx));

    let missing: Vec<String> = correct_set
        .iter()
        .filter(|idx| !user_set.contains(*idx))
        .map(label)
        .collect();
    let incorrect: Vec<String> = user_set
        .iter()
        .filter(|idx| !correct_set.contains(*idx))
        .map(label)
        .collect();
    let hits: Vec<String> = user_set
        .iter()
        .filter(|idx| correct_set.contains(*idx))
        .map(label)
        .collect();

    ValidationResult {
        is_correct,
        is_partially_correct: Some(!hits.is_empty() && !is_correct),
        user_answer: user_answer.cloned(),
        correct_answer: Some(Answer::Choices(correct.to_vec())),
        feedback: Feedback {
            correct: hits,
            incorrect,
            missing,
        },
    }
}

fn validate_fill_gaps(
    key: &GapKey,
    normalizer: Normalizer,
    user_answer: Option<&Answer>,
) -> ValidationResult {
    let correct_answer = Some(Answer::Gaps(key.correct_answer.clone()));

    let submitted = match user_answer {
        Some(Answer::Gaps(gaps)) if !gaps.is_empty() => gaps,
        _ => {
            return ValidationResult {
                is_correct: false,
                is_partially_correct: Some(false),
                user_answer: Some(Answer::Gaps(Vec::new())),
                correct_answer,
                feedback: Feedback {
                    incorrect: key
                        .correct_answer
                        .iter()
                        .enumerate()
                        .map(|(i, expected)| {
                            format!("Gap {}: (empty) (expected: \"{expected}\")", i + 1)
                        })
                        .collect(),
                    ..Default::default()
                },
            };
        }
    };

    let mut feedback = Feedback::default();
    let mut passed = 0;

    for (i, expected) in key.correct_answer.iter().enumerate() {
        let answer = submitted.get(i).map(String::as_str).unwrap_or("");
        let ok = key
            .accepted_for(i)
            .into_iter()
            .any(|accepted| normalizer.matches(answer, accepted));

        if ok {
            passed += 1;
            feedback.correct.push(answer.to_string());
        } else {
            let shown = if is_blank(answer) { "(empty)" } else { answer };
            feedback.incorrect.push(format!(
                "Gap {}: \"{shown}\" (expected: \"{expected}\")",
                i + 1
            ));
        }
    }

    let is_correct = passed == key.gap_count();

    ValidationResult {
        is_correct,
        is_partially_correct: Some(passed > 0 && !is_correct),
        user_answer: user_answer.cloned(),
        correct_answer,
        feedback,
    }
}

/// No partial credit here, and only `incorrect` feedback.
fn validate_complete_code(
    key: &GapKey,
    normalizer: Normalizer,
    user_answer: Option<&Answer>,
) -> ValidationResult {
    let correct_answer = Some(Answer::Gaps(key.correct_answer.clone()));

    let submitted = match user_answer {
        Some(Answer::Gaps(gaps)) if !gaps.is_empty() => gaps,
        _ => {
            return ValidationResult {
                is_correct: false,
                is_partially_correct: None,
                user_answer: user_answer.cloned(),
                correct_answer,
                feedback: Feedback {
                    incorrect: vec![NO_CODE_ANSWERS.to_string()],
                    ..Default::default()
                },
            };
        }
    };

    let mut incorrect = Vec::new();
    let mut passed = 0;

    for (i, expected) in key.correct_answer.iter().enumerate() {
        let answer = submitted.get(i).map(String::as_str).unwrap_or("");
        if is_blank(answer) {
            incorrect.push(format!("Gap {}: Empty answer", i + 1));
            continue;
        }

        // A gap without a primary key can never pass, alternatives or not.
        let ok = !is_blank(expected)
            && (normalizer.matches(answer, expected)
                || key.alternatives(i).is_some_and(|alternatives| {
                    alternatives
                        .iter()
                        .any(|accepted| normalizer.matches(answer, accepted))
                }));

        if ok {
            passed += 1;
        } else {
            incorrect.push(format!(
                "Gap {}: \"{answer}\" (expected: \"{expected}\")",
                i + 1
            ));
        }
    }

    ValidationResult {
        is_correct: passed == key.gap_count(),
        is_partially_correct: None,
        user_answer: user_answer.cloned(),
        correct_answer,
        feedback: Feedback {
            incorrect,
            ..Default::default()
        },
    }
}

/// Deduplicate, keeping first-seen order.
fn unique(indices: &[usize]) -> Vec<usize> {
    let mut seen = HashSet::new();
    indices.iter().copied().filter(|i| seen.insert(*i)).collect()
}

/// Display text of an option, or a positional label for a dangling index.
fn option_label(options: &[String], idx: usize) -> String {
    options
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("Option {}", idx + 1))
}
