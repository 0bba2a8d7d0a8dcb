//! Submitted answers and parsing of answers typed at a terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnswerError;

/// A candidate answer, shaped after the question kind it answers.
///
/// Deserializes untagged: `2` is a [`Answer::Choice`], `[0, 2]` is
/// [`Answer::Choices`] and `["Paris", "42"]` is [`Answer::Gaps`]. An empty
/// JSON array becomes an empty `Choices`, which every gap grader treats the
/// same as an empty `Gaps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Index of the chosen option (`mcq_single`).
    Choice(usize),
    /// Indices of the chosen options (`mcq_multi`).
    Choices(Vec<usize>),
    /// One string per gap (`fill_gaps`, `complete_code`).
    Gaps(Vec<String>),
}

impl Answer {
    /// Build a gap answer from anything string-like.
    pub fn gaps<I, S>(gaps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Gaps(gaps.into_iter().map(Into::into).collect())
    }

    /// Whether the answer carries nothing to grade.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Choice(_) => false,
            Answer::Choices(c) => c.is_empty(),
            Answer::Gaps(g) => g.is_empty(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(i) => write!(f, "{}", i + 1),
            Answer::Choices(c) => {
                let parts: Vec<String> = c.iter().map(|i| (i + 1).to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            Answer::Gaps(g) => {
                let parts: Vec<String> = g.iter().map(|s| format!("\"{s}\"")).collect();
                write!(f, "{}", parts.join(" | "))
            }
        }
    }
}

/// Parse a 1-based option number into a 0-based index.
pub fn parse_choice(input: &str, option_count: usize) -> Result<usize, AnswerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnswerError::Empty);
    }
    let choice: usize = trimmed
        .parse()
        .map_err(|_| AnswerError::NotANumber(trimmed.to_string()))?;
    if choice == 0 || choice > option_count {
        return Err(AnswerError::OutOfRange {
            choice,
            count: option_count,
        });
    }
    Ok(choice - 1)
}

/// Parse a comma- or space-separated list of 1-based option numbers.
pub fn parse_choices(input: &str, option_count: usize) -> Result<Vec<usize>, AnswerError> {
    let choices = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| parse_choice(part, option_count))
        .collect::<Result<Vec<_>, _>>()?;

    if choices.is_empty() {
        return Err(AnswerError::Empty);
    }
    Ok(choices)
}
