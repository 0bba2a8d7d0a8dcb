//! Typed error kinds.
//!
//! Grading itself never fails; these cover the edges around it: turning
//! terminal input into an [`Answer`](crate::answer::Answer) and talking to
//! the bookmark and review stores.

use thiserror::Error;

/// Errors from parsing a typed answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    /// Nothing was entered.
    #[error("no option selected")]
    Empty,

    /// The input is not an option number.
    #[error("not an option number: {0}")]
    NotANumber(String),

    /// The option number does not exist on this question.
    #[error("option {choice} is out of range (1-{count})")]
    OutOfRange { choice: usize, count: usize },
}

/// Errors from a bookmark or review store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be (de)serialized.
    #[error("store data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
