//! quizcheck-core: answer validation, code-blank derivation and quiz sessions.
//!
//! This crate holds the question model, the graders for every question
//! kind, the randomizer that turns code scripts into fill-in-the-line
//! questions, and the session and report types built on top of them.

pub mod answer;
pub mod bank;
pub mod error;
pub mod hint;
pub mod model;
pub mod randomizer;
pub mod report;
pub mod session;
pub mod store;
pub mod validation;

