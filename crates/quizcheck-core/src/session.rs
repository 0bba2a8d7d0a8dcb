//! Quiz session accumulator.
//!
//! A [`QuizSession`] walks an ordered list of questions, grades submissions
//! through [`validate`], and keeps the latest answer and result per
//! question position. Ids are only unique within one collection, so a
//! session over several sections never looks answers up by id. The score is derived from the stored results, so
//! re-submitting a question never counts it twice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::model::{Question, ValidationResult};
use crate::validation::validate;

/// How feedback is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Feedback after every question.
    #[default]
    Practice,
    /// Feedback only at the end; everything is re-graded on finish.
    Exam,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Practice => write!(f, "practice"),
            Mode::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "practice" => Ok(Mode::Practice),
            "exam" => Ok(Mode::Exam),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A question paired with the result it was graded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question: Question,
    pub result: ValidationResult,
}

/// Score totals for a finished (or running) session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// `correct / total` as a whole percentage, rounded.
    pub percentage: u32,
}

impl SessionSummary {
    fn new(total: usize, answered: usize, correct: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (correct as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            total,
            answered,
            correct,
            incorrect: total - correct,
            percentage,
        }
    }
}

/// One pass through a list of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    mode: Mode,
    current: usize,
    answers: Vec<Option<Answer>>,
    results: Vec<Option<ValidationResult>>,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, mode: Mode) -> Self {
        let len = questions.len();
        Self {
            questions,
            mode,
            current: 0,
            answers: vec![None; len],
            results: vec![None; len],
            finished: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question under the cursor, `None` for an empty session.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Grade `answer` for the current question and store both.
    ///
    /// Returns `None` when the session is empty.
    pub fn submit(&mut self, answer: Answer) -> Option<ValidationResult> {
        let question = self.questions.get(self.current)?;
        let result = validate(question, Some(&answer));

        tracing::debug!(
            question = %question.id,
            index = self.current,
            correct = result.is_correct,
            "answer submitted"
        );

        self.answers[self.current] = Some(answer);
        self.results[self.current] = Some(result.clone());
        Some(result)
    }

    /// Move to the next question. Returns `false` at the end.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns `false` at the start.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`. Returns `false` if out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Stored answer for the question at `index`.
    pub fn answer_for(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)?.as_ref()
    }

    pub fn result_for(&self, index: usize) -> Option<&ValidationResult> {
        self.results.get(index)?.as_ref()
    }

    /// Running score: questions whose stored result is correct.
    pub fn score(&self) -> usize {
        self.results.iter().flatten().filter(|r| r.is_correct).count()
    }

    pub fn summary(&self) -> SessionSummary {
        let answered = self.answers.iter().flatten().count();
        SessionSummary::new(self.questions.len(), answered, self.score())
    }

    /// End the session.
    ///
    /// In exam mode every question is re-graded from its stored answer,
    /// and unanswered questions are graded as missing answers.
    pub fn finish(&mut self) -> SessionSummary {
        if self.mode == Mode::Exam {
            self.results = self
                .questions
                .iter()
                .zip(&self.answers)
                .map(|(q, answer)| Some(validate(q, answer.as_ref())))
                .collect();
        }
        self.finished = true;

        let summary = self.summary();
        tracing::info!(
            mode = %self.mode,
            total = summary.total,
            correct = summary.correct,
            "session finished"
        );
        summary
    }

    /// Every graded question with its result, in question order.
    pub fn graded_items(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .zip(&self.results)
            .filter_map(|(q, result)| {
                result.as_ref().map(|result| ReviewItem {
                    question: q.clone(),
                    result: result.clone(),
                })
            })
            .collect()
    }

    /// Graded questions that were not fully correct, in question order.
    pub fn review_items(&self) -> Vec<ReviewItem> {
        self.graded_items()
            .into_iter()
            .filter(|item| !item.result.is_correct)
            .collect()
    }
}
