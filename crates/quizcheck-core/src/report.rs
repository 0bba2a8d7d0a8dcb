//! Quiz reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::Section;
use crate::session::{Mode, QuizSession, ReviewItem, SessionSummary};

/// The outcome of one finished quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Section played; `None` when the report spans the whole bank.
    pub section: Option<Section>,
    pub mode: Mode,
    pub summary: SessionSummary,
    /// Every graded question, in play order.
    pub items: Vec<ReviewItem>,
}

impl QuizReport {
    /// Snapshot a session. Call after [`QuizSession::finish`].
    pub fn from_session(session: &QuizSession, section: Option<Section>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            section,
            mode: session.mode(),
            summary: session.summary(),
            items: session.graded_items(),
        }
    }

    /// Items that were not fully correct.
    pub fn incorrect_items(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter().filter(|item| !item.result.is_correct)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Render the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let title = self.section.map_or("All questions", |s| s.name());
        md.push_str(&format!("# {title} ({})\n\n", self.mode));
        md.push_str(&format!(
            "**Score:** {}/{} ({}%), {} answered\n\n",
            self.summary.correct, self.summary.total, self.summary.percentage, self.summary.answered
        ));

        if self.items.is_empty() {
            md.push_str("_No questions were graded._\n");
            return md;
        }

        md.push_str("| # | Question | Type | Result |\n");
        md.push_str("|---|----------|------|--------|\n");
        for (i, item) in self.items.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                i + 1,
                item.question.id,
                item.question.kind,
                outcome(item)
            ));
        }

        let incorrect: Vec<&ReviewItem> = self.incorrect_items().collect();
        if !incorrect.is_empty() {
            md.push_str("\n## Review\n");
            for item in incorrect {
                md.push_str(&format!("\n### {}\n\n", item.question.id));
                md.push_str(&format!("{}\n\n", first_line(&item.question.prompt)));
                if let Some(answer) = &item.result.user_answer {
                    md.push_str(&format!("- Your answer: {answer}\n"));
                }
                if let Some(answer) = &item.result.correct_answer {
                    md.push_str(&format!("- Correct answer: {answer}\n"));
                }
                let feedback = &item.result.feedback;
                for line in feedback.incorrect.iter().chain(&feedback.missing) {
                    md.push_str(&format!("- {line}\n"));
                }
                if !item.question.explanation.is_empty() {
                    md.push_str(&format!("\n> {}\n", item.question.explanation));
                }
            }
        }

        md
    }
}

fn outcome(item: &ReviewItem) -> &'static str {
    if item.result.is_correct {
        "correct"
    } else if item.result.partially_correct() {
        "partial"
    } else {
        "incorrect"
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
