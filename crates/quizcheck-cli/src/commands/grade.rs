//! The `quizcheck grade` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizcheck_core::answer::Answer;
use quizcheck_core::bank::{load_bank, Section};
use quizcheck_core::model::Question;
use quizcheck_core::report::QuizReport;
use quizcheck_core::session::{Mode, QuizSession, ReviewItem};

pub fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    section: Option<Section>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let bank = load_bank(&bank_path)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let answers: BTreeMap<String, Option<Answer>> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sections = section.map_or_else(|| Section::ALL.to_vec(), |s| vec![s]);
    let questions: Vec<Question> = sections
        .iter()
        .flat_map(|s| bank.questions_for(*s, &mut rng))
        .collect();

    for id in answers.keys() {
        if !questions.iter().any(|q| &q.id == id) {
            tracing::warn!(question = %id, "answer given for unknown question");
        }
    }

    let submissions: Vec<(usize, Answer)> = questions
        .iter()
        .enumerate()
        .filter_map(|(i, q)| answers.get(&q.id).cloned().flatten().map(|a| (i, a)))
        .collect();

    let mut session = QuizSession::new(questions, Mode::Exam);
    for (index, answer) in submissions {
        session.go_to(index);
        session.submit(answer);
    }
    let summary = session.finish();

    println!("{}", results_table(&session.graded_items()));
    println!(
        "Score: {}/{} correct ({}%), {} answered",
        summary.correct, summary.total, summary.percentage, summary.answered
    );

    if let Some(path) = output {
        QuizReport::from_session(&session, section).save_json(&path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn results_table(items: &[ReviewItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Result", "Feedback"]);

    for item in items {
        let outcome = if item.result.is_correct {
            "correct"
        } else if item.result.partially_correct() {
            "partial"
        } else {
            "incorrect"
        };
        let feedback = &item.result.feedback;
        let notes: Vec<&str> = feedback
            .incorrect
            .iter()
            .chain(&feedback.missing)
            .map(String::as_str)
            .collect();

        table.add_row(vec![
            Cell::new(&item.question.id),
            Cell::new(item.question.kind.type_name()),
            Cell::new(outcome),
            Cell::new(notes.join("\n")),
        ]);
    }

    table
}
