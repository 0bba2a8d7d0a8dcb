//! The `quizcheck review` command.

use anyhow::Result;

use quizcheck_core::store::ReviewStore;

use crate::config::QuizcheckConfig;
use crate::store::JsonFileStore;

pub fn execute(config: &QuizcheckConfig) -> Result<()> {
    let items = ReviewStore::load(&JsonFileStore::new(&config.state_dir))?;

    if items.is_empty() {
        println!("No questions to review.");
        return Ok(());
    }

    println!("{} question(s) to review\n", items.len());

    for (i, item) in items.iter().enumerate() {
        let question = &item.question;
        let result = &item.result;

        println!("{}. [{}] {}", i + 1, question.kind, question.id);
        println!("{}", question.prompt);

        match &result.user_answer {
            Some(answer) if !answer.is_empty() => println!("  Your answer: {answer}"),
            _ => println!("  Your answer: (none)"),
        }
        if let Some(answer) = &result.correct_answer {
            println!("  Correct answer: {answer}");
        }
        for line in result.feedback.incorrect.iter().chain(&result.feedback.missing) {
            println!("  - {line}");
        }
        if !question.explanation.is_empty() {
            println!("  Explanation: {}", question.explanation);
        }
        println!();
    }

    Ok(())
}
