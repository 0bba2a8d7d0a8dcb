//! The `quizcheck play` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizcheck_core::answer::{parse_choice, parse_choices, Answer};
use quizcheck_core::bank::{load_bank, shuffle, Section};
use quizcheck_core::hint::hint;
use quizcheck_core::model::{Question, QuestionKind, ValidationResult};
use quizcheck_core::report::QuizReport;
use quizcheck_core::session::{Mode, QuizSession};
use quizcheck_core::store::{BookmarkStore, Bookmarks, ReviewStore};

use crate::config::QuizcheckConfig;
use crate::store::JsonFileStore;

pub struct PlayOptions {
    pub section: Section,
    pub bank: PathBuf,
    pub mode: Mode,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

pub fn execute(options: PlayOptions, config: &QuizcheckConfig) -> Result<()> {
    let bank = load_bank(&options.bank)?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut questions = bank.questions_for(options.section, &mut rng);
    if questions.is_empty() {
        anyhow::bail!("no questions in section: {}", options.section);
    }
    if options.shuffle {
        shuffle(&mut questions, &mut rng);
    }

    tracing::info!(
        section = %options.section,
        mode = %options.mode,
        questions = questions.len(),
        "starting quiz"
    );

    let mut session = QuizSession::new(questions, options.mode);
    let mut bookmarks = Bookmarks::open(JsonFileStore::new(&config.state_dir));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run_quiz(&mut session, &mut bookmarks, stdin.lock(), &mut out)?;
    session.finish();
    print_summary(&session, &mut out)?;

    let review = session.review_items();
    ReviewStore::save(&JsonFileStore::new(&config.state_dir), &review)?;

    if let Some(path) = options.output {
        let report = QuizReport::from_session(&session, Some(options.section));
        report.save_json(&path)?;
        writeln!(out, "Report written to {}", path.display())?;
    }

    Ok(())
}

enum Reply {
    Answer(Answer),
    Skip,
    Quit,
}

/// Drive `session` from `input` until every question is seen or input ends.
///
/// A `bookmark` reply toggles the current question in `bookmarks`.
pub fn run_quiz<S: BookmarkStore, R: BufRead, W: Write>(
    session: &mut QuizSession,
    bookmarks: &mut Bookmarks<S>,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    let total = session.len();

    while let Some(question) = session.current().cloned() {
        let bookmarked = bookmarks.is_bookmarked(&question.id);
        print_question(&question, session.current_index(), total, bookmarked, out)?;

        match read_reply(&question, bookmarks, &mut input, out)? {
            Reply::Answer(answer) => {
                if let Some(result) = session.submit(answer) {
                    if session.mode() == Mode::Practice {
                        print_result(&question, &result, out)?;
                    }
                }
            }
            Reply::Skip => writeln!(out, "Skipped.")?,
            Reply::Quit => break,
        }

        if !session.advance() {
            break;
        }
    }

    Ok(())
}

fn print_question<W: Write>(
    question: &Question,
    index: usize,
    total: usize,
    bookmarked: bool,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "Question {}/{}", index + 1, total)?;
    if !question.category.is_empty() {
        write!(out, " [{}]", question.category)?;
    }
    if bookmarked {
        write!(out, " (bookmarked)")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", question.prompt)?;

    if let Some(options) = question.kind.options() {
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "  {}. {option}", i + 1)?;
        }
    }

    let instructions = match &question.kind {
        QuestionKind::McqSingle { .. } => "Enter the option number.".to_string(),
        QuestionKind::McqMulti { .. } => "Enter all correct option numbers, comma separated.".to_string(),
        QuestionKind::FillGaps(key) => format!("Enter {} answer(s), one per line.", key.gap_count()),
        QuestionKind::CompleteCode(key) => {
            format!("Enter the {} missing line(s), one per line.", key.gap_count())
        }
        QuestionKind::Unsupported => "This question type is not supported.".to_string(),
    };
    writeln!(out, "{instructions} Type 'hint' for a hint, 'bookmark' to toggle a bookmark, or leave empty to skip.")
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt<W: Write>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "{label}> ")?;
    out.flush()
}

fn read_reply<S: BookmarkStore, R: BufRead, W: Write>(
    question: &Question,
    bookmarks: &mut Bookmarks<S>,
    input: &mut R,
    out: &mut W,
) -> Result<Reply> {
    let first_label = match &question.kind {
        QuestionKind::FillGaps(_) | QuestionKind::CompleteCode(_) => "Gap 1",
        _ => "",
    };

    loop {
        prompt(out, first_label)?;
        let Some(line) = read_line(input)? else {
            return Ok(Reply::Quit);
        };

        match line.trim() {
            "" => return Ok(Reply::Skip),
            "hint" => {
                writeln!(out, "Hint: {}", hint(question))?;
                continue;
            }
            "bookmark" => {
                match bookmarks.toggle(&question.id) {
                    Ok(true) => writeln!(out, "Bookmarked {}", question.id)?,
                    Ok(false) => writeln!(out, "Removed bookmark {}", question.id)?,
                    Err(e) => writeln!(out, "Could not save bookmark: {e}")?,
                }
                continue;
            }
            _ => {}
        }

        let parsed = match &question.kind {
            QuestionKind::McqSingle { options, .. } => {
                parse_choice(&line, options.len()).map(Answer::Choice)
            }
            QuestionKind::McqMulti { options, .. } => {
                parse_choices(&line, options.len()).map(Answer::Choices)
            }
            QuestionKind::FillGaps(key) | QuestionKind::CompleteCode(key) => {
                let mut gaps = vec![line];
                for gap in 2..=key.gap_count() {
                    prompt(out, &format!("Gap {gap}"))?;
                    match read_line(input)? {
                        Some(line) => gaps.push(line),
                        None => return Ok(Reply::Quit),
                    }
                }
                Ok(Answer::Gaps(gaps))
            }
            QuestionKind::Unsupported => Ok(Answer::Gaps(vec![line])),
        };

        match parsed {
            Ok(answer) => return Ok(Reply::Answer(answer)),
            Err(e) => writeln!(out, "{e}, try again.")?,
        }
    }
}

fn print_result<W: Write>(
    question: &Question,
    result: &ValidationResult,
    out: &mut W,
) -> io::Result<()> {
    if result.is_correct {
        writeln!(out, "Correct!")?;
    } else if result.partially_correct() {
        writeln!(out, "Partially correct.")?;
    } else {
        writeln!(out, "Incorrect.")?;
    }

    for line in &result.feedback.correct {
        writeln!(out, "  + {line}")?;
    }
    for line in &result.feedback.incorrect {
        writeln!(out, "  - {line}")?;
    }
    for line in &result.feedback.missing {
        writeln!(out, "  missed: {line}")?;
    }

    if !result.is_correct {
        if let Some(answer) = &result.correct_answer {
            writeln!(out, "Correct answer: {answer}")?;
        }
    }
    if !question.explanation.is_empty() {
        writeln!(out, "Explanation: {}", question.explanation)?;
    }
    Ok(())
}

fn print_summary<W: Write>(session: &QuizSession, out: &mut W) -> io::Result<()> {
    let summary = session.summary();
    writeln!(out)?;
    writeln!(
        out,
        "Quiz complete: {}/{} correct ({}%)",
        summary.correct, summary.total, summary.percentage
    )?;

    let review = session.review_items().len();
    if review > 0 {
        writeln!(
            out,
            "{review} question(s) saved for review. Run `quizcheck review` to see them."
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizcheck_core::model::{GapKey, QuestionSettings};
    use quizcheck_core::store::MemoryStore;

    fn question(id: &str, kind: QuestionKind) -> Question {
        Question {
            id: id.into(),
            category: "Test".into(),
            prompt: format!("Prompt {id}"),
            explanation: "Because.".into(),
            settings: QuestionSettings::default(),
            kind,
        }
    }

    fn single(id: &str) -> Question {
        question(
            id,
            QuestionKind::McqSingle {
                options: vec!["Yes".into(), "No".into()],
                correct_answer: 0,
            },
        )
    }

    fn play(session: &mut QuizSession, input: &str) -> String {
        play_with(session, &mut Bookmarks::open(MemoryStore::new()), input)
    }

    fn play_with(
        session: &mut QuizSession,
        bookmarks: &mut Bookmarks<MemoryStore>,
        input: &str,
    ) -> String {
        let mut out = Vec::new();
        run_quiz(session, bookmarks, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn practice_prints_feedback_per_question() {
        let mut session = QuizSession::new(vec![single("a"), single("b")], Mode::Practice);
        let out = play(&mut session, "1\n2\n");

        assert!(out.contains("Question 1/2 [Test]"));
        assert!(out.contains("  1. Yes"));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Incorrect."));
        assert!(out.contains("Explanation: Because."));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn exam_mode_is_silent_until_the_end() {
        let mut session = QuizSession::new(vec![single("a")], Mode::Exam);
        let out = play(&mut session, "2\n");

        assert!(!out.contains("Incorrect."));
        assert!(session.answer_for(0).is_some());
    }

    #[test]
    fn invalid_input_is_retried_and_hint_is_shown() {
        let mut session = QuizSession::new(vec![single("a")], Mode::Practice);
        let out = play(&mut session, "hint\nseven\n9\n1\n");

        assert!(out.contains("Hint: The correct answer starts with: \"Yes...\""));
        assert!(out.contains("not an option number: seven, try again."));
        assert!(out.contains("option 9 is out of range (1-2), try again."));
        assert!(session.result_for(0).unwrap().is_correct);
    }

    #[test]
    fn bookmark_reply_toggles_current_question() {
        let mut session = QuizSession::new(vec![single("a"), single("b")], Mode::Practice);
        let mut bookmarks = Bookmarks::open(MemoryStore::new());
        let out = play_with(&mut session, &mut bookmarks, "bookmark\n1\n\n");

        assert!(out.contains("Bookmarked a"));
        assert!(bookmarks.is_bookmarked("a"));
        assert!(!bookmarks.is_bookmarked("b"));
        assert!(session.result_for(0).unwrap().is_correct);

        let mut session = QuizSession::new(vec![single("a")], Mode::Practice);
        let out = play_with(&mut session, &mut bookmarks, "bookmark\n\n");
        assert!(out.contains("Question 1/1 [Test] (bookmarked)"));
        assert!(out.contains("Removed bookmark a"));
        assert_eq!(bookmarks.count(), 0);
    }

    #[test]
    fn empty_line_skips() {
        let mut session = QuizSession::new(vec![single("a"), single("b")], Mode::Practice);
        let out = play(&mut session, "\n1\n");

        assert!(out.contains("Skipped."));
        assert!(session.answer_for(0).is_none());
        assert!(session.result_for(1).unwrap().is_correct);
    }

    #[test]
    fn gap_questions_read_one_line_per_gap() {
        let key = GapKey {
            correct_answer: vec!["mut".into(), "fn".into()],
            accepted_answers: None,
        };
        let mut session = QuizSession::new(
            vec![question("g", QuestionKind::FillGaps(key))],
            Mode::Practice,
        );
        let out = play(&mut session, "MUT\nfn\n");

        assert!(out.contains("Gap 2> "));
        assert!(out.contains("Correct!"));
        assert_eq!(
            session.answer_for(0),
            Some(&Answer::gaps(["MUT", "fn"]))
        );
    }

    #[test]
    fn multi_choice_partial_feedback() {
        let mut session = QuizSession::new(
            vec![question(
                "m",
                QuestionKind::McqMulti {
                    options: vec!["A".into(), "B".into(), "C".into()],
                    correct_answer: vec![0, 2],
                },
            )],
            Mode::Practice,
        );
        let out = play(&mut session, "1\n");

        assert!(out.contains("Partially correct."));
        assert!(out.contains("  + A"));
        assert!(out.contains("  missed: C"));
    }

    #[test]
    fn end_of_input_stops_the_quiz() {
        let mut session = QuizSession::new(vec![single("a"), single("b")], Mode::Exam);
        play(&mut session, "1\n");
        let summary = session.finish();

        assert_eq!(summary.answered, 1);
        assert_eq!(summary.correct, 1);
        assert_eq!(session.review_items().len(), 1);
    }

    #[test]
    fn summary_mentions_review() {
        let mut session = QuizSession::new(vec![single("a")], Mode::Practice);
        play(&mut session, "2\n");
        session.finish();

        let mut out = Vec::new();
        print_summary(&session, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Quiz complete: 0/1 correct (0%)"));
        assert!(out.contains("1 question(s) saved for review"));
    }
}
