//! Code-blank derivation.
//!
//! Turns a [`CodeScript`] into a `complete_code` [`Question`] by blanking a
//! random subset of its eligible lines. Every call draws afresh; the
//! blanked line indices are returned beside the question in a
//! [`CodeDerivation`] rather than stored on it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{CodeScript, GapKey, Question, QuestionKind, QuestionSettings};

/// Placeholder written in place of a blanked line.
pub const BLANK_MARKER: &str = "___";

/// A derived code question plus the lines that were blanked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDerivation {
    pub question: Question,
    /// Source line index of each gap, ascending (gap 0 first).
    pub blanked_lines: Vec<usize>,
}

/// Derive a fresh code question using the thread-local RNG.
pub fn derive_code_question(script: &CodeScript) -> Question {
    derive_code_question_with(script, &mut rand::thread_rng()).question
}

/// Derive a code question, drawing blanks from `rng`.
///
/// Exactly `min(max_blanks, eligible)` lines are blanked, chosen uniformly
/// without replacement. With `randomize` off the topmost eligible lines
/// are used instead, so repeated derivations agree.
pub fn derive_code_question_with<R: Rng + ?Sized>(
    script: &CodeScript,
    rng: &mut R,
) -> CodeDerivation {
    let eligible = script.eligible_lines();
    let count = script.settings.max_blanks.min(eligible.len());

    let mut blanked_lines: Vec<usize> = if script.randomize {
        rand::seq::index::sample(rng, eligible.len(), count)
            .into_iter()
            .map(|i| eligible[i])
            .collect()
    } else {
        eligible.iter().take(count).copied().collect()
    };
    blanked_lines.sort_unstable();

    let mut lines: Vec<String> = script.code.split('\n').map(String::from).collect();
    let mut correct_answer = Vec::with_capacity(blanked_lines.len());

    for &index in &blanked_lines {
        let line = &lines[index];
        let indent = &line[..line.len() - line.trim_start().len()];
        let blanked = format!("{indent}{BLANK_MARKER}");
        correct_answer.push(line.trim().to_string());
        lines[index] = blanked;
    }

    tracing::debug!(
        script = %script.id,
        eligible = eligible.len(),
        blanks = ?blanked_lines,
        "derived code question"
    );

    CodeDerivation {
        question: Question {
            id: script.id.clone(),
            category: script.category.clone(),
            prompt: lines.join("\n"),
            explanation: script.description.clone(),
            settings: QuestionSettings {
                shuffle_options: None,
                case_sensitive: Some(script.settings.case_sensitive),
            },
            kind: QuestionKind::CompleteCode(GapKey {
                correct_answer,
                accepted_answers: None,
            }),
        },
        blanked_lines,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::answer::Answer;
    use crate::model::ScriptSettings;
    use crate::validation::validate;

    const TEN_LINES: &str = "\
fn main() {
    let a = 1;
    let b = 2;
    let c = a + b;
    println!(\"{}\", c);
    let v = vec![a, b, c];
    for x in &v {
        println!(\"{}\", x);
    }
    assert_eq!(v.len(), 3);
}";

    fn script(code: &str, blankable: Vec<usize>, max_blanks: usize) -> CodeScript {
        CodeScript {
            id: "script-1".into(),
            category: "Rust".into(),
            title: "Sum".into(),
            description: "Add numbers".into(),
            code: code.into(),
            blankable_lines: blankable,
            settings: ScriptSettings {
                case_sensitive: true,
                max_blanks,
            },
            randomize: true,
        }
    }

    fn gap_key(question: &Question) -> &GapKey {
        question.kind.gap_key().expect("code question has a gap key")
    }

    #[test]
    fn blank_count_is_capped_by_max_blanks() {
        let s = script(TEN_LINES, (0..10).collect(), 3);
        let mut rng = StdRng::seed_from_u64(7);
        let derived = derive_code_question_with(&s, &mut rng);

        assert_eq!(derived.blanked_lines.len(), 3);
        assert_eq!(gap_key(&derived.question).gap_count(), 3);
    }

    #[test]
    fn blank_count_is_capped_by_eligible_lines() {
        let s = script(TEN_LINES, vec![1, 2], 5);
        let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(1));
        assert_eq!(derived.blanked_lines, vec![1, 2]);
    }

    #[test]
    fn gaps_follow_source_order_with_trimmed_answers() {
        let s = script(TEN_LINES, (0..10).collect(), 3);
        let source: Vec<&str> = TEN_LINES.split('\n').collect();

        for seed in 0..50 {
            let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(seed));
            assert!(derived.blanked_lines.windows(2).all(|w| w[0] < w[1]));

            let key = gap_key(&derived.question);
            for (gap, &line) in derived.blanked_lines.iter().enumerate() {
                assert_eq!(key.correct_answer[gap], source[line].trim());
            }
        }
    }

    #[test]
    fn prompt_blanks_only_chosen_lines() {
        let s = script(TEN_LINES, (0..10).collect(), 4);
        let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(3));
        let source: Vec<&str> = TEN_LINES.split('\n').collect();
        let rendered: Vec<&str> = derived.question.prompt.split('\n').collect();

        assert_eq!(rendered.len(), source.len());
        for (i, line) in rendered.iter().enumerate() {
            if derived.blanked_lines.contains(&i) {
                assert_eq!(line.trim(), BLANK_MARKER);
                assert!(source[i].starts_with(&line[..line.len() - BLANK_MARKER.len()]));
            } else {
                assert_eq!(*line, source[i]);
            }
        }
    }

    #[test]
    fn blank_lines_are_never_chosen() {
        let code = "a();\n\n   \nb();";
        let s = script(code, vec![0, 1, 2, 3, 4], 10);
        let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(0));
        assert_eq!(derived.blanked_lines, vec![0, 3]);
        assert_eq!(gap_key(&derived.question).correct_answer, vec!["a();", "b();"]);
    }

    #[test]
    fn every_eligible_line_can_be_drawn() {
        let s = script(TEN_LINES, (0..10).collect(), 2);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.extend(derive_code_question_with(&s, &mut rng).blanked_lines);
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn redraws_differ() {
        let s = script(TEN_LINES, (0..10).collect(), 3);
        let mut rng = StdRng::seed_from_u64(9);
        let first = derive_code_question_with(&s, &mut rng).blanked_lines;
        let differs = (0..50).any(|_| derive_code_question_with(&s, &mut rng).blanked_lines != first);
        assert!(differs);
    }

    #[test]
    fn non_random_script_takes_topmost_lines() {
        let mut s = script(TEN_LINES, vec![5, 1, 8, 3], 2);
        s.randomize = false;
        for seed in 0..5 {
            let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(seed));
            assert_eq!(derived.blanked_lines, vec![1, 3]);
        }
    }

    #[test]
    fn derived_question_carries_script_metadata() {
        let mut s = script(TEN_LINES, vec![1], 1);
        s.settings.case_sensitive = false;
        let question = derive_code_question(&s);

        assert_eq!(question.id, "script-1");
        assert_eq!(question.category, "Rust");
        assert_eq!(question.explanation, "Add numbers");
        assert_eq!(question.kind.type_name(), "complete_code");
        assert!(!question.case_sensitive());
    }

    #[test]
    fn derived_key_grades_correct() {
        let s = script(TEN_LINES, (0..10).collect(), 3);
        let derived = derive_code_question_with(&s, &mut StdRng::seed_from_u64(11));
        let key = gap_key(&derived.question).correct_answer.clone();

        let result = validate(&derived.question, Some(&Answer::Gaps(key)));
        assert!(result.is_correct);

        let upper: Vec<String> = gap_key(&derived.question)
            .correct_answer
            .iter()
            .map(|s| s.to_uppercase())
            .collect();
        assert!(!validate(&derived.question, Some(&Answer::Gaps(upper))).is_correct);
    }

    #[test]
    fn zero_max_blanks_yields_no_gaps() {
        let s = script(TEN_LINES, (0..10).collect(), 0);
        let derived = derive_code_question(&s);
        assert_eq!(gap_key(&derived).gap_count(), 0);
        assert_eq!(derived.prompt, TEN_LINES);
    }
}
