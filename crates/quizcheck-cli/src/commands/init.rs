//! The `quizcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizcheck.toml").exists() {
        println!("quizcheck.toml already exists, skipping.");
    } else {
        std::fs::write("quizcheck.toml", SAMPLE_CONFIG)?;
        println!("Created quizcheck.toml");
    }

    std::fs::create_dir_all("banks")?;
    let sample_path = Path::new("banks/sample.json");
    if sample_path.exists() {
        println!("banks/sample.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_BANK)?;
        println!("Created banks/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions under banks/");
    println!("  2. Run: quizcheck validate --bank banks");
    println!("  3. Run: quizcheck play --section single");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizcheck configuration

bank_dir = "./banks"
state_dir = "./.quizcheck"

# practice: feedback after every question; exam: feedback at the end
default_mode = "practice"
shuffle = false
"#;

pub(crate) const SAMPLE_BANK: &str = r#"{
  "questions": [
    {
      "id": "rust-owner",
      "type": "mcq_single",
      "category": "Rust",
      "prompt": "How many owners can a value have at a time?",
      "options": ["Exactly one", "Two", "Any number"],
      "correctAnswer": 0,
      "explanation": "Every value has a single owner; shared ownership needs Rc or Arc."
    },
    {
      "id": "rust-copy",
      "type": "mcq_multi",
      "category": "Rust",
      "prompt": "Which of these types are Copy?",
      "options": ["i32", "String", "bool", "Vec<u8>"],
      "correctAnswer": [0, 2],
      "explanation": "Scalar types are Copy; heap-owning types are not."
    },
    {
      "id": "rust-keywords",
      "type": "fill_gaps",
      "category": "Rust",
      "prompt": "Variables are immutable unless declared with ___. Functions are declared with {{gap}}.",
      "correctAnswer": ["mut", "fn"],
      "explanation": "let mut x = 1; fn main() {}"
    },
    {
      "id": "rust-vec-push",
      "type": "complete_code",
      "category": "Rust",
      "prompt": "let mut v = Vec::new();\n___\nassert_eq!(v.len(), 1);",
      "correctAnswer": ["v.push(1);"],
      "acceptedAnswers": [["v.push(1);", "v.push(1)"]],
      "explanation": "push appends to the end of a vector."
    }
  ],
  "scripts": [
    {
      "id": "rust-sum",
      "category": "Rust",
      "title": "Summing a slice",
      "description": "Iterate and accumulate.",
      "code": "fn sum(values: &[i32]) -> i32 {\n    let mut total = 0;\n    for v in values {\n        total += v;\n    }\n    total\n}",
      "blankableLines": [1, 2, 3, 5],
      "settings": { "caseSensitive": true, "maxBlanks": 2 }
    }
  ]
}
"#;
