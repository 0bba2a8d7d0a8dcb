//! quizcheck CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizcheck_core::bank::Section;
use quizcheck_core::session::Mode;

mod commands;
mod config;
mod store;

#[derive(Parser)]
#[command(name = "quizcheck", version, about = "Quiz answer validation and practice")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample question bank
    Init,

    /// Check question bank files for data problems
    Validate {
        /// Bank file or directory (defaults to the configured bank_dir)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// List question sections with their counts
    Categories {
        /// Bank file or directory
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Play a quiz in the terminal
    Play {
        /// Section: single, multi, gaps or code
        #[arg(long)]
        section: Section,

        /// Bank file or directory
        #[arg(long)]
        bank: Option<PathBuf>,

        /// practice (feedback per question) or exam (feedback at the end)
        #[arg(long)]
        mode: Option<Mode>,

        /// Shuffle question order
        #[arg(long)]
        shuffle: bool,

        /// Seed for shuffling and code blanks
        #[arg(long)]
        seed: Option<u64>,

        /// Save a JSON report here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Grade a JSON file of answers keyed by question id
    Grade {
        /// Bank file or directory
        #[arg(long)]
        bank: Option<PathBuf>,

        /// JSON object mapping question id to answer
        #[arg(long)]
        answers: PathBuf,

        /// Only grade this section
        #[arg(long)]
        section: Option<Section>,

        /// Seed for code blanks
        #[arg(long)]
        seed: Option<u64>,

        /// Save a JSON report here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show questions answered incorrectly in the last quiz
    Review,

    /// Toggle a bookmark on a question
    Bookmark {
        /// Question id
        id: String,
    },

    /// List bookmarked questions
    Bookmarks,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizcheck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = config::load_config_from(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Init => commands::init::execute(),
            Commands::Validate { bank } => {
                commands::validate::execute(bank.unwrap_or(config.bank_dir))
            }
            Commands::Categories { bank } => {
                commands::categories::execute(bank.unwrap_or(config.bank_dir))
            }
            Commands::Play {
                section,
                bank,
                mode,
                shuffle,
                seed,
                output,
            } => commands::play::execute(
                commands::play::PlayOptions {
                    section,
                    bank: bank.unwrap_or_else(|| config.bank_dir.clone()),
                    mode: mode.unwrap_or(config.default_mode),
                    shuffle: shuffle || config.shuffle,
                    seed,
                    output,
                },
                &config,
            ),
            Commands::Grade {
                bank,
                answers,
                section,
                seed,
                output,
            } => commands::grade::execute(
                bank.unwrap_or_else(|| config.bank_dir.clone()),
                answers,
                section,
                seed,
                output,
            ),
            Commands::Review => commands::review::execute(&config),
            Commands::Bookmark { id } => commands::bookmarks::toggle(&config, &id),
            Commands::Bookmarks => commands::bookmarks::list(&config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
