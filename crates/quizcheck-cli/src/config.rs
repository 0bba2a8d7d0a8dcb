//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizcheck_core::session::Mode;

/// Top-level quizcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizcheckConfig {
    /// Question bank file or directory.
    #[serde(default = "default_bank_dir")]
    pub bank_dir: PathBuf,
    /// Where bookmarks and the review list are kept.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default)]
    pub default_mode: Mode,
    /// Shuffle question order when playing.
    #[serde(default)]
    pub shuffle: bool,
}

fn default_bank_dir() -> PathBuf {
    PathBuf::from("./banks")
}
fn default_state_dir() -> PathBuf {
    PathBuf::from("./.quizcheck")
}

impl Default for QuizcheckConfig {
    fn default() -> Self {
        Self {
            bank_dir: default_bank_dir(),
            state_dir: default_state_dir(),
            default_mode: Mode::default(),
            shuffle: false,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, which must exist when given
/// 2. `quizcheck.toml` in the current directory
/// 3. `~/.config/quizcheck/config.toml`
///
/// `QUIZCHECK_BANK_DIR` and `QUIZCHECK_STATE_DIR` override the file.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizcheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizcheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizcheckConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZCHECK_BANK_DIR") {
        config.bank_dir = PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("QUIZCHECK_STATE_DIR") {
        config.state_dir = PathBuf::from(dir);
    }

    config.bank_dir = resolve_path(&config.bank_dir);
    config.state_dir = resolve_path(&config.state_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizcheck"))
}
