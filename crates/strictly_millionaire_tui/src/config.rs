//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strictly_millionaire::{GameSession, PrizeLadder, QuestionBank, QuizError, SessionRules};
use tracing::{debug, info, instrument};

/// Everything needed to set up a game, loaded from TOML.
///
/// ```toml
/// question_count = 10
/// time_budget_secs = 30
/// question_bank = "scrum.toml"
/// seed = 42
///
/// [ladder]
/// prizes = [100, 200, 300, 500, 1000, 2000, 4000, 8000, 16000, 32000]
/// safe_havens = [1000]
/// ```
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session rules; every key is optional.
    #[serde(flatten)]
    rules: SessionRules,

    /// Custom question bank file; the built-in bank is used when absent.
    #[serde(default)]
    question_bank: Option<PathBuf>,

    /// Custom prize ladder; the standard ladder is used when absent.
    #[serde(default)]
    ladder: Option<PrizeLadder>,

    /// Fixed RNG seed for reproducible games.
    #[serde(default)]
    seed: Option<u64>,

    /// Where the TUI writes its log.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_millionaire.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: SessionRules::default(),
            question_bank: None,
            ladder: None,
            seed: None,
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Parses a config from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config
            .rules
            .validate()
            .map_err(|e| ConfigError::new(e.kind().to_string()))?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(questions = config.rules.question_count(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        questions: Option<usize>,
        seed: Option<u64>,
        bank: Option<PathBuf>,
    ) -> Self {
        if let Some(count) = questions {
            self.rules = self.rules.with_question_count(count);
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if bank.is_some() {
            self.question_bank = bank;
        }
        self
    }

    /// Loads the configured question bank, or the built-in one.
    #[instrument(skip(self))]
    pub fn load_bank(&self) -> Result<QuestionBank, QuizError> {
        match &self.question_bank {
            Some(path) => QuestionBank::from_file(path),
            None => QuestionBank::builtin(),
        }
    }

    /// The configured ladder, or the standard one.
    pub fn prize_ladder(&self) -> PrizeLadder {
        self.ladder.clone().unwrap_or_default()
    }

    /// Builds a session in the menu phase with the configured RNG.
    #[instrument(skip(self))]
    pub fn build_session(&self) -> Result<GameSession<StdRng>, QuizError> {
        let rng = match self.seed {
            Some(seed) => {
                info!(seed, "Using fixed seed");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        GameSession::new(self.load_bank()?, self.prize_ladder(), self.rules, rng)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
