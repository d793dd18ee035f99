//! Runtime settings
//!
//! Layered in order: defaults, `uno-quiz.toml` (or an explicit file),
//! environment variables, then command-line flags.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "uno-quiz.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Question bank file; the built-in bank is used when unset
    pub question_bank: Option<PathBuf>,
    /// Seed for question draws
    pub seed: Option<u64>,
    /// Where tracing output goes; logging is off when unset
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
    /// Input poll interval of the main loop
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_bank: None,
            seed: None,
            log_file: None,
            log_filter: "info".into(),
            tick_rate_ms: 100,
        }
    }
}

impl Settings {
    /// Read settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
    /// exists. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> crate::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from `UNO_QUIZ_*` variables, looked up through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> crate::Result<()> {
        if let Some(v) = var("UNO_QUIZ_QUESTIONS") {
            self.question_bank = Some(PathBuf::from(v));
        }
        if let Some(v) = var("UNO_QUIZ_SEED") {
            self.seed = Some(v.parse().with_context(|| format!("UNO_QUIZ_SEED={v}"))?);
        }
        if let Some(v) = var("UNO_QUIZ_LOG_FILE") {
            self.log_file = Some(PathBuf::from(v));
        }
        if let Some(v) = var("UNO_QUIZ_LOG") {
            self.log_filter = v;
        }
        if let Some(v) = var("UNO_QUIZ_TICK_RATE_MS") {
            self.tick_rate_ms = v.parse().with_context(|| format!("UNO_QUIZ_TICK_RATE_MS={v}"))?;
        }
        Ok(())
    }
}
