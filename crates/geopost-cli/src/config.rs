//! Front-end configuration.
//!
//! Values come from, in increasing priority: built-in defaults, environment
//! variables, command-line flags.
//!
//! | Variable            | Default         | Description                  |
//! |---------------------|-----------------|------------------------------|
//! | `GEOPOST_STORE`     | `messages.json` | Message file                 |
//! | `GEOPOST_MAX_CHARS` | `50`            | Character budget per message |
//! | `RUST_LOG`          | see [`crate::logging`] | Log filter            |

use std::path::PathBuf;

use geopost_input::{BoundedTextInput, InputError, DEFAULT_MAX_CHARS};
use geopost_store::DEFAULT_STORE_FILE;

/// Errors in the resolved configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `GEOPOST_MAX_CHARS` is not a number.
    #[error("GEOPOST_MAX_CHARS must be a positive integer, got \"{0}\"")]
    InvalidMaxChars(String),

    /// The budget is unusable.
    #[error(transparent)]
    Budget(#[from] InputError),
}

/// Resolved front-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The message file.
    pub store_path: PathBuf,
    /// Character budget per message.
    pub max_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = lookup("GEOPOST_STORE").filter(|p| !p.trim().is_empty()) {
            config.store_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("GEOPOST_MAX_CHARS") {
            config.max_chars = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxChars(raw.clone()))?;
        }
        Ok(config)
    }

    /// Apply command-line flags on top.
    #[must_use]
    pub fn with_overrides(mut self, store_path: Option<PathBuf>, max_chars: Option<usize>) -> Self {
        if let Some(path) = store_path {
            self.store_path = path;
        }
        if let Some(max) = max_chars {
            self.max_chars = max;
        }
        self
    }

    /// The input budget, validated.
    pub fn input_policy(&self) -> Result<BoundedTextInput, ConfigError> {
        Ok(BoundedTextInput::new(self.max_chars)?)
    }

    /// Log file used by the interactive front-end, next to the store.
    pub fn log_path(&self) -> PathBuf {
        self.store_path.with_extension("log")
    }
}
