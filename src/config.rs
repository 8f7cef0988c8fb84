//! Configuration for the expiration sweeper process.
//!
//! Settings come from environment variables or from a JSON document such as
//! the one below. A document without `database_url` falls back to
//! `DATABASE_URL`.
//!
//! ```json
//! {
//!   "interval_secs": 60,
//!   "log_level": "info",
//!   "database_url": "postgres://tasks@localhost/tasks"
//! }
//! ```

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the sweep interval in seconds.
pub const INTERVAL_ENV: &str = "TASK_ASSIGNER_SWEEP_INTERVAL_SECS";
/// Environment variable holding the default log level.
pub const LOG_LEVEL_ENV: &str = "TASK_ASSIGNER_LOG_LEVEL";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The interval is not a whole number of seconds.
    #[error("invalid sweep interval '{0}', expected a whole number of seconds")]
    InvalidInterval(String),
    /// The interval is zero.
    #[error("sweep interval must be greater than zero")]
    ZeroInterval,
    /// The JSON document could not be parsed.
    #[error("failed to parse sweeper config: {0}")]
    Parse(#[from] serde_json::Error),
    /// No database URL was configured.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
}

/// Settings for the periodic expiration sweep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweeperConfig {
    interval_secs: u64,
    log_level: String,
    database_url: Option<String>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            database_url: None,
        }
    }
}

impl SweeperConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(INTERVAL_ENV) {
            config.interval_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidInterval(raw.clone()))?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.database_url = database_url_from(&lookup);
        config.validate()
    }

    /// Takes the database URL from `lookup` when the document did not set
    /// one. Every other field keeps the document's value.
    #[must_use]
    pub fn with_env_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.database_url.is_none() {
            self.database_url = database_url_from(&lookup);
        }
        self
    }

    /// Parses settings from a JSON document. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroInterval`] for a zero interval.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(self)
    }

    /// Returns the time between sweeps.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Returns the default log level directive.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Returns the database URL, if configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

fn database_url_from(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty())
}
