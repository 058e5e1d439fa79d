//! Game configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use dr_nim_core::{MAX_MARBLES, MatchRules};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "DR_NIM_CONFIG";

/// Settings for a Dr. Nim process.
///
/// ```toml
/// read_timeout_secs = 60
/// think_delay_ms = 500
///
/// [rules]
/// marbles = 15
/// first = "local"
/// win_rule = "standard"
/// pass_rule = "opening"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct GameConfig {
    /// Rules for matches this process starts or hosts.
    rules: MatchRules,

    /// Give up on a silent peer after this many seconds.
    read_timeout_secs: Option<u64>,

    /// Pause before each of Dr. Nim's moves, in milliseconds.
    think_delay_ms: u64,
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(rules = ?config.rules, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Checks values the types cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_MARBLES).contains(&self.rules.marbles) {
            return Err(ConfigError::new(format!(
                "rules.marbles must be between 1 and {}, got {}",
                MAX_MARBLES, self.rules.marbles
            )));
        }
        if self.read_timeout_secs == Some(0) {
            return Err(ConfigError::new(
                "read_timeout_secs must be positive; omit it to wait forever".to_string(),
            ));
        }
        Ok(())
    }

    /// Read timeout for network peers.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    /// Pause before computer moves.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
