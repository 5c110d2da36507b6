use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use taixiu_execution::{Policy, SessionConfig};
use taixiu_types::{
    BASIS_POINTS, DEFAULT_STAKE, INITIAL_BALANCE, REVEAL_DELAY_MS, ROLL_DELAY_MS, STAKE_PRESETS,
};
use thiserror::Error;
use tracing::Level;

/// Configuration for the terminal game, read from YAML.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default)]
    pub bell: bool,

    #[serde(default = "default_initial_balance")]
    pub initial_balance: u64,
    #[serde(default = "default_stake")]
    pub default_stake: u64,
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
    #[serde(default = "default_roll_delay_ms")]
    pub roll_delay_ms: u64,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,

    #[serde(default)]
    pub policy: Policy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("presets must not be empty")]
    EmptyPresets,
    #[error("preset {index} must be > 0")]
    ZeroPreset { index: usize },
    #[error("win_streak_bonus_bps must be <= {max} (got {value})")]
    InvalidBonus { value: u64, max: u64 },
}

/// Checked configuration, ready to build a session from.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub log_level: Level,
    pub json_logs: bool,
    pub state_file: PathBuf,
    pub bell: bool,
    pub session: SessionConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_state_file() -> String {
    "taixiu.json".to_string()
}

fn default_initial_balance() -> u64 {
    INITIAL_BALANCE
}

fn default_stake() -> u64 {
    DEFAULT_STAKE
}

fn default_presets() -> Vec<u64> {
    STAKE_PRESETS.to_vec()
}

fn default_roll_delay_ms() -> u64 {
    ROLL_DELAY_MS
}

fn default_reveal_delay_ms() -> u64 {
    REVEAL_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            state_file: default_state_file(),
            bell: false,
            initial_balance: default_initial_balance(),
            default_stake: default_stake(),
            presets: default_presets(),
            roll_delay_ms: default_roll_delay_ms(),
            reveal_delay_ms: default_reveal_delay_ms(),
            policy: Policy::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level = Level::from_str(&self.log_level).map_err(|_| {
            ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            }
        })?;
        if self.presets.is_empty() {
            return Err(ConfigError::EmptyPresets);
        }
        if let Some(index) = self.presets.iter().position(|p| *p == 0) {
            return Err(ConfigError::ZeroPreset { index });
        }
        if self.default_stake == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "default_stake",
                value: 0,
            });
        }
        for (field, value) in [
            ("win_streak_threshold", self.policy.win_streak_threshold),
            ("loss_streak_threshold", self.policy.loss_streak_threshold),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidNonZero {
                    field,
                    value: u64::from(value),
                });
            }
        }
        if self.policy.win_streak_bonus_bps > BASIS_POINTS {
            return Err(ConfigError::InvalidBonus {
                value: self.policy.win_streak_bonus_bps,
                max: BASIS_POINTS,
            });
        }

        Ok(ValidatedConfig {
            log_level,
            json_logs: self.json_logs,
            state_file: PathBuf::from(self.state_file),
            bell: self.bell,
            session: SessionConfig {
                policy: self.policy,
                initial_balance: self.initial_balance,
                default_stake: self.default_stake,
                presets: self.presets,
                roll_delay: Duration::from_millis(self.roll_delay_ms),
                reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            },
        })
    }
}
