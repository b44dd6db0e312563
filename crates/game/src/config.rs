//! Program configuration (demo choice, tick rate, lander constants). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use lander::{InvalidConfig, LanderConfig};

use crate::lights::BlinkConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid lander settings")]
    Lander(#[from] InvalidConfig),
    #[error("{0}")]
    Invalid(String),
}

/// Which of the bundled demos to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Demo {
    /// The lunar lander approach game.
    #[default]
    Lander,
    /// Blink the cabin lights in counted groups.
    CabinLights,
    /// Read `#`-terminated words typed on the keypad (stdin).
    KeypadWords,
}

/// Settings for a run. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub demo: Demo,
    /// Polling period of the game loop in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Seed for the drift generator. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pilot script to replay. `None` flies the built-in approach.
    #[serde(default)]
    pub script: Option<PathBuf>,
    /// Give up after this many ticks if the lander never arrives.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Sleep between ticks. Turn off to run a scripted flight instantly.
    #[serde(default = "default_true")]
    pub realtime: bool,
    #[serde(default)]
    pub lander: LanderConfig,
    #[serde(default)]
    pub lights: BlinkConfig,
    /// Longest word the keypad demo reads before printing it.
    #[serde(default = "default_max_word_length")]
    pub max_word_length: usize,
}

fn default_tick_ms() -> u64 {
    100
}
fn default_max_ticks() -> u64 {
    10_000
}
fn default_true() -> bool {
    true
}
fn default_max_word_length() -> usize {
    4
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            demo: Demo::default(),
            tick_ms: default_tick_ms(),
            seed: None,
            script: None,
            max_ticks: default_max_ticks(),
            realtime: default_true(),
            lander: LanderConfig::default(),
            lights: BlinkConfig::default(),
            max_word_length: default_max_word_length(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, error_chain(&e));
                Self::default()
            }
        }
    }

    /// Load and validate config from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be at least 1".into()));
        }
        if self.max_word_length == 0 {
            return Err(ConfigError::Invalid("max_word_length must be at least 1".into()));
        }
        self.lander.validate()?;
        Ok(())
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
