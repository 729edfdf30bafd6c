//! TOML-based application configuration.
//!
//! Stores the startup constants of a game:
//! - Difficulty, duration and board size
//! - Optional fixed RNG seed
//! - Countdown interval and end-of-game hold
//!
//! Configuration is stored at `<config dir>/whackamole/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::difficulty::Difficulty;
use crate::error::ConfigError;
use crate::game::{
    GameConfig, DEFAULT_DURATION_SECS, DEFAULT_HOLE_COUNT, END_HOLD_MS, TICK_INTERVAL_MS,
};

/// Per-game settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSection {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_hole_count")]
    pub hole_count: usize,
    /// Fixed RNG seed for reproducible games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Clock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSection {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_end_hold_ms")]
    pub end_hold_ms: u64,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameSection,
    #[serde(default)]
    pub timing: TimingSection,
}

fn default_duration_secs() -> u32 {
    DEFAULT_DURATION_SECS
}
fn default_hole_count() -> usize {
    DEFAULT_HOLE_COUNT
}
fn default_tick_interval_ms() -> u64 {
    TICK_INTERVAL_MS
}
fn default_end_hold_ms() -> u64 {
    END_HOLD_MS
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            duration_secs: default_duration_secs(),
            hole_count: default_hole_count(),
            seed: None,
        }
    }
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            end_hold_ms: default_end_hold_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let new_value = match obj.get(part) {
                Some(serde_json::Value::Number(_)) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a number")))?,
                Some(serde_json::Value::Bool(_)) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a bool")))?,
                Some(_) => serde_json::Value::String(value.into()),
                // Optional keys are skipped when unset.
                None if key == "game.seed" => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a number")))?,
                None => return Err(unknown()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. The result must still form a
    /// valid game configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or validate; `self` is left unchanged in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.game_config().validate()?;
        *self = updated;
        Ok(())
    }

    /// The game settings this configuration describes.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            difficulty: self.game.difficulty,
            duration_secs: self.game.duration_secs,
            hole_count: self.game.hole_count,
            tick_interval_ms: self.timing.tick_interval_ms,
            end_hold_ms: self.timing.end_hold_ms,
            seed: self.game.seed,
        }
    }
}
