mod config;

pub use config::{Config, GameSection, TimingSection};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the configuration directory.
///
/// `WHACKAMOLE_CONFIG_DIR` wins when set. Otherwise `~/.config/whackamole`,
/// or `~/.config/whackamole-dev` when `WHACKAMOLE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("WHACKAMOLE_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
                .unwrap_or_else(|| PathBuf::from("."));

            let env = std::env::var("WHACKAMOLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("whackamole-dev")
            } else {
                base_dir.join("whackamole")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
