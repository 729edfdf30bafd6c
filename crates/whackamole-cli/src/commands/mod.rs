pub mod config;
pub mod play;
pub mod simulate;

use whackamole_core::{Config, Difficulty, GameConfig};

/// Game settings from the config file, with command-line overrides applied.
pub fn game_config(
    difficulty: Option<Difficulty>,
    duration: Option<u32>,
    holes: Option<usize>,
    seed: Option<u64>,
) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = Config::load()?.game_config();
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(duration) = duration {
        config = config.with_duration_secs(duration);
    }
    if let Some(holes) = holes {
        config = config.with_hole_count(holes);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}
