use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::error::ValidationError;
use crate::rng::GameRng;

/// Reveal duration for [`Difficulty::Easy`], in milliseconds.
pub const EASY_DELAY_MS: u64 = 1500;
/// Reveal duration for [`Difficulty::Normal`], in milliseconds.
pub const NORMAL_DELAY_MS: u64 = 1000;
/// Inclusive bounds of the randomized [`Difficulty::Hard`] reveal duration.
pub const HARD_DELAY_MIN_MS: u64 = 600;
pub const HARD_DELAY_MAX_MS: u64 = 1200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::InvalidValue {
                key: "difficulty".into(),
                message: format!("expected easy, normal or hard, got '{other}'"),
            }),
        }
    }
}

// Accepts any case, like `FromStr`.
impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How long a mole stays up for the given difficulty.
///
/// Only the hard branch consumes randomness.
pub fn set_delay(difficulty: Difficulty, rng: &mut GameRng) -> Result<u64, ValidationError> {
    match difficulty {
        Difficulty::Easy => Ok(EASY_DELAY_MS),
        Difficulty::Normal => Ok(NORMAL_DELAY_MS),
        Difficulty::Hard => rng.random_integer(HARD_DELAY_MIN_MS, HARD_DELAY_MAX_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_delays() {
        let mut rng = GameRng::seeded(3);
        for _ in 0..100 {
            assert_eq!(set_delay(Difficulty::Easy, &mut rng).unwrap(), 1500);
            assert_eq!(set_delay(Difficulty::Normal, &mut rng).unwrap(), 1000);
        }
    }

    #[test]
    fn hard_delay_within_bounds() {
        let mut rng = GameRng::seeded(99);
        for _ in 0..10_000 {
            let d = set_delay(Difficulty::Hard, &mut rng).unwrap();
            assert!((600..=1200).contains(&d), "delay {d} out of range");
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn deserializes_any_case() {
        let d: Difficulty = serde_json::from_str("\"HARD\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"hard\"");
        assert!(serde_json::from_str::<Difficulty>("\"brutal\"").is_err());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Difficulty::default(), Difficulty::Normal);
        assert_eq!(Difficulty::default().to_string(), "normal");
    }
}
