//! The reveal/score/countdown loop.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> GameOver -> Idle
//! ```
//!
//! While `Running`, two independent chains share the [`Clock`](crate::clock::Clock):
//! the reveal cycle re-arms itself after every hide, and the countdown ticks
//! on a fixed interval. Both read the same [`GameState`].

mod controller;
mod countdown;
mod reveal;
mod score;

pub use controller::GameController;
pub use countdown::CountdownTimer;
pub use reveal::{HideOutcome, RevealCycle, RevealPhase};
pub use score::ScoreTracker;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::error::ConfigError;
use crate::selector::Position;

pub const DEFAULT_DURATION_SECS: u32 = 10;
pub const DEFAULT_HOLE_COUNT: usize = 9;
pub const TICK_INTERVAL_MS: u64 = 1000;
/// How long the "game over!" caption stays before the start control returns.
pub const END_HOLD_MS: u64 = 2000;

pub const START_LABEL: &str = "START GAME";
pub const RUNNING_LABEL: &str = "git em!";
pub const GAME_OVER_LABEL: &str = "game over!";

/// Settings fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub duration_secs: u32,
    pub hole_count: usize,
    pub tick_interval_ms: u64,
    pub end_hold_ms: u64,
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            duration_secs: DEFAULT_DURATION_SECS,
            hole_count: DEFAULT_HOLE_COUNT,
            tick_interval_ms: TICK_INTERVAL_MS,
            end_hold_ms: END_HOLD_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_hole_count(mut self, hole_count: usize) -> Self {
        self.hole_count = hole_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Rejects configurations the game loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "game.duration_secs".into(),
                message: "duration must be positive".into(),
            });
        }
        if self.hole_count < 2 {
            return Err(ConfigError::InvalidValue {
                key: "game.hole_count".into(),
                message: format!("at least 2 holes are required, got {}", self.hole_count),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.tick_interval_ms".into(),
                message: "tick interval must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Mutable state of the single active game, owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub(crate) remaining_secs: u32,
    pub(crate) score: ScoreTracker,
    pub(crate) last_position: Option<Position>,
    pub(crate) difficulty: Difficulty,
    pub(crate) duration_secs: u32,
    pub(crate) running: bool,
}

impl GameState {
    pub fn new(difficulty: Difficulty, duration_secs: u32) -> Self {
        Self {
            remaining_secs: duration_secs,
            score: ScoreTracker::new(),
            last_position: None,
            difficulty,
            duration_secs,
            running: false,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn score(&self) -> u32 {
        self.score.points()
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Deferred actions the game schedules on its clock.
///
/// Actions carry no state snapshot beyond the hole they refer to; handlers
/// read everything else from [`GameState`] when they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Hide the mole at `position`, then reveal the next one or end the game.
    HideMole { position: Position },
    CountdownTick,
    /// End of the game-over hold.
    RestoreIdle,
}
