use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::selector::Position;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The reveal cycle found no time left.
    TimeUp,
    /// `stop()` was called while the game was still running.
    Aborted,
}

/// Coarse controller phase, as reported in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Idle,
    Running,
    /// Game over, holding the end-of-game display before returning to idle.
    GameOver,
}

/// Every state change in the game produces an Event.
///
/// `at_ms` is the game clock time, not wall time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GameStarted {
        difficulty: Difficulty,
        duration_secs: u32,
        holes: usize,
        at_ms: u64,
    },
    MoleShown {
        position: Position,
        delay_ms: u64,
        at_ms: u64,
    },
    MoleHidden {
        position: Position,
        at_ms: u64,
    },
    MoleWhacked {
        position: Position,
        score: u32,
        at_ms: u64,
    },
    /// Activation on a hole without a live mole.
    WhackMissed {
        position: Position,
        at_ms: u64,
    },
    TimerTicked {
        remaining_secs: u32,
        at_ms: u64,
    },
    /// The countdown found no time left and cancelled itself.
    TimerExpired {
        at_ms: u64,
    },
    GameStopped {
        reason: StopReason,
        score: u32,
        at_ms: u64,
    },
    /// End-of-game hold elapsed; a new game may be started.
    GameReady {
        at_ms: u64,
    },
    StateSnapshot {
        phase: GamePhase,
        difficulty: Difficulty,
        score: u32,
        remaining_secs: u32,
        duration_secs: u32,
        visible: Option<Position>,
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::GameStarted { at_ms, .. }
            | Event::MoleShown { at_ms, .. }
            | Event::MoleHidden { at_ms, .. }
            | Event::MoleWhacked { at_ms, .. }
            | Event::WhackMissed { at_ms, .. }
            | Event::TimerTicked { at_ms, .. }
            | Event::TimerExpired { at_ms }
            | Event::GameStopped { at_ms, .. }
            | Event::GameReady { at_ms }
            | Event::StateSnapshot { at_ms, .. } => *at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::MoleShown {
            position: Position::new(3),
            delay_ms: 1000,
            at_ms: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MoleShown");
        assert_eq!(json["position"], 3);
        assert_eq!(event.at_ms(), 42);
    }

    #[test]
    fn stop_reason_is_snake_case() {
        let event = Event::GameStopped {
            reason: StopReason::TimeUp,
            score: 2,
            at_ms: 0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"time_up\""));
    }
}
