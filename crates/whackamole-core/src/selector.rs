//! Hole selection without immediate repeats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::rng::GameRng;

/// Zero-based index of a hole on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(usize);

impl Position {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Positions are shown one-based to players.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// Picks the next hole for a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleSelector {
    count: usize,
}

impl HoleSelector {
    /// # Errors
    ///
    /// Fewer than two holes cannot satisfy the no-repeat rule.
    pub fn new(count: usize) -> Result<Self, ConfigError> {
        if count < 2 {
            return Err(ConfigError::InvalidValue {
                key: "game.hole_count".into(),
                message: format!("at least 2 holes are required, got {count}"),
            });
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..self.count).map(Position)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.0 < self.count
    }

    /// Choose a hole different from `last` and record it as the new `last`.
    ///
    /// Draws uniformly among the `count - 1` holes other than `last`, so no
    /// retry is ever needed. A `last` outside the board excludes nothing.
    pub fn choose_hole(
        &self,
        rng: &mut GameRng,
        last: &mut Option<Position>,
    ) -> Result<Position, ValidationError> {
        let chosen = match *last {
            Some(prev) if self.contains(prev) => {
                let drawn = rng.random_integer(0, (self.count - 2) as u64)? as usize;
                // Skip over the excluded slot.
                if drawn >= prev.0 {
                    drawn + 1
                } else {
                    drawn
                }
            }
            _ => rng.random_integer(0, (self.count - 1) as u64)? as usize,
        };
        let position = Position(chosen);
        *last = Some(position);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_boards_smaller_than_two() {
        assert!(HoleSelector::new(0).is_err());
        assert!(HoleSelector::new(1).is_err());
        assert!(HoleSelector::new(2).is_ok());
    }

    #[test]
    fn never_repeats_consecutively() {
        let selector = HoleSelector::new(9).unwrap();
        let mut rng = GameRng::seeded(2024);
        let mut last = None;
        let mut prev: Option<Position> = None;
        for _ in 0..1_000 {
            let hole = selector.choose_hole(&mut rng, &mut last).unwrap();
            assert_ne!(Some(hole), prev);
            assert_eq!(last, Some(hole));
            assert!(selector.contains(hole));
            prev = Some(hole);
        }
    }

    #[test]
    fn two_holes_alternate() {
        let selector = HoleSelector::new(2).unwrap();
        let mut rng = GameRng::seeded(5);
        let mut last = Some(Position::new(0));
        for i in 1..50 {
            let hole = selector.choose_hole(&mut rng, &mut last).unwrap();
            assert_eq!(hole.index(), i % 2);
        }
    }

    #[test]
    fn every_other_hole_is_reachable() {
        let selector = HoleSelector::new(9).unwrap();
        let mut rng = GameRng::seeded(11);
        let mut seen = [false; 9];
        for _ in 0..2_000 {
            let mut last = Some(Position::new(4));
            let hole = selector.choose_hole(&mut rng, &mut last).unwrap();
            seen[hole.index()] = true;
        }
        for (i, hit) in seen.iter().enumerate() {
            assert_eq!(*hit, i != 4, "hole {i}");
        }
    }

    #[test]
    fn positions_display_one_based() {
        assert_eq!(Position::new(0).to_string(), "1");
        assert_eq!(Position::new(8).to_string(), "9");
    }
}
