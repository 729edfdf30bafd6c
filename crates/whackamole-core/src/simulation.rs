//! Deterministic headless games.
//!
//! Runs a complete game on the simulated clock with a scripted player. The
//! same seed and settings always produce the same event stream, which makes
//! the harness useful for regression tests and for tuning difficulty.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::{Event, GamePhase};
use crate::game::{GameConfig, GameController};
use crate::presenter::NullPresenter;
use crate::rng::GameRng;
use crate::selector::Position;

/// Seed for deterministic simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationSeed(pub u64);

impl SimulationSeed {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Generate a seed from a string (for named scenarios)
    pub fn from_string(s: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl Default for SimulationSeed {
    fn default() -> Self {
        Self(42)
    }
}

/// Scripted player: reacts to each mole after a fixed delay, with a given
/// chance of trying at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoPlayer {
    /// Chance (0.0-1.0) of going for a mole.
    pub hit_probability: f64,
    /// Time from reveal to whack. Moles that hide sooner are missed.
    pub reaction_ms: u64,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self {
            hit_probability: 0.75,
            reaction_ms: 450,
        }
    }
}

/// Outcome of one simulated game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: SimulationSeed,
    pub config: GameConfig,
    pub player: AutoPlayer,
    pub score: u32,
    pub reveals: u64,
    pub hits: u32,
    /// Moles that hid without being whacked.
    pub misses: u64,
    /// Clock time when the game stopped.
    pub ended_at_ms: u64,
    pub events: Vec<Event>,
}

/// Deterministic simulation harness
#[derive(Debug, Default)]
pub struct SimulationHarness {
    history: Vec<SimulationResult>,
}

impl SimulationHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play one full game, from start through the end-of-game hold.
    pub fn run(
        &mut self,
        config: &GameConfig,
        player: AutoPlayer,
        seed: SimulationSeed,
    ) -> Result<SimulationResult> {
        let config = config.clone().with_seed(seed.0);
        let mut game = GameController::new(config.clone(), NullPresenter)?;
        let mut player_rng = GameRng::seeded(seed.0.rotate_left(32) ^ 0x5EED);

        let mut events = game.start()?;
        let mut next_whack = plan_whack(&events, &player, &mut player_rng);

        while game.phase() != GamePhase::Idle {
            let deadline = game.next_deadline();
            let batch = match (next_whack, deadline) {
                (Some((at_ms, position)), Some(due)) if at_ms < due => {
                    next_whack = None;
                    let mut batch = game.advance_to(at_ms)?;
                    batch.extend(game.whack(position)?);
                    batch
                }
                (Some((at_ms, position)), None) => {
                    next_whack = None;
                    let mut batch = game.advance_to(at_ms)?;
                    batch.extend(game.whack(position)?);
                    batch
                }
                (_, Some(due)) => game.advance_to(due)?,
                (None, None) => break,
            };
            if let Some(planned) = plan_whack(&batch, &player, &mut player_rng) {
                next_whack = Some(planned);
            }
            events.extend(batch);
        }

        let result = summarize(seed, config, player, events);
        self.history.push(result.clone());
        Ok(result)
    }

    /// Get simulation history
    pub fn history(&self) -> &[SimulationResult] {
        &self.history
    }
}

/// Decide whether the player goes for the latest mole shown in `events`.
fn plan_whack(
    events: &[Event],
    player: &AutoPlayer,
    rng: &mut GameRng,
) -> Option<(u64, Position)> {
    let (position, delay_ms, at_ms) = events.iter().rev().find_map(|e| match e {
        Event::MoleShown {
            position,
            delay_ms,
            at_ms,
        } => Some((*position, *delay_ms, *at_ms)),
        _ => None,
    })?;
    if player.reaction_ms >= delay_ms || !rng.chance(player.hit_probability) {
        return None;
    }
    Some((at_ms + player.reaction_ms, position))
}

fn summarize(
    seed: SimulationSeed,
    config: GameConfig,
    player: AutoPlayer,
    events: Vec<Event>,
) -> SimulationResult {
    let mut reveals = 0u64;
    let mut hits = 0u32;
    let mut score = 0u32;
    let mut ended_at_ms = 0u64;
    for event in &events {
        match event {
            Event::MoleShown { .. } => reveals += 1,
            Event::MoleWhacked { .. } => hits += 1,
            Event::GameStopped {
                score: final_score,
                at_ms,
                ..
            } => {
                score = *final_score;
                ended_at_ms = *at_ms;
            }
            _ => {}
        }
    }

    SimulationResult {
        seed,
        config,
        player,
        score,
        reveals,
        hits,
        misses: reveals.saturating_sub(hits as u64),
        ended_at_ms,
        events,
    }
}
