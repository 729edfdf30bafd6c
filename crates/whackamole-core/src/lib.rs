//! # Whackamole Core Library
//!
//! This library provides the game logic for Whackamole: moles pop up in
//! random holes for a difficulty-dependent time while a countdown runs, and
//! the player scores by whacking the mole that is currently up. Front ends
//! (the `whackamole` CLI, tests, simulations) drive the same controller and
//! render through the [`Presenter`] trait.
//!
//! ## Architecture
//!
//! - **Clock**: A single-threaded deferred-action scheduler. Nothing runs on
//!   its own; the caller advances time and due actions fire in order
//! - **Game**: The reveal cycle, countdown and score, orchestrated by
//!   [`GameController`]
//! - **Storage**: TOML-based configuration
//! - **Simulation**: Seeded headless games with a scripted player
//!
//! ## Key Components
//!
//! - [`GameController`]: Start, whack, stop and advance a game
//! - [`Clock`]: Cancellable timeouts and intervals on a simulated clock
//! - [`Config`]: Application configuration management
//! - [`SimulationHarness`]: Deterministic full-game runs

pub mod clock;
pub mod difficulty;
pub mod error;
pub mod events;
pub mod game;
pub mod presenter;
pub mod rng;
pub mod selector;
pub mod simulation;
pub mod storage;

pub use clock::{Clock, TimerToken};
pub use difficulty::{set_delay, Difficulty};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, GamePhase, StopReason};
pub use game::{
    CountdownTimer, GameConfig, GameController, GameState, RevealCycle, RevealPhase, ScoreTracker,
};
pub use presenter::{NullPresenter, Presenter, PresenterCall, RecordingPresenter};
pub use rng::GameRng;
pub use selector::{HoleSelector, Position};
pub use simulation::{AutoPlayer, SimulationHarness, SimulationResult, SimulationSeed};
pub use storage::Config;
