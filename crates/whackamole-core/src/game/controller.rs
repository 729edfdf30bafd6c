//! Game orchestration.
//!
//! The controller owns the [`GameState`], the clock and both scheduled
//! chains. It does not use internal threads: the caller moves time forward
//! with [`GameController::advance_to`] and forwards player input through
//! [`GameController::whack`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut game = GameController::new(GameConfig::default(), presenter)?;
//! game.start()?;
//! // In a loop:
//! game.advance_to(elapsed_ms)?; // Fires due reveals, hides and ticks
//! game.whack(position)?;        // On player input
//! ```

use tracing::{debug, info, warn};

use super::countdown::CountdownTimer;
use super::reveal::{HideOutcome, RevealCycle};
use super::{
    Deferred, GameConfig, GameState, GAME_OVER_LABEL, RUNNING_LABEL, START_LABEL,
};
use crate::clock::{Clock, TimerToken};
use crate::error::{ConfigError, Result, ValidationError};
use crate::events::{Event, GamePhase, StopReason};
use crate::presenter::Presenter;
use crate::rng::GameRng;
use crate::selector::{HoleSelector, Position};

#[derive(Debug)]
pub struct GameController<P: Presenter> {
    config: GameConfig,
    state: GameState,
    clock: Clock<Deferred>,
    countdown: CountdownTimer,
    reveal: RevealCycle,
    presenter: P,
    phase: GamePhase,
    trigger_enabled: bool,
    input_armed: bool,
    hold_token: Option<TimerToken>,
}

impl<P: Presenter> GameController<P> {
    /// Build an idle game and show the idle display.
    ///
    /// # Errors
    ///
    /// Invalid configurations are fatal here so the game loop never runs
    /// with them.
    pub fn new(config: GameConfig, mut presenter: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = HoleSelector::new(config.hole_count)?;
        let rng = GameRng::from_seed_option(config.seed);
        let state = GameState::new(config.difficulty, config.duration_secs);

        presenter.set_start_trigger(true, START_LABEL);
        presenter.publish_score(state.score());
        presenter.publish_remaining_time(state.remaining_secs());

        Ok(Self {
            countdown: CountdownTimer::new(config.tick_interval_ms),
            reveal: RevealCycle::new(selector, rng),
            clock: Clock::new(),
            state,
            config,
            presenter,
            phase: GamePhase::Idle,
            trigger_enabled: true,
            input_armed: false,
            hold_token: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// When the next scheduled action is due, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.clock.next_deadline()
    }

    pub fn countdown(&self) -> &CountdownTimer {
        &self.countdown
    }

    pub fn reveal(&self) -> &RevealCycle {
        &self.reveal
    }

    /// The mole currently up, if any.
    pub fn visible(&self) -> Option<Position> {
        self.reveal.visible()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        self.reveal.selector().positions()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            difficulty: self.state.difficulty,
            score: self.state.score(),
            remaining_secs: self.state.remaining_secs,
            duration_secs: self.state.duration_secs,
            visible: self.reveal.visible(),
            at_ms: self.clock.now_ms(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a game.
    ///
    /// Returns no events when the start control is unavailable (a game is
    /// running or the game-over hold has not elapsed); such requests are
    /// dropped, never queued.
    pub fn start(&mut self) -> Result<Vec<Event>> {
        if self.phase != GamePhase::Idle || !self.trigger_enabled {
            debug!(phase = ?self.phase, "start rejected");
            return Ok(Vec::new());
        }

        self.trigger_enabled = false;
        self.presenter.set_start_trigger(false, RUNNING_LABEL);
        self.state.score.reset(&mut self.presenter);
        self.input_armed = true;
        self.state.last_position = None;
        self.set_duration(self.config.duration_secs);

        let duration = self.state.duration_secs;
        self.countdown
            .start(&mut self.state, duration, &mut self.clock, &mut self.presenter);
        self.state.running = true;
        self.phase = GamePhase::Running;

        let started = Event::GameStarted {
            difficulty: self.state.difficulty,
            duration_secs: duration,
            holes: self.reveal.selector().count(),
            at_ms: self.clock.now_ms(),
        };
        info!(difficulty = %self.state.difficulty, duration, "game started");

        let shown = self
            .reveal
            .start(&mut self.state, &mut self.clock, &mut self.presenter)?;
        Ok(vec![started, shown])
    }

    /// Player activated the target at `position`.
    ///
    /// Returns `None` while input is not armed (no game running).
    ///
    /// # Errors
    ///
    /// `position` must be on the board.
    pub fn whack(&mut self, position: Position) -> Result<Option<Event>> {
        let holes = self.reveal.selector().count();
        if !self.reveal.selector().contains(position) {
            return Err(ValidationError::OutOfBounds {
                collection: "holes".into(),
                index: position.index(),
                len: holes,
            }
            .into());
        }
        if !self.input_armed {
            return Ok(None);
        }

        let at_ms = self.clock.now_ms();
        if self.reveal.try_whack(position) {
            let score = self.state.score.increment(&mut self.presenter);
            debug!(%position, score, "mole whacked");
            Ok(Some(Event::MoleWhacked {
                position,
                score,
                at_ms,
            }))
        } else {
            debug!(%position, "whack missed");
            Ok(Some(Event::WhackMissed { position, at_ms }))
        }
    }

    /// Abort a running game.
    ///
    /// Returns the `MoleHidden` event for a mole still up followed by
    /// `GameStopped`, or no events if no game was running.
    pub fn stop(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.phase == GamePhase::Running {
            self.finish(StopReason::Aborted, &mut events);
        }
        events
    }

    /// Fire every action due at or before `now_ms`, in order.
    pub fn advance_to(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while let Some((token, action)) = self.clock.pop_due(now_ms) {
            self.dispatch(token, action, &mut events)?;
        }
        self.clock.advance_to(now_ms);
        Ok(events)
    }

    pub fn advance_by(&mut self, delta_ms: u64) -> Result<Vec<Event>> {
        let target = self.clock.now_ms().saturating_add(delta_ms);
        self.advance_to(target)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_duration(&mut self, duration_secs: u32) {
        self.state.duration_secs = duration_secs;
        self.state.remaining_secs = duration_secs;
        self.presenter.publish_remaining_time(duration_secs);
    }

    fn dispatch(
        &mut self,
        token: TimerToken,
        action: Deferred,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        match action {
            Deferred::CountdownTick => {
                if !self.countdown.owns(token) {
                    warn!(?token, "stale countdown tick dropped");
                    return Ok(());
                }
                let event = self
                    .countdown
                    .tick(&mut self.state, &mut self.clock, &mut self.presenter);
                let expired = matches!(event, Event::TimerExpired { .. });
                events.push(event);
                if expired && self.phase == GamePhase::Running {
                    self.finish(StopReason::TimeUp, events);
                }
            }
            Deferred::HideMole { position } => {
                if !self.reveal.owns(token) {
                    warn!(?token, %position, "stale hide dropped");
                    return Ok(());
                }
                let outcome = self.reveal.on_hide(
                    position,
                    &mut self.state,
                    &mut self.clock,
                    &mut self.presenter,
                    events,
                )?;
                if outcome == HideOutcome::TimeUp && self.phase == GamePhase::Running {
                    self.finish(StopReason::TimeUp, events);
                }
            }
            Deferred::RestoreIdle => {
                if self.hold_token != Some(token) {
                    warn!(?token, "stale restore dropped");
                    return Ok(());
                }
                events.push(self.restore_idle());
            }
        }
        Ok(())
    }

    fn finish(&mut self, reason: StopReason, events: &mut Vec<Event>) {
        self.state.running = false;
        self.countdown.stop(&mut self.clock);
        events.extend(self.reveal.stop(&mut self.clock, &mut self.presenter));
        self.input_armed = false;
        self.phase = GamePhase::GameOver;

        self.presenter.set_start_trigger(false, GAME_OVER_LABEL);
        self.hold_token = Some(
            self.clock
                .set_timeout(self.config.end_hold_ms, Deferred::RestoreIdle),
        );

        let score = self.state.score();
        info!(?reason, score, "game stopped");
        events.push(Event::GameStopped {
            reason,
            score,
            at_ms: self.clock.now_ms(),
        });
    }

    fn restore_idle(&mut self) -> Event {
        self.hold_token = None;
        self.phase = GamePhase::Idle;
        self.trigger_enabled = true;
        self.presenter.set_start_trigger(true, START_LABEL);
        self.presenter
            .publish_remaining_time(self.state.duration_secs);
        debug!("ready for a new game");
        Event::GameReady {
            at_ms: self.clock.now_ms(),
        }
    }
}
