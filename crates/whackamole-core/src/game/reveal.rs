//! Self-rescheduling reveal cycle.
//!
//! ```text
//! Idle -> Armed -> Hidden <-> Visible -> (Armed | Stopped)
//! ```
//!
//! Each cycle shows a mole and schedules its own hide. The hide handler
//! re-reads the remaining time and either runs the next cycle or reports
//! [`HideOutcome::TimeUp`]. There is no loop counter; the chain lasts as
//! long as time remains.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Deferred, GameState};
use crate::clock::{Clock, TimerToken};
use crate::difficulty::set_delay;
use crate::error::ValidationError;
use crate::events::Event;
use crate::presenter::Presenter;
use crate::rng::GameRng;
use crate::selector::{HoleSelector, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "position")]
pub enum RevealPhase {
    Idle,
    Armed,
    Hidden,
    Visible(Position),
    Stopped,
}

/// What the hide handler decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    /// Another mole is up.
    Continue,
    /// No time left; the controller must stop the game.
    TimeUp,
}

#[derive(Debug, Clone)]
pub struct RevealCycle {
    selector: HoleSelector,
    rng: GameRng,
    phase: RevealPhase,
    token: Option<TimerToken>,
    /// The visible mole already scored.
    whacked: bool,
    reveals: u64,
    hides_fired: u64,
}

impl RevealCycle {
    pub fn new(selector: HoleSelector, rng: GameRng) -> Self {
        Self {
            selector,
            rng,
            phase: RevealPhase::Idle,
            token: None,
            whacked: false,
            reveals: 0,
            hides_fired: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn selector(&self) -> &HoleSelector {
        &self.selector
    }

    pub fn visible(&self) -> Option<Position> {
        match self.phase {
            RevealPhase::Visible(position) => Some(position),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Whether `token` is the hide this cycle currently has scheduled.
    pub fn owns(&self, token: TimerToken) -> bool {
        self.token == Some(token)
    }

    /// Moles shown since construction.
    pub fn reveals(&self) -> u64 {
        self.reveals
    }

    /// Hide handlers that actually ran since construction.
    pub fn hides_fired(&self) -> u64 {
        self.hides_fired
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the cycle and immediately reveal the first mole.
    pub fn start(
        &mut self,
        state: &mut GameState,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
    ) -> Result<Event, ValidationError> {
        if let Some(token) = self.token.take() {
            clock.cancel(token);
        }
        self.phase = RevealPhase::Armed;
        self.run_cycle(state, clock, presenter)
    }

    /// Body of the deferred hide for `position`.
    ///
    /// Pushes the hide event, and the next reveal if there is one, onto
    /// `events`.
    pub fn on_hide(
        &mut self,
        position: Position,
        state: &mut GameState,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
        events: &mut Vec<Event>,
    ) -> Result<HideOutcome, ValidationError> {
        self.token = None;
        self.hides_fired += 1;
        presenter.set_visible(position, false);
        self.phase = RevealPhase::Hidden;
        events.push(Event::MoleHidden {
            position,
            at_ms: clock.now_ms(),
        });

        if state.remaining_secs > 0 {
            events.push(self.run_cycle(state, clock, presenter)?);
            Ok(HideOutcome::Continue)
        } else {
            self.phase = RevealPhase::Stopped;
            debug!("reveal cycle found no time left");
            Ok(HideOutcome::TimeUp)
        }
    }

    /// Score the visible mole at `position`, at most once per reveal.
    pub fn try_whack(&mut self, position: Position) -> bool {
        if self.visible() == Some(position) && !self.whacked {
            self.whacked = true;
            true
        } else {
            false
        }
    }

    /// Cancel the pending hide and take down any visible mole directly.
    ///
    /// The cancelled hide handler never runs. Returns the `MoleHidden` event
    /// for the mole taken down, if one was up.
    pub fn stop(
        &mut self,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
    ) -> Option<Event> {
        if let Some(token) = self.token.take() {
            clock.cancel(token);
        }
        let hidden = self.visible().map(|position| {
            presenter.set_visible(position, false);
            Event::MoleHidden {
                position,
                at_ms: clock.now_ms(),
            }
        });
        self.phase = RevealPhase::Stopped;
        hidden
    }

    fn run_cycle(
        &mut self,
        state: &mut GameState,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
    ) -> Result<Event, ValidationError> {
        let delay_ms = set_delay(state.difficulty, &mut self.rng)?;
        let position = self
            .selector
            .choose_hole(&mut self.rng, &mut state.last_position)?;

        presenter.set_visible(position, true);
        self.phase = RevealPhase::Visible(position);
        self.whacked = false;
        self.reveals += 1;
        self.token = Some(clock.set_timeout(delay_ms, Deferred::HideMole { position }));

        debug!(%position, delay_ms, "mole shown");
        Ok(Event::MoleShown {
            position,
            delay_ms,
            at_ms: clock.now_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::presenter::RecordingPresenter;

    struct Rig {
        cycle: RevealCycle,
        state: GameState,
        clock: Clock<Deferred>,
        presenter: RecordingPresenter,
    }

    impl Rig {
        fn new(difficulty: Difficulty, remaining: u32) -> Self {
            let mut state = GameState::new(difficulty, remaining);
            state.running = true;
            Self {
                cycle: RevealCycle::new(HoleSelector::new(9).unwrap(), GameRng::seeded(8)),
                state,
                clock: Clock::new(),
                presenter: RecordingPresenter::new(),
            }
        }

        fn start(&mut self) -> Event {
            self.cycle
                .start(&mut self.state, &mut self.clock, &mut self.presenter)
                .unwrap()
        }

        fn run_until(&mut self, until: u64) -> (Vec<Event>, Option<HideOutcome>) {
            let mut events = Vec::new();
            let mut last = None;
            while let Some((token, action)) = self.clock.pop_due(until) {
                let Deferred::HideMole { position } = action else {
                    panic!("unexpected action {action:?}");
                };
                assert!(self.cycle.owns(token));
                last = Some(
                    self.cycle
                        .on_hide(
                            position,
                            &mut self.state,
                            &mut self.clock,
                            &mut self.presenter,
                            &mut events,
                        )
                        .unwrap(),
                );
            }
            self.clock.advance_to(until);
            (events, last)
        }
    }

    #[test]
    fn start_reveals_immediately() {
        let mut rig = Rig::new(Difficulty::Normal, 10);
        let event = rig.start();
        let Event::MoleShown { position, delay_ms, at_ms } = event else {
            panic!("expected MoleShown, got {event:?}");
        };
        assert_eq!(delay_ms, 1000);
        assert_eq!(at_ms, 0);
        assert_eq!(rig.cycle.phase(), RevealPhase::Visible(position));
        assert_eq!(rig.presenter.visible(), &[position]);
        assert_eq!(rig.state.last_position(), Some(position));
    }

    #[test]
    fn hide_reschedules_while_time_remains() {
        let mut rig = Rig::new(Difficulty::Easy, 10);
        rig.start();
        let (events, outcome) = rig.run_until(1_500);
        assert_eq!(outcome, Some(HideOutcome::Continue));
        assert!(matches!(events[0], Event::MoleHidden { at_ms: 1_500, .. }));
        assert!(matches!(events[1], Event::MoleShown { at_ms: 1_500, .. }));
        assert_eq!(rig.cycle.reveals(), 2);
        assert_eq!(rig.cycle.hides_fired(), 1);
        assert_eq!(rig.presenter.visible().len(), 1);
    }

    #[test]
    fn hide_with_no_time_left_stops() {
        let mut rig = Rig::new(Difficulty::Normal, 10);
        rig.start();
        rig.state.remaining_secs = 0;
        let (events, outcome) = rig.run_until(1_000);
        assert_eq!(outcome, Some(HideOutcome::TimeUp));
        assert_eq!(events.len(), 1);
        assert_eq!(rig.cycle.phase(), RevealPhase::Stopped);
        assert!(rig.presenter.visible().is_empty());
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn consecutive_reveals_use_different_holes() {
        let mut rig = Rig::new(Difficulty::Hard, 1_000);
        rig.start();
        let (events, _) = rig.run_until(200_000);
        let shown: Vec<Position> = events
            .iter()
            .filter_map(|e| match e {
                Event::MoleShown { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert!(shown.len() > 100);
        assert!(shown.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn stop_cancels_pending_hide() {
        let mut rig = Rig::new(Difficulty::Normal, 10);
        let Event::MoleShown { position, .. } = rig.start() else {
            panic!("expected MoleShown");
        };
        rig.clock.advance_to(400);
        let hidden = rig.cycle.stop(&mut rig.clock, &mut rig.presenter);
        assert_eq!(hidden, Some(Event::MoleHidden { position, at_ms: 400 }));
        assert_eq!(rig.cycle.stop(&mut rig.clock, &mut rig.presenter), None);
        let toggles = rig.presenter.visibility_toggles();
        let (events, outcome) = rig.run_until(60_000);
        assert!(events.is_empty());
        assert_eq!(outcome, None);
        assert_eq!(rig.cycle.hides_fired(), 0);
        assert_eq!(rig.presenter.visibility_toggles(), toggles);
        assert!(rig.presenter.visible().is_empty());
    }

    #[test]
    fn whack_scores_once_per_reveal() {
        let mut rig = Rig::new(Difficulty::Normal, 10);
        let Event::MoleShown { position, .. } = rig.start() else {
            panic!("expected MoleShown");
        };
        let other = rig
            .cycle
            .selector()
            .positions()
            .find(|p| *p != position)
            .unwrap();
        assert!(!rig.cycle.try_whack(other));
        assert!(rig.cycle.try_whack(position));
        assert!(!rig.cycle.try_whack(position));
    }
}
