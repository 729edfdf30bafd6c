use tracing::debug;

use super::{Deferred, GameState};
use crate::clock::{Clock, TimerToken};
use crate::events::Event;
use crate::presenter::Presenter;

/// Repeating one-per-interval countdown of the remaining game time.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    interval_ms: u64,
    token: Option<TimerToken>,
}

impl CountdownTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            token: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Whether `token` is the tick this timer currently has scheduled.
    pub fn owns(&self, token: TimerToken) -> bool {
        self.token == Some(token)
    }

    /// Set the remaining time to `initial` and begin ticking.
    ///
    /// A tick already scheduled by a previous start is cancelled first.
    pub fn start(
        &mut self,
        state: &mut GameState,
        initial: u32,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
    ) {
        self.stop(clock);
        state.remaining_secs = initial.min(state.duration_secs);
        presenter.publish_remaining_time(state.remaining_secs);
        self.token = Some(clock.set_interval(self.interval_ms, Deferred::CountdownTick));
    }

    /// One interval elapsed.
    ///
    /// Decrements and publishes while time remains; once it finds zero it
    /// cancels itself and reports [`Event::TimerExpired`].
    pub fn tick(
        &mut self,
        state: &mut GameState,
        clock: &mut Clock<Deferred>,
        presenter: &mut impl Presenter,
    ) -> Event {
        let at_ms = clock.now_ms();
        if state.remaining_secs > 0 {
            state.remaining_secs -= 1;
            presenter.publish_remaining_time(state.remaining_secs);
            debug!(remaining = state.remaining_secs, "countdown tick");
            Event::TimerTicked {
                remaining_secs: state.remaining_secs,
                at_ms,
            }
        } else {
            self.stop(clock);
            debug!("countdown expired");
            Event::TimerExpired { at_ms }
        }
    }

    /// Cancel the repeating tick. Returns `true` if one was pending.
    pub fn stop(&mut self, clock: &mut Clock<Deferred>) -> bool {
        match self.token.take() {
            Some(token) => clock.cancel(token),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::presenter::RecordingPresenter;

    fn fire_all(
        timer: &mut CountdownTimer,
        state: &mut GameState,
        clock: &mut Clock<Deferred>,
        presenter: &mut RecordingPresenter,
        until: u64,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some((token, action)) = clock.pop_due(until) {
            assert_eq!(action, Deferred::CountdownTick);
            assert!(timer.owns(token));
            events.push(timer.tick(state, clock, presenter));
        }
        clock.advance_to(until);
        events
    }

    #[test]
    fn counts_down_once_per_interval_then_cancels() {
        let mut state = GameState::new(Difficulty::Normal, 3);
        let mut clock = Clock::new();
        let mut presenter = RecordingPresenter::new();
        let mut timer = CountdownTimer::new(1000);

        timer.start(&mut state, 3, &mut clock, &mut presenter);
        assert_eq!(presenter.remaining_secs(), 3);

        let events = fire_all(&mut timer, &mut state, &mut clock, &mut presenter, 3_000);
        assert_eq!(events.len(), 3);
        assert_eq!(state.remaining_secs(), 0);
        assert!(timer.is_active());

        let events = fire_all(&mut timer, &mut state, &mut clock, &mut presenter, 4_000);
        assert!(matches!(events.as_slice(), [Event::TimerExpired { at_ms: 4_000 }]));
        assert!(!timer.is_active());

        assert!(fire_all(&mut timer, &mut state, &mut clock, &mut presenter, 60_000).is_empty());
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let mut state = GameState::new(Difficulty::Normal, 10);
        let mut clock = Clock::new();
        let mut presenter = RecordingPresenter::new();
        let mut timer = CountdownTimer::new(1000);

        timer.start(&mut state, 10, &mut clock, &mut presenter);
        assert!(timer.stop(&mut clock));
        assert!(!timer.stop(&mut clock));
        assert!(fire_all(&mut timer, &mut state, &mut clock, &mut presenter, 10_000).is_empty());
        assert_eq!(state.remaining_secs(), 10);
    }

    #[test]
    fn restart_replaces_previous_tick() {
        let mut state = GameState::new(Difficulty::Normal, 5);
        let mut clock = Clock::new();
        let mut presenter = RecordingPresenter::new();
        let mut timer = CountdownTimer::new(1000);

        timer.start(&mut state, 5, &mut clock, &mut presenter);
        timer.start(&mut state, 5, &mut clock, &mut presenter);
        assert_eq!(clock.pending(), 1);
        fire_all(&mut timer, &mut state, &mut clock, &mut presenter, 1_000);
        assert_eq!(state.remaining_secs(), 4);
    }
}
