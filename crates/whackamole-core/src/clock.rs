//! Cooperative single-threaded clock.
//!
//! The clock is a deferred-action queue. It never sleeps and owns no thread:
//! the caller moves time forward with [`Clock::pop_due`] and
//! [`Clock::advance_to`], either from wall time (the terminal front end) or
//! in large simulated jumps (tests and the simulation harness).
//!
//! ## Ordering
//!
//! Actions fire in deadline order. Equal deadlines fire in the order they
//! were scheduled; a repeating action counts as rescheduled at the moment
//! it fires.
//!
//! ## Cancellation
//!
//! Every scheduled action gets a [`TimerToken`]. Cancelling a token removes
//! the action for good: it is never returned by `pop_due` again, even if its
//! deadline has already elapsed.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

/// Handle to a scheduled timeout or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Scheduled<T> {
    action: T,
    /// `Some` for repeating actions.
    interval_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Clock<T> {
    now_ms: u64,
    next_seq: u64,
    next_token: u64,
    /// (deadline, sequence, token); stale entries are skipped lazily.
    queue: BinaryHeap<Reverse<(u64, u64, TimerToken)>>,
    live: HashMap<TimerToken, Scheduled<T>>,
}

impl<T> Default for Clock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clock<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            next_token: 0,
            queue: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current clock time in milliseconds since the clock was created.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_scheduled(&self, token: TimerToken) -> bool {
        self.live.contains_key(&token)
    }

    /// Number of live (uncancelled) actions.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Earliest deadline among live actions.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|Reverse((_, _, token))| self.live.contains_key(token))
            .map(|Reverse((deadline, _, _))| *deadline)
            .min()
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Run `action` once, `delay_ms` from now.
    pub fn set_timeout(&mut self, delay_ms: u64, action: T) -> TimerToken {
        self.schedule(delay_ms, action, None)
    }

    /// Run `action` every `interval_ms`, first firing one interval from now.
    pub fn set_interval(&mut self, interval_ms: u64, action: T) -> TimerToken {
        let interval_ms = interval_ms.max(1);
        self.schedule(interval_ms, action, Some(interval_ms))
    }

    /// Cancel a pending action. Returns `false` if it already fired (for a
    /// timeout) or was cancelled before.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.live.remove(&token).is_some()
    }

    /// Move time forward without firing anything. Time never goes backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn schedule(&mut self, delay_ms: u64, action: T, interval_ms: Option<u64>) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let deadline = self.now_ms.saturating_add(delay_ms);
        self.push(deadline, token);
        self.live.insert(token, Scheduled { action, interval_ms });
        token
    }

    fn push(&mut self, deadline: u64, token: TimerToken) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse((deadline, seq, token)));
    }
}

impl<T: Clone> Clock<T> {
    /// Pop the next action whose deadline is at or before `until_ms`,
    /// moving the clock to that deadline.
    ///
    /// Timeouts are consumed; intervals are re-armed one interval after the
    /// deadline that just elapsed. Call repeatedly until `None`, then
    /// [`Clock::advance_to`] the target time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerToken, T)> {
        loop {
            let &Reverse((deadline, _, token)) = self.queue.peek()?;
            if deadline > until_ms {
                return None;
            }
            self.queue.pop();

            let Some(entry) = self.live.get(&token) else {
                continue;
            };
            let action = entry.action.clone();
            let interval_ms = entry.interval_ms;

            self.now_ms = self.now_ms.max(deadline);
            match interval_ms {
                Some(interval) => self.push(deadline.saturating_add(interval), token),
                None => {
                    self.live.remove(&token);
                }
            }
            return Some((token, action));
        }
    }
}
