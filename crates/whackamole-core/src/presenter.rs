use serde::{Deserialize, Serialize};

use crate::selector::Position;

/// Display side of the game.
///
/// The core never draws anything itself. Front ends implement this trait
/// and receive every visible change; all methods default to no-ops.
pub trait Presenter {
    /// Show or hide the mole at `position`.
    fn set_visible(&mut self, _position: Position, _visible: bool) {}

    fn publish_score(&mut self, _score: u32) {}

    /// Remaining game time in seconds.
    fn publish_remaining_time(&mut self, _secs: u32) {}

    /// Availability and caption of the start control.
    fn set_start_trigger(&mut self, _enabled: bool, _label: &str) {}
}

/// A presenter that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PresenterCall {
    SetVisible { position: Position, visible: bool },
    Score { score: u32 },
    RemainingTime { secs: u32 },
    StartTrigger { enabled: bool, label: String },
}

/// Records every call and tracks the resulting display state.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    calls: Vec<PresenterCall>,
    visible: Vec<Position>,
    score: u32,
    remaining_secs: u32,
    trigger_enabled: bool,
    trigger_label: String,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self {
            trigger_enabled: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Positions currently shown, in the order they were revealed.
    pub fn visible(&self) -> &[Position] {
        &self.visible
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn trigger_label(&self) -> &str {
        &self.trigger_label
    }

    /// Number of `set_visible` calls so far.
    pub fn visibility_toggles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PresenterCall::SetVisible { .. }))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn set_visible(&mut self, position: Position, visible: bool) {
        self.visible.retain(|p| *p != position);
        if visible {
            self.visible.push(position);
        }
        self.calls.push(PresenterCall::SetVisible { position, visible });
    }

    fn publish_score(&mut self, score: u32) {
        self.score = score;
        self.calls.push(PresenterCall::Score { score });
    }

    fn publish_remaining_time(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.calls.push(PresenterCall::RemainingTime { secs });
    }

    fn set_start_trigger(&mut self, enabled: bool, label: &str) {
        self.trigger_enabled = enabled;
        self.trigger_label = label.to_string();
        self.calls.push(PresenterCall::StartTrigger {
            enabled,
            label: label.to_string(),
        });
    }
}
