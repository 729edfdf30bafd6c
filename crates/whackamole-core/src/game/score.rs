use serde::Serialize;

use crate::presenter::Presenter;

/// Point total for the current game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreTracker {
    points: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Add exactly one point and publish the total.
    pub fn increment(&mut self, presenter: &mut impl Presenter) -> u32 {
        self.points = self.points.saturating_add(1);
        presenter.publish_score(self.points);
        self.points
    }

    pub fn reset(&mut self, presenter: &mut impl Presenter) -> u32 {
        self.points = 0;
        presenter.publish_score(self.points);
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;

    #[test]
    fn k_increments_after_reset_yield_k() {
        let mut presenter = RecordingPresenter::new();
        for k in [0u32, 1, 100] {
            let mut score = ScoreTracker::new();
            score.increment(&mut presenter);
            score.reset(&mut presenter);
            for _ in 0..k {
                score.increment(&mut presenter);
            }
            assert_eq!(score.points(), k);
            assert_eq!(presenter.score(), k);
        }
    }

    #[test]
    fn every_change_is_published() {
        let mut presenter = RecordingPresenter::new();
        let mut score = ScoreTracker::new();
        score.reset(&mut presenter);
        score.reset(&mut presenter);
        score.increment(&mut presenter);
        assert_eq!(presenter.calls().len(), 3);
        assert_eq!(presenter.score(), 1);
    }
}
