//! Session bookkeeping stored on the engine, not as ECS entities.

use tankfall_core::state::ScoreView;

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: u64,
    pub kills: u32,
    pub power_ups_delivered: u32,
    pub power_ups_collected: u32,
    /// Time the tank has been alive in an active session.
    pub survival_ms: f64,
}

impl ScoreState {
    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            kills: self.kills,
            power_ups_delivered: self.power_ups_delivered,
            power_ups_collected: self.power_ups_collected,
            survival_secs: self.survival_ms / 1000.0,
        }
    }
}
