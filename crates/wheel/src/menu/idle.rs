use super::selection::SelectionState;

/// Expires a selection nobody is actively holding. The budget is counted in
/// frames at the reported frame rate, so it drifts with uneven frame pacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleTimeout {
    pub budget_secs: f64,
}

impl IdleTimeout {
    pub fn new(budget_secs: f64) -> Self {
        Self { budget_secs }
    }

    pub fn budget_frames(&self, fps: f64) -> f64 {
        fps * self.budget_secs
    }

    /// Counts one idle frame. Returns true when this frame expired the
    /// selection.
    pub fn advance(&self, state: &mut SelectionState, fps: f64) -> bool {
        if state.segment.is_none() {
            return false;
        }

        state.idle_frames = state.idle_frames.saturating_add(1);
        if f64::from(state.idle_frames) > self.budget_frames(fps) {
            state.clear();
            return true;
        }
        false
    }
}
