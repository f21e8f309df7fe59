use crate::menu::{FRAME_RATE, MIN_FRAME_RATE};
use std::time::{Duration, Instant};

const SMOOTHING: f64 = 0.1;

/// Paces the frame loop and reports the frame rate actually achieved, which
/// is what the idle timeout scales by.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target: Duration,
    max_delta: Duration,
    last: Option<Instant>,
    fps: f64,
}

impl FrameClock {
    pub fn new(target_fps: f64) -> Self {
        let target_fps = if target_fps.is_finite() && target_fps >= MIN_FRAME_RATE {
            target_fps
        } else {
            log::warn!("Frame rate {} out of range, using {}", target_fps, FRAME_RATE);
            FRAME_RATE
        };
        let target = Duration::from_secs_f64(1.0 / target_fps);
        Self {
            target,
            // a stalled frame (debugger, suspend) should not crater the estimate
            max_delta: target * 4,
            last: None,
            fps: target_fps,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Marks the start of a frame and folds its delta into the estimate.
    pub fn record(&mut self, now: Instant) -> f64 {
        if let Some(last) = self.last {
            let delta = now.saturating_duration_since(last).min(self.max_delta);
            if !delta.is_zero() {
                let instant = 1.0 / delta.as_secs_f64();
                self.fps += (instant - self.fps) * SMOOTHING;
            }
        }
        self.last = Some(now);
        self.fps
    }

    /// Time left in the frame that started at `frame_start`.
    pub fn remaining(&self, frame_start: Instant, now: Instant) -> Duration {
        (frame_start + self.target).saturating_duration_since(now)
    }

    pub fn sleep_until_next(&self, frame_start: Instant) {
        let left = self.remaining(frame_start, Instant::now());
        if !left.is_zero() {
            std::thread::sleep(left);
        }
    }
}
