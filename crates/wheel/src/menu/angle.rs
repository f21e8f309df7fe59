//! Compass angles for the wheel.
//!
//! All angles are degrees in `[0, 360)` with 0° pointing straight down from
//! the wheel center, 90° right, 180° up and 270° left. Stick vectors and
//! screen points share the same axes (y grows downward), so the mapping works
//! for both.

use padlink::StickVector;

pub const FULL_TURN: f64 = 360.0;

pub fn normalize(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Maps a stick vector of any nonzero magnitude onto the wheel's compass.
/// The caller decides whether the stick is deflected far enough to mean
/// anything.
pub fn map_angle(stick: StickVector) -> f64 {
    let mut raw = stick.y.atan2(stick.x).to_degrees() - 90.0;
    if raw < 0.0 {
        raw += FULL_TURN;
    }
    normalize((FULL_TURN - raw).abs())
}

/// Unit direction for a compass angle, in screen axes.
pub fn direction(deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (rad.sin(), rad.cos())
}

/// Stick vector pointing at `deg` with the given deflection.
pub fn stick_toward(deg: f64, magnitude: f64) -> StickVector {
    let (dx, dy) = direction(deg);
    StickVector::new(dx * magnitude, dy * magnitude)
}

/// A closed-open arc `[start, end)` on the compass, stored normalized. An
/// arc whose start lies past its end runs through 0°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub start: f64,
    pub end: f64,
}

impl Arc {
    /// Builds an arc from unnormalized bounds, e.g. `[-21.5, 21.5]`.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: normalize(start),
            end: normalize(end),
        }
    }

    pub fn wraps_through_zero(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, deg: f64) -> bool {
        let deg = normalize(deg);
        if self.wraps_through_zero() {
            deg >= self.start || deg < self.end
        } else {
            deg >= self.start && deg < self.end
        }
    }

    pub fn rotated(&self, by: f64) -> Self {
        Self::new(self.start + by, self.end + by)
    }

    pub fn opposite(&self) -> Self {
        self.rotated(FULL_TURN / 2.0)
    }

    pub fn width(&self) -> f64 {
        (self.end - self.start).rem_euclid(FULL_TURN)
    }

    pub fn bisector(&self) -> f64 {
        normalize(self.start + self.width() / 2.0)
    }
}
