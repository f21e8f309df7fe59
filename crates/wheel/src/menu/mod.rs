pub mod angle;
pub mod geometry;
pub mod idle;
pub mod model;
pub mod options;
pub mod selection;
pub mod view;

pub use geometry::{Layout, Point, Segment, SegmentGeometry};
pub use idle::IdleTimeout;
pub use model::Wheel;
pub use options::{CycleDirection, OptionId, OptionRow, OptionTable};
pub use selection::{SelectionChange, SelectionMachine, SelectionState};
pub use view::{SegmentView, WheelView};

pub const SEGMENT_COUNT: usize = 8;
pub const GAP_DEGREES: f64 = 2.0; // dead angle between neighbouring segments
pub const ACTIVATION_THRESHOLD: f64 = 0.95; // deflection needed to select
pub const INTENT_THRESHOLD: f64 = 0.35; // below this the stick angle is noise
pub const IDLE_TIMEOUT_SECS: f64 = 1.5;
pub const FRAME_RATE: f64 = 60.0;
pub const MIN_FRAME_RATE: f64 = 1.0;
pub const CENTROID_RADIUS_FACTOR: f64 = 0.8; // icon orbit, relative to outer radius
pub const CYCLE_HINT_MARGIN: f64 = 24.0; // LT/RT hint distance outside the ring
