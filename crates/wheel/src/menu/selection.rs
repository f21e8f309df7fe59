use super::angle;
use super::geometry::SegmentGeometry;
use padlink::StickVector;

/// Everything the core mutates each frame. Renderers only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub category: usize,
    pub segment: Option<usize>,
    pub idle_frames: u32,
}

impl SelectionState {
    pub fn new(category: usize, segment: Option<usize>) -> Self {
        Self {
            category,
            segment,
            idle_frames: 0,
        }
    }

    pub fn clear(&mut self) {
        self.segment = None;
        self.idle_frames = 0;
    }

    pub fn select(&mut self, index: usize) {
        self.segment = Some(index);
        self.idle_frames = 0;
    }
}

/// Result of one tick, so the host knows whether anything needs redrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// A full deflection landed on `segment`. `fresh` is false when it was
    /// already selected; the idle counter restarts either way.
    Selected { segment: usize, fresh: bool },
    Cleared,
    Unchanged,
}

impl SelectionChange {
    pub fn should_redraw(&self) -> bool {
        match self {
            Self::Selected { fresh, .. } => *fresh,
            Self::Cleared => true,
            Self::Unchanged => false,
        }
    }

    pub fn engaged(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }
}

/// Hysteretic segment selector. A selection is only made at nearly full
/// deflection; it is only dropped by pointing at the opposite side while
/// partially deflected. Letting the stick drift back to center keeps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionMachine {
    pub activation_threshold: f64,
    pub intent_threshold: f64,
}

impl SelectionMachine {
    pub fn new(activation_threshold: f64, intent_threshold: f64) -> Self {
        Self {
            activation_threshold,
            intent_threshold,
        }
    }

    pub fn tick(
        &self,
        stick: StickVector,
        state: &mut SelectionState,
        geometry: &SegmentGeometry,
    ) -> SelectionChange {
        let magnitude = stick.magnitude();

        // dead zone: no meaningful angle
        if magnitude < self.intent_threshold {
            return SelectionChange::Unchanged;
        }

        let deg = angle::map_angle(stick);

        if magnitude >= self.activation_threshold {
            return match geometry.segment_at(deg) {
                Some(index) => {
                    let fresh = state.segment != Some(index);
                    state.select(index);
                    SelectionChange::Selected {
                        segment: index,
                        fresh,
                    }
                }
                None => SelectionChange::Unchanged,
            };
        }

        match state.segment.and_then(|i| geometry.opposite(i)) {
            Some(opposite) if opposite.contains(deg) => {
                state.clear();
                SelectionChange::Cleared
            }
            _ => SelectionChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::angle::stick_toward;
    use crate::menu::geometry::{Layout, Point};
    use crate::menu::{ACTIVATION_THRESHOLD, INTENT_THRESHOLD};

    fn geometry() -> SegmentGeometry {
        SegmentGeometry::new(
            8,
            2.0,
            Layout {
                center: Point::new(400.0, 300.0),
                base_radius: 200.0,
                inner_radius_factor: 0.35,
                outer_radius_factor: 1.0,
            },
        )
        .unwrap()
    }

    fn machine() -> SelectionMachine {
        SelectionMachine::new(ACTIVATION_THRESHOLD, INTENT_THRESHOLD)
    }

    fn mid(geo: &SegmentGeometry, index: usize) -> f64 {
        geo.segment(index).unwrap().arc.bisector()
    }

    #[test]
    fn test_partial_deflection_never_selects() {
        let geo = geometry();
        let mut state = SelectionState::default();
        for i in 0..360 {
            let change = machine().tick(stick_toward(i as f64, 0.5), &mut state, &geo);
            assert_eq!(change, SelectionChange::Unchanged);
        }
        assert_eq!(state.segment, None);
    }

    #[test]
    fn test_full_deflection_selects() {
        let geo = geometry();
        let mut state = SelectionState::default();
        let change = machine().tick(stick_toward(mid(&geo, 3), 0.99), &mut state, &geo);
        assert_eq!(
            change,
            SelectionChange::Selected {
                segment: 3,
                fresh: true
            }
        );
        assert_eq!(state.segment, Some(3));
        assert!(change.engaged());

        // holding it re-engages without asking for a redraw
        let held = machine().tick(stick_toward(mid(&geo, 3), 0.99), &mut state, &geo);
        assert!(held.engaged());
        assert!(!held.should_redraw());
    }

    #[test]
    fn test_only_selection_engages() {
        assert!(!SelectionChange::Cleared.engaged());
        assert!(!SelectionChange::Unchanged.engaged());
    }

    #[test]
    fn test_no_flicker_when_easing_off() {
        let geo = geometry();
        let mut state = SelectionState::default();
        machine().tick(stick_toward(mid(&geo, 3), 0.99), &mut state, &geo);

        let change = machine().tick(stick_toward(mid(&geo, 3), 0.5), &mut state, &geo);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(state.segment, Some(3));

        // neighbors at partial deflection do not steal the selection either
        machine().tick(stick_toward(mid(&geo, 4), 0.5), &mut state, &geo);
        machine().tick(stick_toward(mid(&geo, 2), 0.5), &mut state, &geo);
        assert_eq!(state.segment, Some(3));

        // back to center
        machine().tick(StickVector::default(), &mut state, &geo);
        assert_eq!(state.segment, Some(3));
    }

    #[test]
    fn test_pointing_opposite_clears() {
        let geo = geometry();
        let mut state = SelectionState::default();
        machine().tick(stick_toward(mid(&geo, 3), 0.99), &mut state, &geo);

        let change = machine().tick(stick_toward(mid(&geo, 7), 0.5), &mut state, &geo);
        assert_eq!(change, SelectionChange::Cleared);
        assert_eq!(state.segment, None);
    }

    #[test]
    fn test_opposite_below_intent_threshold_keeps_selection() {
        let geo = geometry();
        let mut state = SelectionState::default();
        machine().tick(stick_toward(mid(&geo, 3), 0.99), &mut state, &geo);
        machine().tick(stick_toward(mid(&geo, 7), 0.2), &mut state, &geo);
        assert_eq!(state.segment, Some(3));
    }

    #[test]
    fn test_top_segment_cleared_across_seam() {
        let geo = geometry();
        let mut state = SelectionState::default();
        machine().tick(stick_toward(180.0, 1.0), &mut state, &geo);
        assert_eq!(state.segment, Some(4));

        // straight down, slightly left of the 0° seam
        machine().tick(stick_toward(358.0, 0.6), &mut state, &geo);
        assert_eq!(state.segment, None);

        machine().tick(stick_toward(180.0, 1.0), &mut state, &geo);
        machine().tick(stick_toward(3.0, 0.6), &mut state, &geo);
        assert_eq!(state.segment, None);
    }

    #[test]
    fn test_full_deflection_switches_segments() {
        let geo = geometry();
        let mut state = SelectionState::default();
        machine().tick(stick_toward(mid(&geo, 3), 1.0), &mut state, &geo);
        let change = machine().tick(stick_toward(mid(&geo, 4), 1.0), &mut state, &geo);
        assert!(change.should_redraw());
        assert_eq!(state.segment, Some(4));
    }

    #[test]
    fn test_reselect_resets_idle_counter() {
        let geo = geometry();
        let mut state = SelectionState::new(0, Some(3));
        state.idle_frames = 42;
        let change = machine().tick(stick_toward(mid(&geo, 3), 1.0), &mut state, &geo);
        assert_eq!(
            change,
            SelectionChange::Selected {
                segment: 3,
                fresh: false
            }
        );
        assert!(!change.should_redraw());
        assert_eq!(state.idle_frames, 0);
    }

    #[test]
    fn test_full_deflection_into_gap_is_ignored() {
        let geo = geometry();
        let mut state = SelectionState::new(0, Some(1));
        let change = machine().tick(stick_toward(22.5, 1.0), &mut state, &geo);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(state.segment, Some(1));
    }
}
