use super::CYCLE_HINT_MARGIN;
use super::angle::Arc;
use super::geometry::Point;
use super::model::Wheel;
use super::options::OptionId;
use crate::config::CategoryName;
use std::fmt;

/// What a renderer needs for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    pub index: usize,
    pub arc: Arc,
    pub centroid: Point,
    pub option: Option<OptionId>,
    pub option_index: usize,
    pub scrollable: bool,
    pub highlighted: bool,
}

/// Read-only snapshot of the wheel for one frame. Everything is taken from
/// the wheel's geometry and option table; renderers should not derive
/// angles of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelView {
    pub category: usize,
    pub category_name: Option<CategoryName>,
    pub selected: Option<usize>,
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub segments: Vec<SegmentView>,
    /// Where the LT/RT hint goes for a selected, scrollable segment.
    pub cycle_hint: Option<Point>,
}

impl WheelView {
    pub fn capture(wheel: &Wheel) -> Self {
        let state = wheel.state();
        let geometry = wheel.geometry();
        let options = wheel.options();

        let segments = geometry
            .segments()
            .iter()
            .map(|s| SegmentView {
                index: s.index,
                arc: s.arc,
                centroid: s.centroid,
                option: options.current_option(state.category, s.index).cloned(),
                option_index: options.current_index(state.category, s.index).unwrap_or(0),
                scrollable: options.is_scrollable(state.category, s.index),
                highlighted: state.segment == Some(s.index),
            })
            .collect::<Vec<_>>();

        let cycle_hint = state
            .segment
            .filter(|&i| options.is_scrollable(state.category, i))
            .and_then(|i| geometry.cycle_hint_anchor(i, CYCLE_HINT_MARGIN));

        Self {
            category: state.category,
            category_name: wheel.category_name().cloned(),
            selected: state.segment,
            center: geometry.center(),
            inner_radius: geometry.inner_radius(),
            outer_radius: geometry.outer_radius(),
            segments,
            cycle_hint,
        }
    }

    pub fn selected_segment(&self) -> Option<&SegmentView> {
        self.selected.and_then(|i| self.segments.get(i))
    }
}

impl fmt::Display for WheelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category_name {
            Some(name) => write!(f, "[{}]", name)?,
            None => write!(f, "[#{}]", self.category)?,
        }

        match self.selected_segment() {
            Some(seg) => {
                write!(f, " segment {}", seg.index)?;
                match &seg.option {
                    Some(opt) => write!(f, ": {}", opt)?,
                    None => write!(f, ": (empty)")?,
                }
                if seg.scrollable {
                    write!(f, " <LT/RT>")?;
                }
                Ok(())
            }
            None => write!(f, " no selection"),
        }
    }
}
