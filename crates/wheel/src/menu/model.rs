use super::geometry::SegmentGeometry;
use super::idle::IdleTimeout;
use super::options::{CycleDirection, OptionId, OptionTable};
use super::selection::{SelectionChange, SelectionMachine, SelectionState};
use super::view::WheelView;
use crate::config::{CategoryName, Config, ConfigError};
use padlink::{PadCommand, StickVector};

/// The whole wheel: geometry, selection state and option rows. One instance
/// is owned by the frame loop and updated once per frame.
#[derive(Debug, Clone)]
pub struct Wheel {
    geometry: SegmentGeometry,
    machine: SelectionMachine,
    idle: IdleTimeout,
    options: OptionTable,
    categories: Vec<CategoryName>,
    state: SelectionState,
}

impl Wheel {
    pub fn new(
        geometry: SegmentGeometry,
        machine: SelectionMachine,
        idle: IdleTimeout,
        options: OptionTable,
        categories: Vec<CategoryName>,
        default_segment: Option<usize>,
    ) -> Self {
        let segment = default_segment.filter(|&i| i < geometry.len());
        Self {
            geometry,
            machine,
            idle,
            options,
            categories,
            state: SelectionState::new(0, segment),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let w = &config.wheel;

        Ok(Self::new(
            SegmentGeometry::new(w.segment_count, w.gap_degrees, w.layout())?,
            SelectionMachine::new(w.activation_threshold, w.intent_threshold),
            IdleTimeout::new(w.idle_timeout_secs),
            OptionTable::new(config.option_rows()),
            config.category_names(),
            w.default_segment,
        ))
    }

    /// Swaps in a new config. The category tab survives when it still
    /// exists; the segment selection does not.
    pub fn reload(&mut self, config: &Config) -> Result<(), ConfigError> {
        let mut next = Self::from_config(config)?;
        if self.state.category < next.categories.len() {
            next.state.category = self.state.category;
        }
        next.state.segment = None;
        *self = next;
        Ok(())
    }

    /// One frame: stick selection first, then the idle timeout unless the
    /// stick engaged a segment this frame.
    pub fn update(&mut self, stick: StickVector, fps: f64) -> SelectionChange {
        let change = self.machine.tick(stick, &mut self.state, &self.geometry);

        match change {
            SelectionChange::Selected {
                segment,
                fresh: true,
            } => log::debug!("Selected segment {}", segment),
            SelectionChange::Cleared => log::debug!("Selection cleared by opposite stick"),
            _ => {}
        }
        if change.engaged() {
            return change;
        }

        if self.idle.advance(&mut self.state, fps) {
            log::debug!("Selection expired after {}s idle", self.idle.budget_secs);
            return SelectionChange::Cleared;
        }
        change
    }

    /// Applies a button or socket command. Returns true when anything
    /// visible changed.
    pub fn apply(&mut self, cmd: PadCommand) -> bool {
        match cmd {
            PadCommand::NextCategory => self.switch_category(1),
            PadCommand::PreviousCategory => self.switch_category(-1),
            PadCommand::NextOption => self.cycle_selected(CycleDirection::Forward),
            PadCommand::PreviousOption => self.cycle_selected(CycleDirection::Backward),
        }
    }

    fn switch_category(&mut self, step: isize) -> bool {
        let count = self.categories.len();
        if count == 0 {
            return false;
        }

        let next = (self.state.category as isize + step).rem_euclid(count as isize) as usize;
        let changed = next != self.state.category || self.state.segment.is_some();
        self.state.category = next;
        self.state.clear();

        log::debug!("Category {} ({})", next, self.categories[next]);
        changed
    }

    fn cycle_selected(&mut self, direction: CycleDirection) -> bool {
        let Some(segment) = self.state.segment else {
            return false;
        };
        let category = self.state.category;
        let before = self.options.current_index(category, segment);
        let after = self.options.cycle(category, segment, direction);

        if let Some(option) = self.options.current_option(category, segment) {
            log::debug!("Segment {} option: {}", segment, option);
        }
        before != after
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn geometry(&self) -> &SegmentGeometry {
        &self.geometry
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn categories(&self) -> &[CategoryName] {
        &self.categories
    }

    pub fn category_name(&self) -> Option<&CategoryName> {
        self.categories.get(self.state.category)
    }

    pub fn selected_option(&self) -> Option<&OptionId> {
        let segment = self.state.segment?;
        self.options.current_option(self.state.category, segment)
    }

    pub fn view(&self) -> WheelView {
        WheelView::capture(self)
    }
}
