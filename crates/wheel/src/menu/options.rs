use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Opaque identifier of one option, e.g. a camera mode or tool name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct OptionId(String);

padlink::impl_string_newtype!(OptionId);

/// One cyclable list. `None` marks an empty slot.
pub type OptionRow = Vec<Option<OptionId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

/// Finds the next filled slot from `from`, looking at most one lap ahead.
/// The starting slot is checked last, so a single filled slot stays put. A
/// row without any filled slot pins to 0.
pub fn scan(row: &[Option<OptionId>], from: usize, direction: CycleDirection) -> usize {
    let len = row.len();
    if len == 0 {
        return 0;
    }
    let from = from % len;

    (1..=len)
        .map(|step| match direction {
            CycleDirection::Forward => (from + step) % len,
            CycleDirection::Backward => (from + len - step) % len,
        })
        .find(|&i| row[i].is_some())
        .unwrap_or(0)
}

fn first_filled(row: &[Option<OptionId>]) -> usize {
    row.iter().position(Option::is_some).unwrap_or(0)
}

/// Option rows for every (category, segment) pair together with the slot
/// currently chosen in each.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionTable {
    rows: Vec<Vec<OptionRow>>,
    current: Vec<Vec<usize>>,
}

impl OptionTable {
    /// `rows[category][segment]` is the option list of that pair.
    pub fn new(rows: Vec<Vec<OptionRow>>) -> Self {
        let current = rows
            .iter()
            .map(|segments| segments.iter().map(|row| first_filled(row)).collect())
            .collect();
        Self { rows, current }
    }

    pub fn category_count(&self) -> usize {
        self.rows.len()
    }

    pub fn segment_count(&self, category: usize) -> usize {
        self.rows.get(category).map_or(0, Vec::len)
    }

    pub fn row(&self, category: usize, segment: usize) -> Option<&[Option<OptionId>]> {
        self.rows
            .get(category)
            .and_then(|c| c.get(segment))
            .map(Vec::as_slice)
    }

    pub fn current_index(&self, category: usize, segment: usize) -> Option<usize> {
        self.current
            .get(category)
            .and_then(|c| c.get(segment))
            .copied()
    }

    pub fn current_option(&self, category: usize, segment: usize) -> Option<&OptionId> {
        let index = self.current_index(category, segment)?;
        self.row(category, segment)?.get(index)?.as_ref()
    }

    /// Rows whose second slot is empty hold a single fixed option; renderers
    /// draw no cycle affordance for them.
    pub fn is_scrollable(&self, category: usize, segment: usize) -> bool {
        self.row(category, segment)
            .and_then(|row| row.get(1))
            .is_some_and(Option::is_some)
    }

    pub fn increment(&mut self, category: usize, segment: usize) -> Option<usize> {
        self.cycle(category, segment, CycleDirection::Forward)
    }

    pub fn decrement(&mut self, category: usize, segment: usize) -> Option<usize> {
        self.cycle(category, segment, CycleDirection::Backward)
    }

    /// Moves the chosen slot of one pair. Returns the new index, or `None`
    /// when the pair does not exist.
    pub fn cycle(
        &mut self,
        category: usize,
        segment: usize,
        direction: CycleDirection,
    ) -> Option<usize> {
        let row = self.rows.get(category)?.get(segment)?;
        let current = self.current.get_mut(category)?.get_mut(segment)?;
        *current = scan(row, *current, direction);
        Some(*current)
    }
}
