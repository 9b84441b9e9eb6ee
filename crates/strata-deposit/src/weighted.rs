//! Flat-expanded weighted selection.
//!
//! Each entry is repeated `weight` times in an index table, so a uniform draw
//! over the table selects entry `i` with probability `w_i / Σw` in O(1).

use crate::seed::DepositRandom;

/// Largest total weight a list can be drawn from.
pub const MAX_TOTAL_WEIGHT: u64 = i32::MAX as u64;

/// A list of alternatives selectable in proportion to integer weights.
#[derive(Clone, Debug)]
pub struct WeightedList<T> {
    entries: Vec<(T, u32)>,
    /// Entry indices, each repeated by its weight.
    expanded: Vec<usize>,
}

impl<T> WeightedList<T> {
    /// Build a list from `(entry, weight)` pairs. Zero-weight entries are kept
    /// but can never be selected.
    pub fn new(entries: impl IntoIterator<Item = (T, u32)>) -> Self {
        let entries: Vec<(T, u32)> = entries.into_iter().collect();
        let total: usize = entries.iter().map(|(_, w)| *w as usize).sum();
        let mut expanded = Vec::with_capacity(total);
        for (index, (_, weight)) in entries.iter().enumerate() {
            expanded.extend(std::iter::repeat_n(index, *weight as usize));
        }
        Self { entries, expanded }
    }

    /// Draw one entry. Returns its declared index and a reference to it, or
    /// `None` if the list has no selectable entries.
    pub fn pick(&self, rng: &mut DepositRandom) -> Option<(usize, &T)> {
        if self.expanded.is_empty() {
            return None;
        }
        let len = i32::try_from(self.expanded.len()).unwrap_or(i32::MAX);
        let slot = rng.next_int(len) as usize;
        let index = self.expanded[slot];
        Some((index, &self.entries[index].0))
    }

    /// Entries with their weights, in declared order.
    pub fn entries(&self) -> impl Iterator<Item = (&T, u32)> {
        self.entries.iter().map(|(e, w)| (e, *w))
    }

    /// Sum of all weights (the length of the expanded table).
    pub fn total_weight(&self) -> usize {
        self.expanded.len()
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl<T: Clone> WeightedList<T> {
    /// A new list holding only the entries accepted by `keep`, weights unchanged.
    pub fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        Self::new(
            self.entries
                .iter()
                .filter(|(e, _)| keep(e))
                .map(|(e, w)| (e.clone(), *w)),
        )
    }
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            expanded: Vec::new(),
        }
    }
}
