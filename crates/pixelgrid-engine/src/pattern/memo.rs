use std::collections::HashMap;

use crate::paint::Color;

/// Assign-once color/alpha cache for scrolling patterns.
///
/// Keyed by `(line index, orthogonal index)`. Line indices start at `-1` because
/// scrolling patterns paint one extra line on each side of the grid.
///
/// Owned by the frame renderer and cleared when the render session resets, never
/// per frame: a cell keeps its color while the pattern scrolls.
#[derive(Debug, Default)]
pub struct CellMemo {
    entries: HashMap<(i32, i32), (Color, f32)>,
}

impl CellMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry, computing and storing it on first visit.
    #[inline]
    pub fn get_or_assign(
        &mut self,
        key: (i32, i32),
        assign: impl FnOnce() -> (Color, f32),
    ) -> (Color, f32) {
        *self.entries.entry(key).or_insert_with(assign)
    }

    #[inline]
    pub fn get(&self, key: (i32, i32)) -> Option<(Color, f32)> {
        self.entries.get(&key).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
