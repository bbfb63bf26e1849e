//! Pattern function library.
//!
//! Two mapping libraries share one contract: given a cell position, the grid,
//! the logical time and the configuration, produce a color and an alpha.
//!
//! - [`shapes`]: palette-driven patterns (noise, scrolling lines, radial shapes).
//!   Scrolling lines memoize per-cell colors in a [`CellMemo`].
//! - [`field`]: continuous two-color fields, recomputed every frame, no state.
//!
//! Patterns emit [`CellFill`]s through a callback; the frame renderer turns each
//! one into a `cell × cell` rectangle fill.

pub mod field;
pub mod memo;
pub mod shapes;

use std::fmt;
use std::str::FromStr;

use crate::coords::Viewport;
use crate::error::RenderError;
use crate::paint::Color;

pub use memo::CellMemo;

/// Which library a pattern belongs to; decides clip mask and background fill.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PatternFamily {
    /// Palette patterns painted inside a circular porthole over a background.
    Shapes,
    /// Full-surface two-color fields, no clip, no background.
    Field,
}

/// Selectable pattern kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PatternKind {
    Random,
    VerticalLines,
    RowLines,
    Diamond,
    Circle,
    Square,
    Wave,
    Ripple,
    Stripes,
    Dots,
    Vortex,
    Pulse,
    Checkerboard,
    PixelWave,
    Grain,
}

impl PatternKind {
    pub const ALL: [PatternKind; 15] = [
        PatternKind::Random,
        PatternKind::VerticalLines,
        PatternKind::RowLines,
        PatternKind::Diamond,
        PatternKind::Circle,
        PatternKind::Square,
        PatternKind::Wave,
        PatternKind::Ripple,
        PatternKind::Stripes,
        PatternKind::Dots,
        PatternKind::Vortex,
        PatternKind::Pulse,
        PatternKind::Checkerboard,
        PatternKind::PixelWave,
        PatternKind::Grain,
    ];

    /// Stable identifier used in configuration snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            PatternKind::Random => "random",
            PatternKind::VerticalLines => "vertical-line",
            PatternKind::RowLines => "row-line",
            PatternKind::Diamond => "diamond",
            PatternKind::Circle => "circle",
            PatternKind::Square => "square",
            PatternKind::Wave => "wave",
            PatternKind::Ripple => "ripple",
            PatternKind::Stripes => "stripes",
            PatternKind::Dots => "dots",
            PatternKind::Vortex => "vortex",
            PatternKind::Pulse => "pulse",
            PatternKind::Checkerboard => "checkerboard",
            PatternKind::PixelWave => "pixelWave",
            PatternKind::Grain => "grain",
        }
    }

    /// Human-readable label for selectors.
    pub const fn label(self) -> &'static str {
        match self {
            PatternKind::Random => "Random",
            PatternKind::VerticalLines => "Vertical Line",
            PatternKind::RowLines => "Horizontal Line",
            PatternKind::Diamond => "Diamond",
            PatternKind::Circle => "Circle",
            PatternKind::Square => "Square",
            PatternKind::Wave => "Wave",
            PatternKind::Ripple => "Ripple",
            PatternKind::Stripes => "Stripes",
            PatternKind::Dots => "Dots",
            PatternKind::Vortex => "Vortex",
            PatternKind::Pulse => "Pulse",
            PatternKind::Checkerboard => "Checkerboard",
            PatternKind::PixelWave => "Pixel Wave",
            PatternKind::Grain => "Grain",
        }
    }

    pub const fn family(self) -> PatternFamily {
        match self {
            PatternKind::Random
            | PatternKind::VerticalLines
            | PatternKind::RowLines
            | PatternKind::Diamond
            | PatternKind::Circle
            | PatternKind::Square => PatternFamily::Shapes,
            _ => PatternFamily::Field,
        }
    }

    /// Patterns that keep per-cell state across frames.
    pub const fn is_memoized(self) -> bool {
        matches!(self, PatternKind::VerticalLines | PatternKind::RowLines)
    }
}

impl FromStr for PatternKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| RenderError::UnknownPattern(s.to_string()))
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid laid over the surface. Never materialized; cells are addressed by index.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
    pub cell: f32,
}

impl Grid {
    /// Whole cells only: `floor(width / cell) × floor(height / cell)`.
    pub fn fit(viewport: Viewport, cell: f32) -> Self {
        Self::with(viewport, cell, f32::floor)
    }

    /// Covers the surface, including partial cells at the right/bottom edges.
    pub fn cover(viewport: Viewport, cell: f32) -> Self {
        Self::with(viewport, cell, f32::ceil)
    }

    fn with(viewport: Viewport, cell: f32, round: fn(f32) -> f32) -> Self {
        if !(cell > 0.0) || !viewport.is_valid() {
            return Self { cols: 0, rows: 0, cell };
        }
        Self {
            cols: round(viewport.width / cell) as u32,
            rows: round(viewport.height / cell) as u32,
            cell,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    #[inline]
    pub fn total_width(self) -> f32 {
        self.cols as f32 * self.cell
    }

    #[inline]
    pub fn total_height(self) -> f32 {
        self.rows as f32 * self.cell
    }

    /// Iterates `(x, y)` cell indices column-major, matching paint order.
    pub fn cells(self) -> impl Iterator<Item = (u32, u32)> {
        (0..self.cols).flat_map(move |x| (0..self.rows).map(move |y| (x, y)))
    }
}

/// One cell to paint: pixel origin of its top-left corner, color, alpha (0–255).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellFill {
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub alpha: f32,
}

impl CellFill {
    #[inline]
    pub const fn new(x: f32, y: f32, color: Color, alpha: f32) -> Self {
        Self { x, y, color, alpha }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in PatternKind::ALL {
            assert_eq!(kind.name().parse::<PatternKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            "nonexistent".parse::<PatternKind>(),
            Err(RenderError::UnknownPattern("nonexistent".into()))
        );
    }

    #[test]
    fn families() {
        assert_eq!(PatternKind::Diamond.family(), PatternFamily::Shapes);
        assert_eq!(PatternKind::PixelWave.family(), PatternFamily::Field);
        assert!(PatternKind::RowLines.is_memoized());
        assert!(!PatternKind::Random.is_memoized());
    }

    #[test]
    fn fit_floors_and_cover_ceils() {
        let vp = Viewport::new(405.0, 400.0);
        let fit = Grid::fit(vp, 10.0);
        assert_eq!((fit.cols, fit.rows), (40, 40));
        let cover = Grid::cover(vp, 10.0);
        assert_eq!((cover.cols, cover.rows), (41, 40));
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert!(Grid::fit(Viewport::new(400.0, 400.0), 0.0).is_empty());
        assert!(Grid::fit(Viewport::new(400.0, 400.0), f32::NAN).is_empty());
        assert!(Grid::fit(Viewport::new(5.0, 400.0), 10.0).is_empty());
    }

    #[test]
    fn cells_visits_every_index_once() {
        let grid = Grid::fit(Viewport::new(30.0, 20.0), 10.0);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells, [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }
}
