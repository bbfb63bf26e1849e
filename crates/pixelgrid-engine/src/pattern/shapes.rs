//! Palette-driven ("discrete shapes") pattern library.
//!
//! Alpha values are on the 0–255 scale. Where a pattern "sparkles", alpha is drawn
//! uniformly from `[alpha_floor, 255]` on every visit, so frame content is not
//! reproducible; only colors are deterministic.

use rand::Rng;

use crate::coords::{Vec2, Viewport};
use crate::paint::{Color, palette_index_by_ratio};

use super::{CellFill, CellMemo, Grid};

/// Scroll speed of line patterns, in pixels per unit of logical time.
pub const SCROLL_SPEED: f32 = 50.0;

/// Amplitude of the shared drift of radial shapes, in pixels.
pub const SHAPE_DRIFT: f32 = 50.0;

/// Inner cells farther than this from a shape's center sparkle.
pub const SPARKLE_RADIUS: f32 = 40.0;

/// Subtracted from diamond/circle distances before the palette lookup.
pub const CORE_OFFSET: f32 = 30.0;

/// Per-frame inputs shared by every shapes pattern.
#[derive(Debug, Copy, Clone)]
pub struct ShapeCtx<'a> {
    pub viewport: Viewport,
    pub grid: Grid,
    pub time: f32,
    pub palette: &'a [Color],
    pub alpha_floor: f32,
    pub content_size: f32,
}

/// Random alpha in `[floor, 255]`.
#[inline]
pub fn jitter_alpha<R: Rng + ?Sized>(rng: &mut R, floor: f32) -> f32 {
    let floor = if floor.is_nan() { 0.0 } else { floor.clamp(0.0, 255.0) };
    if floor >= 255.0 {
        255.0
    } else {
        rng.gen_range(floor..=255.0)
    }
}

// ── random noise ──────────────────────────────────────────────────────────

/// Noise phase in `[-1, 1]` for cell `(x, y)` at time `t`.
#[inline]
pub fn noise_phase(x: u32, y: u32, t: f32) -> f32 {
    ((x as f32 * 0.1 + t).sin() + (y as f32 * 0.1 + t).cos()) * 0.5
}

/// Palette index of the noise pattern. Deterministic in `(x, y, t, len)`.
#[inline]
pub fn noise_index(x: u32, y: u32, t: f32, len: usize) -> usize {
    palette_index_by_ratio(len, (noise_phase(x, y, t) + 1.0) * 0.5)
}

pub fn random_noise<R, F>(ctx: &ShapeCtx<'_>, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    if ctx.palette.is_empty() {
        return;
    }
    let cell = ctx.grid.cell;
    for (x, y) in ctx.grid.cells() {
        let color = ctx.palette[noise_index(x, y, ctx.time, ctx.palette.len())];
        let alpha = jitter_alpha(rng, ctx.alpha_floor);
        emit(CellFill::new(x as f32 * cell, y as f32 * cell, color, alpha));
    }
}

// ── scrolling lines ───────────────────────────────────────────────────────

/// Scroll position in `[0, total)` at time `t`. Zero when `total` is not positive.
#[inline]
pub fn scroll_offset(t: f32, total: f32) -> f32 {
    if total > 0.0 { (t * SCROLL_SPEED).rem_euclid(total) } else { 0.0 }
}

/// Color of vertical line `col` (starting at -1).
///
/// Walks the palette forward, then backward, alternating every `len` lines so
/// neighbouring bands mirror each other.
pub fn vertical_line_color(palette: &[Color], col: i32) -> Color {
    let len = palette.len() as i32;
    let n = col + 1;
    let index = n.rem_euclid(len);
    if n.div_euclid(len).rem_euclid(2) == 1 {
        palette[(len - 1 - index) as usize]
    } else {
        palette[index as usize]
    }
}

/// Color of horizontal line `row` (starting at -1).
pub fn row_line_color(palette: &[Color], row: i32) -> Color {
    let len = palette.len() as i32;
    let index = (row % len).abs();
    if (row.abs() / len) % 2 == 1 {
        palette[(len - 1 - index) as usize]
    } else {
        palette[index as usize]
    }
}

/// Position of line `i` after scrolling by `offset`, wrapped into `[0, total)`.
#[inline]
fn wrap(i: i32, cell: f32, offset: f32, total: f32) -> f32 {
    (i as f32 * cell - offset + total * 2.0).rem_euclid(total)
}

/// Shift of the duplicate drawn next to the seam, if `pos` touches it.
#[inline]
pub fn seam_twin(pos: f32, cell: f32, total: f32) -> Option<f32> {
    if pos < cell {
        Some(total)
    } else if pos > total - cell {
        Some(-total)
    } else {
        None
    }
}

/// Columns scrolling horizontally with toroidal wraparound.
pub fn vertical_lines<R, F>(ctx: &ShapeCtx<'_>, memo: &mut CellMemo, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    let grid = ctx.grid;
    if grid.is_empty() || ctx.palette.is_empty() {
        return;
    }
    let cell = grid.cell;
    let total = grid.total_width();
    let offset = scroll_offset(ctx.time, total);

    for i in -1..=grid.cols as i32 + 1 {
        let cx = wrap(i, cell, offset, total);
        for row in 0..grid.rows as i32 {
            let cy = row as f32 * cell;
            let (color, alpha) = memo.get_or_assign((i, row), || {
                (vertical_line_color(ctx.palette, i), jitter_alpha(rng, ctx.alpha_floor))
            });

            emit(CellFill::new(cx, cy, color, alpha));
            if let Some(dx) = seam_twin(cx, cell, total) {
                emit(CellFill::new(cx + dx, cy, color, alpha));
            }
        }
    }
}

/// Rows scrolling vertically with toroidal wraparound.
pub fn row_lines<R, F>(ctx: &ShapeCtx<'_>, memo: &mut CellMemo, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    let grid = ctx.grid;
    if grid.is_empty() || ctx.palette.is_empty() {
        return;
    }
    let cell = grid.cell;
    let total = grid.total_height();
    let offset = scroll_offset(ctx.time, total);

    for i in -1..=grid.rows as i32 + 1 {
        let cy = wrap(i, cell, offset, total);
        for col in 0..grid.cols as i32 {
            let cx = col as f32 * cell;
            let (color, alpha) = memo.get_or_assign((i, col), || {
                (row_line_color(ctx.palette, i), jitter_alpha(rng, ctx.alpha_floor))
            });

            emit(CellFill::new(cx, cy, color, alpha));
            if let Some(dy) = seam_twin(cy, cell, total) {
                emit(CellFill::new(cx, cy + dy, color, alpha));
            }
        }
    }
}

// ── radial shapes ─────────────────────────────────────────────────────────

/// Distance metric of a radial shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeKind {
    /// L1 distance.
    Diamond,
    /// Euclidean distance.
    Circle,
    /// Chebyshev distance with an axis-aligned bound test.
    Square,
}

impl ShapeKind {
    #[inline]
    pub fn distance(self, i: f32, j: f32) -> f32 {
        match self {
            ShapeKind::Diamond => i.abs() + j.abs(),
            ShapeKind::Circle => Vec2::new(i, j).length(),
            ShapeKind::Square => i.abs().max(j.abs()),
        }
    }

    /// Center-to-center distance of the 3×3 layout, as a multiple of the shape size.
    #[inline]
    fn spacing(self) -> f32 {
        match self {
            ShapeKind::Diamond => 0.9,
            ShapeKind::Circle | ShapeKind::Square => 1.0,
        }
    }

    /// Membership test of the boundary ring pass.
    ///
    /// Squares test against the inner half-size even on the ring pass.
    #[inline]
    fn in_ring(self, i: f32, j: f32, half: f32, outer: f32) -> bool {
        match self {
            ShapeKind::Square => in_square(i, j, half),
            _ => self.distance(i, j) <= outer,
        }
    }

    #[inline]
    fn in_core(self, i: f32, j: f32, half: f32) -> bool {
        match self {
            ShapeKind::Square => in_square(i, j, half),
            _ => self.distance(i, j) <= half,
        }
    }

    #[inline]
    fn sparkles(self, i: f32, d: f32) -> bool {
        match self {
            ShapeKind::Square => i.abs() > SPARKLE_RADIUS,
            _ => d > SPARKLE_RADIUS,
        }
    }

    /// Palette ratio of a core cell at distance `d`.
    #[inline]
    fn core_ratio(self, d: f32, half: f32) -> f32 {
        match self {
            ShapeKind::Square => d / half,
            _ => (d - CORE_OFFSET).max(0.0) / half,
        }
    }
}

#[inline]
fn in_square(i: f32, j: f32, half: f32) -> bool {
    i.abs() <= half && j.abs() <= half
}

/// Local offsets `-half, -half + step, …` strictly below `half`, on both axes.
fn window(half: f32, step: f32) -> impl Iterator<Item = (f32, f32)> {
    let count = if half > 0.0 && step > 0.0 { (2.0 * half / step).ceil() as u32 } else { 0 };
    (0..count).flat_map(move |a| {
        (0..count).map(move |b| (-half + a as f32 * step, -half + b as f32 * step))
    })
}

/// Centers of the 3×3 shape layout at the context's time.
pub fn shape_centers(kind: ShapeKind, ctx: &ShapeCtx<'_>) -> [Vec2; 9] {
    let spacing = ctx.content_size * kind.spacing();
    let drift = ctx.time.sin() * SHAPE_DRIFT;
    let center = ctx.viewport.center();

    let mut out = [Vec2::zero(); 9];
    for row in 0..3 {
        for col in 0..3 {
            out[row * 3 + col] = Vec2::new(
                center.x + (col as f32 - 1.0) * spacing,
                center.y + (row as f32 - 1.0) * spacing,
            )
            .shifted(drift);
        }
    }
    out
}

/// Paints the 3×3 layout of `kind` shapes.
pub fn radial_shapes<R, F>(kind: ShapeKind, ctx: &ShapeCtx<'_>, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    if ctx.palette.is_empty() || !(ctx.grid.cell > 0.0) {
        return;
    }
    for center in shape_centers(kind, ctx) {
        paint_shape(kind, center, ctx, rng, emit);
    }
}

/// Paints one shape: a soft ring at the alpha floor, then a crisp core with a
/// sparkling outer band.
pub fn paint_shape<R, F>(kind: ShapeKind, center: Vec2, ctx: &ShapeCtx<'_>, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    let cell = ctx.grid.cell;
    let len = ctx.palette.len();
    if len == 0 {
        return;
    }
    let half = ctx.content_size / 2.0;
    let outer = half + cell;

    for (i, j) in window(outer, cell) {
        if !kind.in_ring(i, j, half, outer) {
            continue;
        }
        let d = kind.distance(i, j);
        let color = ctx.palette[palette_index_by_ratio(len, d / outer)];
        emit(CellFill::new(center.x + i, center.y + j, color, ctx.alpha_floor));
    }

    for (i, j) in window(half, cell) {
        if !kind.in_core(i, j, half) {
            continue;
        }
        let d = kind.distance(i, j);
        let alpha = if kind.sparkles(i, d) { jitter_alpha(rng, ctx.alpha_floor) } else { 255.0 };
        let color = ctx.palette[palette_index_by_ratio(len, kind.core_ratio(d, half))];
        emit(CellFill::new(center.x + i, center.y + j, color, alpha));
    }
}
