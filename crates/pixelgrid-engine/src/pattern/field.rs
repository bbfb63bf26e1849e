//! Continuous two-color field library.
//!
//! Every sample is a pure function of `(x, y, grid, t, params)` except
//! [`grain`], which draws from the supplied RNG. Results are full-opacity colors
//! clamped to the 8-bit gamut.

use rand::Rng;

use crate::paint::{Color, lerp};

use super::{CellFill, Grid, PatternKind};

/// Edge length of a checkerboard square, in cells.
pub const CHECKER_SIZE: f32 = 4.0;

/// Quantization levels used by `pixelWave` unless configured otherwise.
pub const DEFAULT_LEVELS: u32 = 5;

const WAVE_FREQ: f32 = 0.6;
const PIXEL_WAVE_AMP: f32 = 5.0;
const PIXEL_WAVE_SPEED: f32 = 2.0;

/// Inputs of the field library.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldParams {
    pub base: Color,
    pub secondary: Color,
    /// Noise amplitude of `wave` and `grain`, 0–100.
    pub variance: f32,
    /// Quantization levels of `pixelWave`; values below 1 behave like 1.
    pub levels: u32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            base: Color::rgb(75, 0, 130),
            secondary: Color::rgb(255, 200, 0),
            variance: 30.0,
            levels: DEFAULT_LEVELS,
        }
    }
}

/// Geometry of the grid relative to its center, precomputed once per frame.
#[derive(Debug, Copy, Clone)]
struct Center {
    x: f32,
    y: f32,
    max_dist: f32,
}

impl Center {
    fn of(grid: Grid) -> Self {
        let x = grid.cols as f32 / 2.0;
        let y = grid.rows as f32 / 2.0;
        Self { x, y, max_dist: (x * x + y * y).sqrt() }
    }

    /// Distance of `(x, y)` normalized by the corner distance; 0 on a degenerate grid.
    #[inline]
    fn normalized(&self, x: f32, y: f32) -> f32 {
        if self.max_dist > 0.0 {
            (x - self.x).hypot(y - self.y) / self.max_dist
        } else {
            0.0
        }
    }
}

/// Maps a sinusoid in `[-1, 1]` onto the base→secondary gradient.
#[inline]
fn blend(p: &FieldParams, wave: f32) -> Color {
    lerp(p.base, p.secondary, (wave + 1.0) / 2.0)
}

pub fn wave(x: f32, y: f32, t: f32, p: &FieldParams) -> Color {
    let noise = (x * WAVE_FREQ + t).sin() * (y * WAVE_FREQ + t).cos() * p.variance;
    p.base.offset(noise).clamped()
}

pub fn stripes(x: f32, t: f32, p: &FieldParams) -> Color {
    blend(p, (x * WAVE_FREQ + t).sin())
}

/// Concentric rings around the integer center cell.
pub fn dots(x: f32, y: f32, grid: Grid, t: f32, p: &FieldParams) -> Color {
    let dx = x - (grid.cols / 2) as f32;
    let dy = y - (grid.rows / 2) as f32;
    blend(p, (dx.hypot(dy) * 0.4 - t * 0.8).sin())
}

pub fn ripple(x: f32, y: f32, grid: Grid, t: f32, p: &FieldParams) -> Color {
    let nd = Center::of(grid).normalized(x, y);
    blend(p, (nd * 20.0 - t * 5.0).sin() * (-nd * 3.0).exp())
}

pub fn pulse(x: f32, y: f32, grid: Grid, t: f32, p: &FieldParams) -> Color {
    let nd = Center::of(grid).normalized(x, y);
    blend(p, (nd * 10.0 - t * 5.0).sin())
}

pub fn vortex(x: f32, y: f32, grid: Grid, t: f32, p: &FieldParams) -> Color {
    let c = Center::of(grid);
    let (dx, dy) = (x - c.x, y - c.y);
    blend(p, (dy.atan2(dx) + dx.hypot(dy) * 0.4 - t * 1.6).sin())
}

pub fn checkerboard(x: f32, y: f32, t: f32, p: &FieldParams) -> Color {
    let shift = (t * 2.0).sin() * CHECKER_SIZE / 2.0;
    let parity = ((x + shift) / CHECKER_SIZE).floor() + ((y + shift) / CHECKER_SIZE).floor();
    if parity.rem_euclid(2.0) == 0.0 { p.base } else { p.secondary }
}

/// Two crossed sine waves, quantized to `levels` bands.
pub fn pixel_wave(x: f32, y: f32, t: f32, p: &FieldParams) -> Color {
    let levels = p.levels.max(1) as f32;
    let h = (x * WAVE_FREQ + t * PIXEL_WAVE_SPEED).sin() * PIXEL_WAVE_AMP;
    let v = (y * WAVE_FREQ + t * PIXEL_WAVE_SPEED).cos() * PIXEL_WAVE_AMP;
    let combined = (h + v) / 2.0;
    let q = ((combined + PIXEL_WAVE_AMP) / (2.0 * PIXEL_WAVE_AMP) * levels).floor() / levels;
    let c = lerp(p.base, p.secondary, q);
    Color::new(c.r.round(), c.g.round(), c.b.round())
}

/// Per-cell noise biased towards darkening the base color.
pub fn grain<R: Rng + ?Sized>(rng: &mut R, p: &FieldParams) -> Color {
    let noise = (rng.gen_range(0.0..1.0_f32) - 0.6) * 2.0 * p.variance;
    p.base.offset(noise).clamped()
}

/// Samples one cell of a field pattern. Returns `None` for shapes-family kinds.
pub fn sample<R: Rng + ?Sized>(
    kind: PatternKind,
    x: u32,
    y: u32,
    grid: Grid,
    t: f32,
    p: &FieldParams,
    rng: &mut R,
) -> Option<Color> {
    let (fx, fy) = (x as f32, y as f32);
    let color = match kind {
        PatternKind::Wave => wave(fx, fy, t, p),
        PatternKind::Ripple => ripple(fx, fy, grid, t, p),
        PatternKind::Stripes => stripes(fx, t, p),
        PatternKind::Dots => dots(fx, fy, grid, t, p),
        PatternKind::Vortex => vortex(fx, fy, grid, t, p),
        PatternKind::Pulse => pulse(fx, fy, grid, t, p),
        PatternKind::Checkerboard => checkerboard(fx, fy, t, p),
        PatternKind::PixelWave => pixel_wave(fx, fy, t, p),
        PatternKind::Grain => grain(rng, p),
        _ => return None,
    };
    Some(color)
}

/// Paints every cell of `grid` with field pattern `kind` at full opacity.
pub fn paint_field<R, F>(kind: PatternKind, grid: Grid, t: f32, p: &FieldParams, rng: &mut R, emit: &mut F)
where
    R: Rng + ?Sized,
    F: FnMut(CellFill) + ?Sized,
{
    for (x, y) in grid.cells() {
        let Some(color) = sample(kind, x, y, grid, t, p, rng) else {
            return;
        };
        emit(CellFill::new(x as f32 * grid.cell, y as f32 * grid.cell, color, 255.0));
    }
}
