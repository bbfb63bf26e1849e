use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::coords::{Rect, Viewport};
use crate::error::RenderError;
use crate::paint::{Color, FillStyle};
use crate::pattern::field::{self, FieldParams};
use crate::pattern::shapes::{self, ShapeCtx, ShapeKind};
use crate::pattern::{CellFill, CellMemo, Grid, PatternFamily, PatternKind};

use super::RasterSurface;

/// Configuration view consumed by one frame. Borrowed, never mutated.
#[derive(Debug, Copy, Clone)]
pub struct FrameParams<'a> {
    /// Pattern name as configured; parsed on every frame.
    pub pattern: &'a str,
    /// Active palette of the shapes library.
    pub palette: &'a [Color],
    /// Lower bound of jittered alpha, 100–255.
    pub alpha_floor: f32,
    /// Shape size of the radial patterns.
    pub content_size: f32,
    pub cell_size: f32,
    /// Fill behind the porthole of shapes patterns.
    pub background: Color,
    pub field: FieldParams,
}

/// Summary of a painted frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStats {
    pub kind: PatternKind,
    pub grid: Grid,
    /// Number of cell fills issued, seam duplicates included.
    pub cells: usize,
    pub time: f32,
}

/// Inputs that invalidate memoized cell colors when they change.
#[derive(Debug, Clone, PartialEq)]
struct MemoKey {
    kind: PatternKind,
    palette: Vec<Color>,
    alpha_floor: f32,
    cell: f32,
    size: Viewport,
}

/// Paints one frame of the configured pattern onto a raster surface.
///
/// Owns the per-cell memo of the scrolling patterns and the RNG behind alpha
/// jitter and grain. The memo survives across frames and is dropped whenever the
/// pattern, palette, alpha floor, cell size or surface size differs from the
/// previous frame, or on [`reset`](Self::reset).
#[derive(Debug)]
pub struct FrameRenderer {
    memo: CellMemo,
    memo_key: Option<MemoKey>,
    rng: StdRng,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic renderer for tests and reproducible captures.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { memo: CellMemo::new(), memo_key: None, rng }
    }

    /// Forgets memoized cell colors.
    pub fn reset(&mut self) {
        self.memo.clear();
        self.memo_key = None;
    }

    #[inline]
    pub fn memo(&self) -> &CellMemo {
        &self.memo
    }

    /// Paints `params.pattern` at logical time `time`.
    ///
    /// Validation happens before the surface is touched: on error nothing is drawn.
    pub fn render<S>(&mut self, surface: &mut S, params: &FrameParams<'_>, time: f32) -> Result<FrameStats, RenderError>
    where
        S: RasterSurface + ?Sized,
    {
        let kind: PatternKind = params.pattern.parse()?;
        let size = surface.size();
        let grid = validate(kind, params, size)?;

        self.sync_memo(kind, params, size);

        surface.clear();
        let cells = match kind.family() {
            PatternFamily::Shapes => {
                surface.set_clip_circle(size.center(), size.inscribed_radius());
                surface.fill_rect(Rect::new(0.0, 0.0, size.width, size.height), FillStyle::opaque(params.background));

                let ctx = ShapeCtx {
                    viewport: size,
                    grid,
                    time,
                    palette: params.palette,
                    alpha_floor: params.alpha_floor,
                    content_size: params.content_size,
                };
                let cells = paint_cells(surface, grid.cell, |emit| {
                    paint_shapes(kind, &ctx, &mut self.memo, &mut self.rng, emit)
                });

                surface.reset_clip();
                cells
            }
            PatternFamily::Field => paint_cells(surface, grid.cell, |emit| {
                field::paint_field(kind, grid, time, &params.field, &mut self.rng, emit)
            }),
        };

        Ok(FrameStats { kind, grid, cells, time })
    }

    fn sync_memo(&mut self, kind: PatternKind, params: &FrameParams<'_>, size: Viewport) {
        if !kind.is_memoized() {
            if self.memo_key.take().is_some() {
                log::debug!("cell memo dropped ({} entries)", self.memo.len());
            }
            self.memo.clear();
            return;
        }
        let key = MemoKey {
            kind,
            palette: params.palette.to_vec(),
            alpha_floor: params.alpha_floor,
            cell: params.cell_size,
            size,
        };
        if self.memo_key.as_ref() != Some(&key) {
            if !self.memo.is_empty() {
                log::debug!("cell memo reset ({} entries)", self.memo.len());
            }
            self.memo.clear();
            self.memo_key = Some(key);
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(kind: PatternKind, params: &FrameParams<'_>, size: Viewport) -> Result<Grid, RenderError> {
    let cell = params.cell_size;
    if !cell.is_finite() || cell <= 0.0 {
        return Err(RenderError::InvalidCellSize(cell));
    }

    let grid = match kind.family() {
        PatternFamily::Shapes => Grid::fit(size, cell),
        PatternFamily::Field => Grid::cover(size, cell),
    };
    if grid.is_empty() {
        return Err(RenderError::EmptyGrid { width: size.width, height: size.height, cell });
    }

    if kind.family() == PatternFamily::Shapes && params.palette.is_empty() {
        return Err(RenderError::EmptyPalette);
    }
    Ok(grid)
}

/// Runs `pattern`, filling a `cell × cell` rect per emitted cell. Returns the fill count.
fn paint_cells<S>(surface: &mut S, cell: f32, pattern: impl FnOnce(&mut dyn FnMut(CellFill))) -> usize
where
    S: RasterSurface + ?Sized,
{
    let mut count = 0;
    pattern(&mut |c: CellFill| {
        surface.fill_rect(Rect::cell(c.x, c.y, cell), FillStyle::new(c.color, c.alpha));
        count += 1;
    });
    count
}

fn paint_shapes(
    kind: PatternKind,
    ctx: &ShapeCtx<'_>,
    memo: &mut CellMemo,
    rng: &mut StdRng,
    emit: &mut dyn FnMut(CellFill),
) {
    match kind {
        PatternKind::Random => shapes::random_noise(ctx, rng, emit),
        PatternKind::VerticalLines => shapes::vertical_lines(ctx, memo, rng, emit),
        PatternKind::RowLines => shapes::row_lines(ctx, memo, rng, emit),
        PatternKind::Diamond => shapes::radial_shapes(ShapeKind::Diamond, ctx, rng, emit),
        PatternKind::Circle => shapes::radial_shapes(ShapeKind::Circle, ctx, rng, emit),
        PatternKind::Square => shapes::radial_shapes(ShapeKind::Square, ctx, rng, emit),
        _ => log::warn!("`{kind}` is not a shapes pattern"),
    }
}
