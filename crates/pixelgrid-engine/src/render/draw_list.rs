use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::FillStyle;

use super::RasterSurface;

/// Circular clip region active when a command was recorded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// Surface command recorded by a [`DrawList`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Rect),
    Fill { rect: Rect, style: FillStyle },
}

/// A single draw item: command + the clip active when it was pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// `None` = no clipping (draw everywhere).
    pub clip: Option<ClipCircle>,
}

/// Recording surface.
///
/// Captures the renderer's command stream instead of rasterizing it, so tests can
/// assert on paint order, clip scoping and fill styles without pixel math.
///
/// Performance characteristics:
/// - `push` is O(1)
/// - [`reset`](Self::reset) keeps allocated capacity for reuse
/// - an unclipped clear of the whole surface drops everything recorded before it,
///   so a list replaying frame after frame holds one frame at most
#[derive(Debug, Default)]
pub struct DrawList {
    size: Viewport,
    items: Vec<DrawItem>,
    clip: Option<ClipCircle>,
}

impl DrawList {
    #[inline]
    pub fn new(size: Viewport) -> Self {
        Self { size, ..Self::default() }
    }

    /// Drops recorded items and the active clip.
    #[inline]
    pub fn reset(&mut self) {
        self.items.clear();
        self.clip = None;
    }

    /// Returns items in paint order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates recorded fills in paint order.
    pub fn fills(&self) -> impl Iterator<Item = (Rect, FillStyle, Option<ClipCircle>)> + '_ {
        self.items.iter().filter_map(|item| match item.cmd {
            DrawCmd::Fill { rect, style } => Some((rect, style, item.clip)),
            DrawCmd::Clear(_) => None,
        })
    }

    #[inline]
    pub fn resize(&mut self, size: Viewport) {
        self.size = size;
    }

    #[inline]
    fn push(&mut self, cmd: DrawCmd) {
        self.items.push(DrawItem { cmd, clip: self.clip });
    }
}

impl RasterSurface for DrawList {
    fn size(&self) -> Viewport {
        self.size
    }

    fn clear_rect(&mut self, rect: Rect) {
        let whole = Rect::new(0.0, 0.0, self.size.width, self.size.height);
        if self.clip.is_none() && rect.contains_rect(whole) {
            self.items.clear();
        }
        self.push(DrawCmd::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, style: FillStyle) {
        self.push(DrawCmd::Fill { rect, style });
    }

    fn set_clip_circle(&mut self, center: Vec2, radius: f32) {
        self.clip = Some(ClipCircle { center, radius });
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }
}
