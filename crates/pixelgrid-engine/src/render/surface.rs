use crate::coords::{Rect, Vec2, Viewport};
use crate::error::SnapshotError;
use crate::paint::FillStyle;

/// 2D raster surface the frame renderer paints on.
///
/// The contract mirrors an immediate-mode canvas: fills blend over existing
/// content, and an active clip restricts every fill and clear until
/// [`reset_clip`](Self::reset_clip).
pub trait RasterSurface {
    /// Surface size in pixels.
    fn size(&self) -> Viewport;

    /// Resets pixels inside `rect` to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Source-over fill of `rect`.
    fn fill_rect(&mut self, rect: Rect, style: FillStyle);

    /// Restricts subsequent drawing to a circle.
    fn set_clip_circle(&mut self, center: Vec2, radius: f32);

    fn reset_clip(&mut self);

    /// Encodes the current content as a `data:image/png;base64,` URL.
    fn snapshot_data_url(&self) -> Result<String, SnapshotError> {
        Err(SnapshotError::Unsupported)
    }

    /// Replaces the current content with a previously captured data URL.
    fn restore_data_url(&mut self, url: &str) -> Result<(), SnapshotError> {
        let _ = url;
        Err(SnapshotError::Unsupported)
    }

    /// Clears the whole surface.
    fn clear(&mut self) {
        let size = self.size();
        self.clear_rect(Rect::new(0.0, 0.0, size.width, size.height));
    }
}
