use crate::coords::{Rect, Vec2, Viewport};
use crate::error::SnapshotError;
use crate::paint::FillStyle;

use super::RasterSurface;
use super::data_url;

#[derive(Debug, Copy, Clone, PartialEq)]
struct ClipCircle {
    center: Vec2,
    radius: f32,
}

impl ClipCircle {
    /// Pixel `(x, y)` is inside when its center is within the radius.
    #[inline]
    fn admits(self, x: u32, y: u32) -> bool {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        (p - self.center).length() <= self.radius
    }
}

/// Software RGBA8 canvas with straight alpha and source-over blending.
///
/// Rects cover the pixels whose centers they contain, so cell grids with
/// fractional origins neither overlap nor leave gaps.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
    clip: Option<ClipCircle>,
}

impl PixelBuffer {
    /// A fully transparent `width × height` buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 rows, top to bottom.
    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// The `[r, g, b, a]` value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn for_each_pixel(&mut self, rect: Rect, mut f: impl FnMut(&mut [u8])) {
        let Some(span) = rect.pixel_span(self.width, self.height) else {
            return;
        };
        let clip = self.clip;
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                if clip.is_some_and(|c| !c.admits(x, y)) {
                    continue;
                }
                let i = self.offset(x, y);
                f(&mut self.data[i..i + 4]);
            }
        }
    }
}

/// Straight-alpha source-over of `src` (alpha in `[0, 1]`) onto `dst`.
#[inline]
fn blend_over(dst: &mut [u8], rgb: [u8; 3], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        dst[..3].copy_from_slice(&rgb);
        dst[3] = 255;
        return;
    }

    let da = dst[3] as f32 / 255.0;
    let out_a = alpha + da * (1.0 - alpha);
    for c in 0..3 {
        let s = rgb[c] as f32;
        let d = dst[c] as f32;
        dst[c] = ((s * alpha + d * da * (1.0 - alpha)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl RasterSurface for PixelBuffer {
    fn size(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.for_each_pixel(rect, |px| px.fill(0));
    }

    fn fill_rect(&mut self, rect: Rect, style: FillStyle) {
        self.for_each_pixel(rect, |px| blend_over(px, style.rgb, style.alpha));
    }

    fn set_clip_circle(&mut self, center: Vec2, radius: f32) {
        self.clip = Some(ClipCircle { center, radius });
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }

    fn snapshot_data_url(&self) -> Result<String, SnapshotError> {
        data_url::encode_png(self.width, self.height, &self.data)
    }

    fn restore_data_url(&mut self, url: &str) -> Result<(), SnapshotError> {
        let (w, h, rgba) = data_url::decode_png(url)?;
        if (w, h) != (self.width, self.height) {
            return Err(SnapshotError::SizeMismatch {
                found_w: w,
                found_h: h,
                want_w: self.width,
                want_h: self.height,
            });
        }
        self.data = rgba;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn red(alpha: f32) -> FillStyle {
        FillStyle::new(Color::rgb(255, 0, 0), alpha)
    }

    // ── fill ──────────────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_transparent() {
        let buf = PixelBuffer::new(4, 3);
        assert!(buf.is_blank());
        assert_eq!(buf.as_rgba().len(), 4 * 3 * 4);
        assert_eq!(buf.pixel(4, 0), None);
    }

    #[test]
    fn opaque_fill_replaces_pixels() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.fill_rect(Rect::cell(2.0, 2.0, 3.0), red(255.0));
        assert_eq!(buf.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(buf.painted_pixels(), 9);
    }

    #[test]
    fn translucent_fill_on_transparent_keeps_color() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill_rect(Rect::cell(0.0, 0.0, 1.0), red(128.0));
        assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 128]));
    }

    #[test]
    fn translucent_fill_blends_over_opaque() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill_rect(Rect::cell(0.0, 0.0, 1.0), FillStyle::opaque(Color::rgb(0, 0, 255)));
        buf.fill_rect(Rect::cell(0.0, 0.0, 1.0), FillStyle::new(Color::rgb(255, 0, 0), 127.5));
        assert_eq!(buf.pixel(0, 0), Some([128, 0, 128, 255]));
    }

    #[test]
    fn off_surface_fill_is_ignored() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.fill_rect(Rect::cell(-20.0, 40.0, 10.0), red(255.0));
        buf.fill_rect(Rect::cell(f32::NAN, 0.0, 10.0), red(255.0));
        assert!(buf.is_blank());
    }

    // ── clip ──────────────────────────────────────────────────────────────

    #[test]
    fn circle_clip_masks_corners() {
        let mut buf = PixelBuffer::new(20, 20);
        buf.set_clip_circle(Vec2::new(10.0, 10.0), 10.0);
        buf.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), red(255.0));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(10, 10), Some([255, 0, 0, 255]));

        buf.reset_clip();
        buf.fill_rect(Rect::cell(0.0, 0.0, 1.0), red(255.0));
        assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn clear_rect_resets_to_transparent() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), red(255.0));
        buf.clear_rect(Rect::new(0.0, 0.0, 2.0, 4.0));
        assert_eq!(buf.painted_pixels(), 8);
        buf.clear();
        assert!(buf.is_blank());
    }

    // ── snapshots ─────────────────────────────────────────────────────────

    #[test]
    fn snapshot_restores_pixels() {
        let mut buf = PixelBuffer::new(6, 4);
        buf.fill_rect(Rect::cell(1.0, 1.0, 2.0), red(200.0));
        let url = buf.snapshot_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let mut other = PixelBuffer::new(6, 4);
        other.restore_data_url(&url).unwrap();
        assert_eq!(other.as_rgba(), buf.as_rgba());
    }

    #[test]
    fn restore_rejects_other_sizes() {
        let url = PixelBuffer::new(3, 3).snapshot_data_url().unwrap();
        let mut buf = PixelBuffer::new(4, 4);
        assert!(matches!(
            buf.restore_data_url(&url),
            Err(SnapshotError::SizeMismatch { found_w: 3, want_w: 4, .. })
        ));
    }
}
