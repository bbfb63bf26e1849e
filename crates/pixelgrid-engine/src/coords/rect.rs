use super::Vec2;

/// Axis-aligned rectangle in surface pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Half-open range of whole pixels `[x0, x1) × [y0, y1)` covered by a rect.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelSpan {
    #[inline]
    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    #[inline]
    pub fn area(self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.x1 - self.x0) as u64 * (self.y1 - self.y0) as u64
        }
    }
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// A square `side × side` cell with its top-left corner at `(x, y)`.
    #[inline]
    pub const fn cell(x: f32, y: f32, side: f32) -> Self {
        Self::new(x, y, side, side)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < (self.origin.x + self.size.x)
            && p.y < (self.origin.y + self.size.y)
    }

    /// True when `other` lies entirely inside this rect (edges may touch).
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        let (a, b) = (self.max(), other.max());
        other.origin.x >= self.origin.x && other.origin.y >= self.origin.y && b.x <= a.x && b.y <= a.y
    }

    /// Pixels whose centers fall inside the rect, clipped to a `width × height` raster.
    ///
    /// Returns `None` for non-finite rects and for rects that miss the raster.
    pub fn pixel_span(self, width: u32, height: u32) -> Option<PixelSpan> {
        if !self.is_finite() || self.is_empty() {
            return None;
        }

        // Pixel `p` is covered when its center `p + 0.5` lies in [min, max).
        let snap = |v: f32, limit: u32| -> u32 { (v - 0.5).ceil().clamp(0.0, limit as f32) as u32 };

        let max = self.max();
        let span = PixelSpan {
            x0: snap(self.origin.x, width),
            y0: snap(self.origin.y, height),
            x1: snap(max.x, width),
            y1: snap(max.y, height),
        };

        if span.is_empty() { None } else { Some(span) }
    }
}
