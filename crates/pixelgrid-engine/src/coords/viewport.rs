use super::Vec2;

/// Drawing surface size in pixels.
///
/// The pattern library treats this as the canvas the grid is laid over.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the largest circle centered on the surface that fits inside it.
    #[inline]
    pub fn inscribed_radius(self) -> f32 {
        self.width.min(self.height) / 2.0
    }
}
