//! Coordinate and geometry types shared by the pattern library and surfaces.
//!
//! Canonical space:
//! - surface pixels (one logical px == one raster px)
//! - origin top-left
//! - +X right, +Y down
//!
//! Pattern functions emit cell origins as `f32`; surfaces snap them to whole
//! pixels when filling.

mod rect;
mod vec2;
mod viewport;

pub use rect::{PixelSpan, Rect};
pub use vec2::Vec2;
pub use viewport::Viewport;
