//! Paint model shared by the pattern library and the frame renderer.
//!
//! Scope:
//! - color representation (unclamped `f32` RGB, alpha kept separately)
//! - palettes and the built-in palette store
//! - interpolation helpers (lerp, palette index by ratio)

pub mod color;
pub mod gradient;
pub mod palette;

pub use color::{Color, FillStyle};
pub use gradient::{lerp, palette_index_by_ratio};
pub use palette::{Palette, PaletteStore, RANDOM_PALETTE, RANDOM_PALETTE_LEN, random_color};
