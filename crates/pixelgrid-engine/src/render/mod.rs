//! CPU rendering subsystem.
//!
//! The frame renderer turns pattern output into rectangle fills on a
//! [`RasterSurface`]. Surfaces own their pixels (or, for [`DrawList`], just the
//! recorded command stream).
//!
//! Convention:
//! - geometry is in surface pixels (top-left origin, +Y down)
//! - alpha handed to surfaces is straight, in `[0, 1]`

pub mod data_url;
mod draw_list;
mod frame;
mod pixel_buffer;
mod surface;

pub use draw_list::{ClipCircle, DrawCmd, DrawItem, DrawList};
pub use frame::{FrameParams, FrameRenderer, FrameStats};
pub use pixel_buffer::PixelBuffer;
pub use surface::RasterSurface;
