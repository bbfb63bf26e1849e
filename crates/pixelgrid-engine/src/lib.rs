//! Pixelgrid engine crate.
//!
//! Renders animated pixel-art patterns onto a CPU raster surface.
//!
//! Layers, leaf to root:
//! - `paint` / `coords`: colors, palettes, interpolation, geometry
//! - `pattern`: the shapes and field pattern libraries
//! - `render`: raster surfaces and the frame renderer
//! - `time` / `driver`: animation clock, frame scheduling, RUNNING/PAUSED machine
//! - `config` / `storage`: observable configuration, snapshots, key-value slots
//! - `session`: glue owning all of the above

pub mod config;
pub mod coords;
pub mod driver;
pub mod error;
pub mod logging;
pub mod paint;
pub mod pattern;
pub mod render;
pub mod session;
pub mod storage;
pub mod time;

pub use config::{ConfigChange, ConfigStore, Configuration};
pub use driver::{AnimationDriver, FrameOutcome, FrameScheduler, ManualScheduler};
pub use error::{RenderError, SnapshotError, StorageError};
pub use render::{DrawList, FrameRenderer, PixelBuffer, RasterSurface};
pub use session::Session;
