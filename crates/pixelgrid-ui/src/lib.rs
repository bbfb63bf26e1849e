//! pixelgrid UI: shell-side bindings on top of `pixelgrid-engine`.
//!
//! A shell owns a [`Studio`], forwards user actions as [`ControlInput`]s, pumps
//! frames from its refresh callback and shows the [`Notice`]s it produces.
//!
//! ```rust,ignore
//! use pixelgrid_ui::prelude::*;
//!
//! let session = Session::new(PixelBuffer::new(400, 400), ManualScheduler::new());
//! let mut studio = Studio::new(session, MemoryStore::new(), SystemClipboard);
//! studio.session_mut().start();
//!
//! studio.input(&ControlInput::Slider(SliderId::Speed, 0.8));
//! studio.pump(16.0);
//! studio.copy_config();
//! ```

pub mod clipboard;
pub mod controls;
pub mod notice;
pub mod studio;

pub use studio::Studio;

/// Everything a shell needs, engine types included.
pub mod prelude {
    pub use crate::clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
    pub use crate::controls::{ControlInput, SLIDERS, SliderId, SliderSpec, palette_options, pattern_options};
    pub use crate::notice::{Notice, NoticeLevel, Notices};
    pub use crate::studio::Studio;

    pub use pixelgrid_engine::logging::{LoggingConfig, init_logging};
    pub use pixelgrid_engine::pattern::PatternFamily;
    pub use pixelgrid_engine::storage::MemoryStore;
    pub use pixelgrid_engine::{ManualScheduler, PixelBuffer, Session};
}
