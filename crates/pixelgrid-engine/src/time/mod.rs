//! Time subsystem.
//!
//! Provides a testable animation clock without coupling to a platform timer.
//! Intended usage:
//! - one `FrameClock` per animation session
//! - call `tick()` once per frame callback with the scheduler's timestamp

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
