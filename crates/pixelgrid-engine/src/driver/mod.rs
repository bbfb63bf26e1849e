//! Frame scheduling and the animation state machine.
//!
//! Responsibilities:
//! - abstract the display-refresh callback behind [`FrameScheduler`]
//! - own the single outstanding frame request of a session
//! - tick the clock, paint, and re-arm; contain per-frame failures

mod animation;
mod scheduler;

pub use animation::{AnimationDriver, DriverState, FrameOutcome};
pub use scheduler::{FrameRequestId, FrameScheduler, ManualScheduler};
