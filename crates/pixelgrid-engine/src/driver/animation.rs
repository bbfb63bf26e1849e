use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::config::{ConfigChange, Configuration};
use crate::error::RenderError;
use crate::render::{FrameRenderer, FrameStats, RasterSurface};
use crate::time::{FrameClock, FrameTime};

use super::{FrameRequestId, FrameScheduler};

/// Driver state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    /// Not started, or stopped.
    Idle,
    /// Every frame advances the clock and re-arms.
    Running,
    /// One static frame at the held time; no re-arm.
    Paused,
}

/// What happened on a frame callback.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Painted { stats: FrameStats, time: FrameTime },
    /// Rendering failed; the error was logged and counted.
    Skipped(RenderError),
    /// The id was not the pending request; ignored.
    Stale,
}

impl FrameOutcome {
    #[inline]
    pub fn is_painted(&self) -> bool {
        matches!(self, FrameOutcome::Painted { .. })
    }
}

/// RUNNING/PAUSED state machine over an injected [`FrameScheduler`].
///
/// Owns at most one outstanding frame request. Every re-arm cancels the
/// previous request before asking for a new one, so two scheduling chains can
/// never run at once.
#[derive(Debug)]
pub struct AnimationDriver {
    state: DriverState,
    pending: Option<FrameRequestId>,
    clock: FrameClock,
    frames: u64,
    errors: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            state: DriverState::Idle,
            pending: None,
            clock,
            frames: 0,
            errors: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Frames painted successfully.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames skipped because rendering failed or panicked.
    #[inline]
    pub fn errors(&self) -> u64 {
        self.errors
    }

    #[inline]
    pub fn logical_time(&self) -> f32 {
        self.clock.logical()
    }

    /// Starts a session at logical time zero.
    pub fn start<R: FrameScheduler + ?Sized>(&mut self, animating: bool, scheduler: &mut R) {
        self.clock.rewind();
        self.state = if animating { DriverState::Running } else { DriverState::Paused };
        log::debug!("animation started ({:?})", self.state);
        self.arm(scheduler);
    }

    /// Cancels the pending request and goes idle.
    pub fn stop<R: FrameScheduler + ?Sized>(&mut self, scheduler: &mut R) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
        self.state = DriverState::Idle;
    }

    /// Holds the clock and paints one static frame.
    pub fn pause<R: FrameScheduler + ?Sized>(&mut self, scheduler: &mut R) {
        if self.state == DriverState::Running {
            self.state = DriverState::Paused;
            self.arm(scheduler);
        }
    }

    /// Resumes from the held time; paused wall time is not counted.
    pub fn resume<R: FrameScheduler + ?Sized>(&mut self, scheduler: &mut R) {
        if self.state == DriverState::Paused {
            self.state = DriverState::Running;
            self.clock.reset_baseline();
            self.arm(scheduler);
        }
    }

    /// Reacts to one configuration change.
    ///
    /// The clock is never reset here; speed changes take effect on the next tick.
    pub fn on_config_change<R: FrameScheduler + ?Sized>(
        &mut self,
        change: &ConfigChange,
        scheduler: &mut R,
        renderer: &mut FrameRenderer,
    ) {
        if change.resets_memo() {
            renderer.reset();
        }
        match change {
            ConfigChange::Animating(true) => self.resume(scheduler),
            ConfigChange::Animating(false) => self.pause(scheduler),
            c if c.rearms() && self.state != DriverState::Idle => self.arm(scheduler),
            _ => {}
        }
    }

    /// Handles a fired frame request.
    ///
    /// Paints one frame; when running, re-arms for the next refresh. Render errors
    /// and panics are contained to the frame.
    pub fn on_frame<R, S>(
        &mut self,
        id: FrameRequestId,
        timestamp_ms: f64,
        scheduler: &mut R,
        renderer: &mut FrameRenderer,
        surface: &mut S,
        config: &Configuration,
    ) -> FrameOutcome
    where
        R: FrameScheduler + ?Sized,
        S: RasterSurface + ?Sized,
    {
        if self.pending != Some(id) {
            log::trace!("ignoring stale frame request {id:?}");
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let time = match self.state {
            DriverState::Running => self.clock.tick(timestamp_ms, config.speed),
            DriverState::Paused | DriverState::Idle => self.clock.hold(timestamp_ms),
        };

        let result = catch_unwind(AssertUnwindSafe(|| renderer.render(surface, &config.frame_params(), time.logical)));
        let outcome = match result {
            Ok(Ok(stats)) => {
                self.frames += 1;
                FrameOutcome::Painted { stats, time }
            }
            Ok(Err(err)) => {
                self.errors += 1;
                log::error!("frame {} skipped: {err}", time.frame_index);
                FrameOutcome::Skipped(err)
            }
            Err(payload) => {
                self.errors += 1;
                surface.reset_clip();
                let msg = panic_message(payload.as_ref());
                log::error!("frame {} panicked: {msg}", time.frame_index);
                FrameOutcome::Skipped(RenderError::Panicked(msg))
            }
        };

        if self.state == DriverState::Running {
            self.arm(scheduler);
        }
        outcome
    }

    /// Cancels any pending request, then requests a new one.
    fn arm<R: FrameScheduler + ?Sized>(&mut self, scheduler: &mut R) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
        self.pending = Some(scheduler.request_frame());
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
