use std::time::Duration;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Wall time elapsed since the previous tick, in seconds, after clamping.
    pub dt: f32,

    /// Scaled animation time fed to the pattern library.
    pub logical: f32,

    /// Scheduler timestamp of the tick, in milliseconds.
    pub timestamp_ms: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Animation clock driven by frame-callback timestamps.
///
/// Logical time accumulates `clamp(dt) * speed`, so changing the speed never
/// makes the animation jump. The first tick after construction or
/// [`reset_baseline`](Self::reset_baseline) advances by zero.
///
/// Delta time is clamped to avoid pathological values after a stall or a hidden tab.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    logical: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock at logical time zero with default clamps.
    pub fn new() -> Self {
        Self::with_clamps(Duration::ZERO, Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last_ms: None,
            logical: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Forgets the previous timestamp. Logical time is kept.
    ///
    /// Used when resuming from pause so the paused wall time is not counted.
    pub fn reset_baseline(&mut self) {
        self.last_ms = None;
    }

    /// Rewinds logical time to zero and forgets the baseline.
    pub fn rewind(&mut self) {
        self.last_ms = None;
        self.logical = 0.0;
    }

    #[inline]
    pub fn logical(&self) -> f32 {
        self.logical
    }

    /// Advances the clock to `timestamp_ms` and returns a new `FrameTime`.
    pub fn tick(&mut self, timestamp_ms: f64, speed: f32) -> FrameTime {
        let dt = match self.last_ms {
            Some(last) if timestamp_ms.is_finite() => {
                let raw = ((timestamp_ms - last) / 1000.0).max(0.0) as f32;
                raw.clamp(self.dt_min.as_secs_f32(), self.dt_max.as_secs_f32())
            }
            _ => 0.0,
        };

        if timestamp_ms.is_finite() {
            self.last_ms = Some(timestamp_ms);
        }

        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.logical += dt * speed;

        self.snapshot(dt, timestamp_ms)
    }

    /// Returns a snapshot at the held logical time without advancing.
    pub fn hold(&mut self, timestamp_ms: f64) -> FrameTime {
        self.snapshot(0.0, timestamp_ms)
    }

    fn snapshot(&mut self, dt: f32, timestamp_ms: f64) -> FrameTime {
        let ft = FrameTime {
            dt,
            logical: self.logical,
            timestamp_ms,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_does_not_advance() {
        let mut clock = FrameClock::new();
        let ft = clock.tick(12_345.0, 1.0);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.logical, 0.0);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn accumulates_scaled_delta() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, 1.0);
        clock.tick(100.0, 1.0);
        let ft = clock.tick(200.0, 0.5);
        assert!((ft.logical - 0.15).abs() < 1e-6);
        assert_eq!(ft.frame_index, 2);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, 1.0);
        let ft = clock.tick(60_000.0, 1.0);
        assert_eq!(ft.dt, 0.25);
    }

    #[test]
    fn backwards_timestamp_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(500.0, 1.0);
        assert_eq!(clock.tick(400.0, 1.0).dt, 0.0);
    }

    #[test]
    fn baseline_reset_skips_gap_but_keeps_time() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, 1.0);
        clock.tick(100.0, 1.0);
        clock.reset_baseline();
        let ft = clock.tick(10_000.0, 1.0);
        assert!((ft.logical - 0.1).abs() < 1e-6);
        assert!((clock.tick(10_100.0, 1.0).logical - 0.2).abs() < 1e-6);
    }

    #[test]
    fn hold_keeps_logical_time() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, 1.0);
        clock.tick(200.0, 1.0);
        let held = clock.hold(5_000.0);
        assert!((held.logical - 0.2).abs() < 1e-6);
        assert_eq!(held.dt, 0.0);
    }

    #[test]
    fn rewind_returns_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, 1.0);
        clock.tick(200.0, 1.0);
        clock.rewind();
        assert_eq!(clock.logical(), 0.0);
    }
}
