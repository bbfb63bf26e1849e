use crate::config::{self, ConfigStore, RestoreReport};
use crate::driver::{AnimationDriver, FrameOutcome, FrameRequestId, FrameScheduler, ManualScheduler};
use crate::error::StorageError;
use crate::render::{FrameRenderer, RasterSurface};
use crate::storage::KeyValueStore;

/// One animation session: configuration, driver, renderer, scheduler and surface.
///
/// All mutation goes through [`configure`](Self::configure), which forwards the
/// resulting change events to the driver. Dropping the session cancels its
/// pending frame request.
pub struct Session<S: RasterSurface, R: FrameScheduler> {
    store: ConfigStore,
    driver: AnimationDriver,
    renderer: FrameRenderer,
    scheduler: R,
    surface: S,
}

impl<S: RasterSurface, R: FrameScheduler> Session<S, R> {
    pub fn new(surface: S, scheduler: R) -> Self {
        Self::with_parts(ConfigStore::new(), FrameRenderer::new(), surface, scheduler)
    }

    pub fn with_parts(store: ConfigStore, renderer: FrameRenderer, surface: S, scheduler: R) -> Self {
        Self {
            store,
            driver: AnimationDriver::new(),
            renderer,
            scheduler,
            surface,
        }
    }

    #[inline]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    #[inline]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    #[inline]
    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    #[inline]
    pub fn scheduler(&self) -> &R {
        &self.scheduler
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Starts from logical time zero with a fresh memo.
    pub fn start(&mut self) {
        self.store.take_changes();
        self.renderer.reset();
        let animating = self.store.config().animating;
        self.driver.start(animating, &mut self.scheduler);
    }

    pub fn stop(&mut self) {
        self.driver.stop(&mut self.scheduler);
    }

    /// Mutates the configuration and dispatches the resulting changes.
    pub fn configure<T>(&mut self, f: impl FnOnce(&mut ConfigStore) -> T) -> T {
        let out = f(&mut self.store);
        self.dispatch();
        out
    }

    /// Flips the animating flag; returns the new value.
    pub fn toggle_animation(&mut self) -> bool {
        self.configure(ConfigStore::toggle_animating)
    }

    /// Scheduler callback entry point.
    pub fn on_frame(&mut self, id: FrameRequestId, timestamp_ms: f64) -> FrameOutcome {
        self.dispatch();
        self.driver.on_frame(
            id,
            timestamp_ms,
            &mut self.scheduler,
            &mut self.renderer,
            &mut self.surface,
            self.store.config(),
        )
    }

    fn dispatch(&mut self) {
        for change in self.store.take_changes() {
            self.driver.on_config_change(&change, &mut self.scheduler, &mut self.renderer);
        }
    }

    // ── storage ───────────────────────────────────────────────────────────

    pub fn save_config<K: KeyValueStore + ?Sized>(&self, kv: &mut K) -> Result<(), StorageError> {
        config::save_config(kv, self.store.config())
    }

    /// Replaces the configuration with the stored one. `Ok(None)` when nothing was saved.
    pub fn load_config<K: KeyValueStore + ?Sized>(&mut self, kv: &K) -> Result<Option<RestoreReport>, StorageError> {
        let Some((restored, report)) = config::load_config(kv)? else {
            return Ok(None);
        };
        self.configure(|store| store.replace(restored));
        Ok(Some(report))
    }

    pub fn save_field_state<K: KeyValueStore + ?Sized>(&self, kv: &mut K) -> Result<(), StorageError> {
        config::save_field_state(kv, self.store.config())
    }

    pub fn load_field_state<K: KeyValueStore + ?Sized>(&mut self, kv: &K) -> Result<Option<RestoreReport>, StorageError> {
        let Some((restored, report)) = config::load_field_state(kv, self.store.config())? else {
            return Ok(None);
        };
        self.configure(|store| store.replace(restored));
        Ok(Some(report))
    }

    pub fn save_image<K: KeyValueStore + ?Sized>(&self, kv: &mut K) -> Result<(), StorageError> {
        config::save_image(kv, &self.surface)
    }

    /// Paints the stored image. The next scheduled frame paints over it.
    pub fn load_image<K: KeyValueStore + ?Sized>(&mut self, kv: &K) -> Result<bool, StorageError> {
        config::load_image(kv, &mut self.surface)
    }
}

impl<S: RasterSurface> Session<S, ManualScheduler> {
    /// Fires every due request at `timestamp_ms`.
    pub fn pump(&mut self, timestamp_ms: f64) -> Vec<FrameOutcome> {
        self.dispatch();
        self.scheduler
            .drain_due()
            .into_iter()
            .map(|id| self.on_frame(id, timestamp_ms))
            .collect()
    }
}

impl<S: RasterSurface, R: FrameScheduler> Drop for Session<S, R> {
    fn drop(&mut self) {
        self.driver.stop(&mut self.scheduler);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::coords::Viewport;
    use crate::driver::DriverState;
    use crate::paint::Color;
    use crate::render::{DrawList, PixelBuffer};
    use crate::storage::MemoryStore;

    fn session() -> Session<DrawList, ManualScheduler> {
        Session::with_parts(
            ConfigStore::with_seed(1),
            FrameRenderer::with_seed(1),
            DrawList::new(Viewport::new(100.0, 100.0)),
            ManualScheduler::new(),
        )
    }

    #[test]
    fn start_arms_one_request() {
        let mut s = session();
        s.start();
        assert_eq!(s.scheduler().pending_count(), 1);
        assert_eq!(s.pump(0.0).len(), 1);
        assert_eq!(s.scheduler().pending_count(), 1);
    }

    #[test]
    fn configure_dispatches_to_driver() {
        let mut s = session();
        s.start();
        s.configure(|c| c.set_pattern("circle"));
        assert_eq!(s.scheduler().pending_count(), 1);
        assert_eq!(s.scheduler().cancelled(), 1);

        assert!(!s.toggle_animation());
        assert_eq!(s.driver().state(), DriverState::Paused);
        s.pump(10.0);
        assert_eq!(s.scheduler().pending_count(), 0);
    }

    #[test]
    fn speed_change_scales_following_frames() {
        let mut s = session();
        s.start();
        s.pump(0.0);
        s.configure(|c| c.set_speed(0.5));
        s.pump(100.0);
        assert!((s.driver().logical_time() - 0.05).abs() < 1e-5);
    }

    #[test]
    fn shell_listener_runs_beside_driver_dispatch() {
        let seen = Rc::new(Cell::new(0));
        let mut s = session();
        s.start();
        let sink = Rc::clone(&seen);
        s.configure(|c| c.subscribe(move |_| sink.set(sink.get() + 1)));
        s.configure(|c| c.set_alpha(150.0));
        assert_eq!(seen.get(), 1);
        assert_eq!(s.scheduler().cancelled(), 1);
        assert_eq!(s.scheduler().pending_count(), 1);
    }

    #[test]
    fn stop_cancels_pending_request() {
        let mut s = session();
        s.start();
        s.stop();
        assert_eq!(s.scheduler().pending_count(), 0);
    }

    #[test]
    fn config_and_image_storage() {
        let mut kv = MemoryStore::new();
        let mut s = Session::with_parts(
            ConfigStore::with_seed(2),
            FrameRenderer::with_seed(2),
            PixelBuffer::new(40, 40),
            ManualScheduler::new(),
        );
        s.start();
        s.pump(0.0);
        s.save_config(&mut kv).unwrap();
        s.save_image(&mut kv).unwrap();

        let painted = s.surface().as_rgba().to_vec();
        s.surface_mut().clear();
        assert!(s.load_image(&kv).unwrap());
        assert_eq!(s.surface().as_rgba(), painted.as_slice());

        s.configure(|c| c.set_alpha(120.0));
        let report = s.load_config(&kv).unwrap().unwrap();
        assert!(report.is_clean());
        assert_eq!(s.store().config().alpha, 255.0);
    }

    #[test]
    fn recording_surface_holds_one_frame() {
        let mut s = session();
        s.start();
        s.pump(0.0);
        let per_frame = s.surface().len();
        assert!(per_frame > 1);
        for i in 1..50 {
            s.pump(i as f64 * 16.0);
        }
        assert_eq!(s.surface().len(), per_frame);
    }

    #[test]
    fn fractional_colors_survive_save_and_load() {
        let mut kv = MemoryStore::new();
        let mut s = session();
        s.configure(|c| {
            c.set_background(Color::new(10.4, 20.0, 30.0));
            c.set_base_color(Color::new(1.6, 2.0, 3.0));
            c.set_secondary_color(Color::new(254.5, 0.2, 99.49));
        });
        let saved = s.store().config().clone();
        s.save_config(&mut kv).unwrap();

        s.configure(|c| c.reset());
        assert_ne!(s.store().config(), &saved);
        assert!(s.load_config(&kv).unwrap().unwrap().is_clean());
        assert_eq!(s.store().config(), &saved);
    }

    #[test]
    fn image_save_on_recording_surface_fails() {
        let mut kv = MemoryStore::new();
        let s = session();
        assert!(s.save_image(&mut kv).is_err());
    }
}
