use anyhow::{Context, Result};

use pixelgrid_engine::config::{CONFIG_KEY, ConfigSnapshot, FIELD_STATE_KEY, IMAGE_KEY, RestoreReport};
use pixelgrid_engine::driver::{FrameOutcome, FrameScheduler, ManualScheduler};
use pixelgrid_engine::render::RasterSurface;
use pixelgrid_engine::storage::KeyValueStore;
use pixelgrid_engine::Session;

use crate::clipboard::Clipboard;
use crate::controls::{self, ControlInput};
use crate::notice::Notices;

/// Shell-side owner of a session and its injected capabilities.
///
/// Every user action reports its outcome as a [`Notice`](crate::notice::Notice);
/// failures never reach the render loop.
pub struct Studio<S, R, K, C>
where
    S: RasterSurface,
    R: FrameScheduler,
    K: KeyValueStore,
    C: Clipboard,
{
    session: Session<S, R>,
    storage: K,
    clipboard: C,
    notices: Notices,
    last_pump_ms: Option<f64>,
}

impl<S, R, K, C> Studio<S, R, K, C>
where
    S: RasterSurface,
    R: FrameScheduler,
    K: KeyValueStore,
    C: Clipboard,
{
    pub fn new(session: Session<S, R>, storage: K, clipboard: C) -> Self {
        Self { session, storage, clipboard, notices: Notices::new(), last_pump_ms: None }
    }

    #[inline]
    pub fn session(&self) -> &Session<S, R> {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session<S, R> {
        &mut self.session
    }

    #[inline]
    pub fn storage(&self) -> &K {
        &self.storage
    }

    #[inline]
    pub fn storage_mut(&mut self) -> &mut K {
        &mut self.storage
    }

    #[inline]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    #[inline]
    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    #[inline]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Applies a control input; a rejected input becomes a warning notice.
    pub fn input(&mut self, input: &ControlInput) -> bool {
        match self.session.configure(|store| controls::apply(store, input)) {
            Ok(()) => true,
            Err(err) => {
                self.notices.warning(format!("{err:#}"));
                false
            }
        }
    }

    // ── configuration actions ─────────────────────────────────────────────

    /// Copies the exported configuration JSON to the clipboard.
    pub fn copy_config(&mut self) -> bool {
        let outcome = self.try_copy_config();
        self.report(outcome, "Configuration copied to clipboard", "Failed to copy configuration")
    }

    fn try_copy_config(&mut self) -> Result<()> {
        let json = self.config_json()?;
        self.clipboard.set_text(&json)
    }

    /// The exported configuration as pretty JSON, for display.
    pub fn config_json(&self) -> Result<String> {
        ConfigSnapshot::capture(self.session.store().config())
            .to_pretty_json()
            .context("encoding configuration")
    }

    pub fn save_config(&mut self) -> bool {
        let outcome = self.session.save_config(&mut self.storage).context("saving configuration");
        self.report(outcome, "Configuration saved", "Failed to save configuration")
    }

    pub fn load_config(&mut self) -> bool {
        let outcome = self.session.load_config(&self.storage).context("loading configuration");
        self.report_restore(outcome, "Configuration loaded", "No saved configuration found")
    }

    // ── field state actions ───────────────────────────────────────────────

    /// Saves the field settings and the current frame as an image.
    pub fn save_state(&mut self) -> bool {
        let outcome = self.try_save_state();
        self.report(outcome, "State saved", "Failed to save state")
    }

    /// Writes both slots or neither: the image is encoded before anything is
    /// stored, and a failed image write puts the previous field state back.
    fn try_save_state(&mut self) -> Result<()> {
        let url = self.session.surface().snapshot_data_url().context("saving frame image")?;
        let previous = self.storage.get(FIELD_STATE_KEY).context("saving field state")?;
        self.session.save_field_state(&mut self.storage).context("saving field state")?;

        if let Err(err) = self.storage.set(IMAGE_KEY, &url) {
            let rollback = match &previous {
                Some(json) => self.storage.set(FIELD_STATE_KEY, json),
                None => self.storage.remove(FIELD_STATE_KEY),
            };
            if let Err(rollback_err) = rollback {
                log::warn!("could not restore `{FIELD_STATE_KEY}` after a failed save: {rollback_err}");
            }
            return Err(err).context("saving frame image");
        }
        Ok(())
    }

    /// Restores the field settings, then paints the stored image until the next frame.
    pub fn load_state(&mut self) -> bool {
        let outcome = self.try_load_state();
        self.report_restore(outcome, "State loaded", "No saved state found")
    }

    fn try_load_state(&mut self) -> Result<Option<RestoreReport>> {
        let report = self.session.load_field_state(&self.storage).context("loading field state")?;
        let painted = self.session.load_image(&self.storage).context("loading frame image")?;
        Ok(match (report, painted) {
            (None, true) => Some(RestoreReport::default()),
            (report, _) => report,
        })
    }

    /// Removes every saved slot.
    pub fn clear_saved(&mut self) -> bool {
        let outcome = [CONFIG_KEY, FIELD_STATE_KEY, IMAGE_KEY]
            .into_iter()
            .try_for_each(|key| self.storage.remove(key).with_context(|| format!("removing `{key}`")));
        self.report(outcome, "Saved data cleared", "Failed to clear saved data")
    }

    fn report(&mut self, outcome: Result<()>, ok: &str, failed: &str) -> bool {
        match outcome {
            Ok(()) => {
                self.notices.success(ok);
                true
            }
            Err(err) => {
                self.notices.error(format!("{failed}: {err:#}"));
                false
            }
        }
    }

    fn report_restore(&mut self, outcome: Result<Option<RestoreReport>>, ok: &str, missing: &str) -> bool {
        match outcome {
            Ok(Some(report)) if report.is_clean() => {
                self.notices.success(ok);
                true
            }
            Ok(Some(report)) => {
                self.notices.warning(format!("{ok} ({report})"));
                true
            }
            Ok(None) => {
                self.notices.info(missing);
                false
            }
            Err(err) => {
                self.notices.error(format!("{err:#}"));
                false
            }
        }
    }
}

impl<S, K, C> Studio<S, ManualScheduler, K, C>
where
    S: RasterSurface,
    K: KeyValueStore,
    C: Clipboard,
{
    /// Fires due frames and ages notices by the wall time since the last pump.
    pub fn pump(&mut self, timestamp_ms: f64) -> Vec<FrameOutcome> {
        if let Some(last) = self.last_pump_ms {
            self.notices.advance(timestamp_ms - last);
        }
        self.last_pump_ms = Some(timestamp_ms);
        self.session.pump(timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelgrid_engine::config::FieldSnapshot;
    use pixelgrid_engine::coords::Viewport;
    use pixelgrid_engine::render::{DrawList, FrameRenderer, PixelBuffer};
    use pixelgrid_engine::storage::MemoryStore;
    use pixelgrid_engine::ConfigStore;

    use crate::clipboard::MemoryClipboard;
    use crate::controls::SliderId;
    use crate::notice::NoticeLevel;

    type TestStudio<S> = Studio<S, ManualScheduler, MemoryStore, MemoryClipboard>;

    fn studio() -> TestStudio<PixelBuffer> {
        let session = Session::with_parts(
            ConfigStore::with_seed(5),
            FrameRenderer::with_seed(5),
            PixelBuffer::new(60, 60),
            ManualScheduler::new(),
        );
        let mut s = Studio::new(session, MemoryStore::new(), MemoryClipboard::new());
        s.session_mut().start();
        s
    }

    fn last_level<S: RasterSurface>(s: &TestStudio<S>) -> Option<NoticeLevel> {
        s.notices().latest().map(|n| n.level)
    }

    // ── clipboard ─────────────────────────────────────────────────────────

    #[test]
    fn copy_puts_export_json_on_clipboard() {
        let mut s = studio();
        s.input(&ControlInput::Pattern("circle".into()));
        assert!(s.copy_config());
        assert_eq!(last_level(&s), Some(NoticeLevel::Success));

        let text = s.clipboard().contents().unwrap();
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["currentType"], "circle");
        assert_eq!(text, s.config_json().unwrap());
    }

    #[test]
    fn clipboard_failure_is_a_notice() {
        let mut s = studio();
        s.clipboard_mut().set_unavailable(true);
        assert!(!s.copy_config());
        assert_eq!(last_level(&s), Some(NoticeLevel::Error));
        assert!(s.pump(0.0)[0].is_painted());
    }

    // ── storage ───────────────────────────────────────────────────────────

    #[test]
    fn save_then_load_config() {
        let mut s = studio();
        s.input(&ControlInput::Slider(SliderId::Speed, 0.5));
        assert!(s.save_config());
        s.input(&ControlInput::Slider(SliderId::Speed, 1.2));

        assert!(s.load_config());
        assert_eq!(last_level(&s), Some(NoticeLevel::Success));
        assert_eq!(s.session().store().config().speed, 0.5);
    }

    #[test]
    fn load_without_save_informs() {
        let mut s = studio();
        assert!(!s.load_config());
        assert!(!s.load_state());
        assert_eq!(last_level(&s), Some(NoticeLevel::Info));
    }

    #[test]
    fn repaired_snapshot_warns() {
        let mut s = studio();
        s.storage_mut().set(CONFIG_KEY, r#"{"currentType":"circle","alpha":9000}"#).unwrap();
        assert!(s.load_config());
        assert_eq!(last_level(&s), Some(NoticeLevel::Warning));
        assert_eq!(s.session().store().config().pattern, "circle");
        assert_eq!(s.session().store().config().alpha, 255.0);
    }

    #[test]
    fn malformed_snapshot_is_an_error_notice() {
        let mut s = studio();
        s.storage_mut().set(CONFIG_KEY, "{oops").unwrap();
        assert!(!s.load_config());
        assert_eq!(last_level(&s), Some(NoticeLevel::Error));
    }

    #[test]
    fn unavailable_storage_never_stops_frames() {
        let mut s = studio();
        s.storage_mut().set_unavailable(true);
        assert!(!s.save_config());
        assert!(!s.save_state());
        assert!(!s.clear_saved());
        assert_eq!(s.notices().len(), 3);
        assert!(s.pump(0.0)[0].is_painted());
        assert_eq!(s.session().scheduler().pending_count(), 1);
    }

    #[test]
    fn state_round_trip_paints_image() {
        let mut s = studio();
        s.input(&ControlInput::Pattern("ripple".into()));
        s.input(&ControlInput::Slider(SliderId::Variance, 60.0));
        s.pump(0.0);
        assert!(s.save_state());
        let frame = s.session().surface().as_rgba().to_vec();

        s.input(&ControlInput::Pattern("wave".into()));
        s.input(&ControlInput::Slider(SliderId::Variance, 10.0));
        s.session_mut().surface_mut().clear();

        assert!(s.load_state());
        let config = s.session().store().config();
        assert_eq!(config.pattern, "ripple");
        assert_eq!(config.field.variance, 60.0);
        assert_eq!(s.session().surface().as_rgba(), frame.as_slice());
    }

    #[test]
    fn clear_saved_removes_slots() {
        let mut s = studio();
        s.pump(0.0);
        assert!(s.save_config() && s.save_state());
        assert_eq!(s.storage().len(), 3);
        assert!(s.clear_saved());
        assert!(s.storage().is_empty());
    }

    #[test]
    fn rejected_input_warns() {
        let mut s = studio();
        assert!(!s.input(&ControlInput::Palette("nope".into())));
        assert_eq!(last_level(&s), Some(NoticeLevel::Warning));
    }

    #[test]
    fn pump_ages_notices() {
        let mut s = studio();
        s.pump(0.0);
        s.save_config();
        s.pump(1_000.0);
        assert_eq!(s.notices().len(), 1);
        s.pump(4_500.0);
        assert!(s.notices().is_empty());
    }

    #[test]
    fn image_save_needs_a_raster() {
        let session = Session::with_parts(
            ConfigStore::with_seed(1),
            FrameRenderer::with_seed(1),
            DrawList::new(Viewport::new(50.0, 50.0)),
            ManualScheduler::new(),
        );
        let mut s = Studio::new(session, MemoryStore::new(), MemoryClipboard::new());
        s.storage_mut().set(FIELD_STATE_KEY, "{\"cellSize\":12}").unwrap();
        s.storage_mut().set(IMAGE_KEY, "data:image/png;base64,old").unwrap();

        assert!(!s.save_state());
        let text = &s.notices().latest().unwrap().text;
        assert!(text.contains("saving frame image"), "{text}");
        assert_eq!(s.storage().get(FIELD_STATE_KEY).unwrap().as_deref(), Some("{\"cellSize\":12}"));
        assert_eq!(s.storage().get(IMAGE_KEY).unwrap().as_deref(), Some("data:image/png;base64,old"));
    }

    #[test]
    fn full_storage_keeps_previous_state() {
        let mut s = studio();
        s.input(&ControlInput::Pattern("ripple".into()));
        s.pump(0.0);

        let previous = "{\"cellSize\":12}";
        let url = s.session().surface().snapshot_data_url().unwrap();
        let state = FieldSnapshot::capture(s.session().store().config()).to_json().unwrap();
        let needed = FIELD_STATE_KEY.len() + state.len() + IMAGE_KEY.len() + url.len();
        *s.storage_mut() = MemoryStore::with_quota(needed - 1);
        s.storage_mut().set(FIELD_STATE_KEY, previous).unwrap();

        assert!(!s.save_state());
        assert_eq!(last_level(&s), Some(NoticeLevel::Error));
        assert_eq!(s.storage().get(FIELD_STATE_KEY).unwrap().as_deref(), Some(previous));
        assert_eq!(s.storage().get(IMAGE_KEY).unwrap(), None);

        *s.storage_mut() = MemoryStore::with_quota(needed);
        assert!(s.save_state());
        assert_eq!(s.storage().get(FIELD_STATE_KEY).unwrap(), Some(state));
    }
}
