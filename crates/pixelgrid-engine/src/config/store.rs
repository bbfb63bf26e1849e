use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::paint::{Color, Palette, PaletteStore, RANDOM_PALETTE, RANDOM_PALETTE_LEN, random_color};
use crate::pattern::PatternKind;

use super::{
    ALPHA_RANGE, CELL_SIZE_RANGE, CONTENT_SIZE_RANGE, Configuration, LEVELS_RANGE, SPEED_RANGE,
    VARIANCE_RANGE, clamp_to,
};

/// Clamps and rounds each channel to a whole 8-bit value.
fn quantize(color: Color) -> Color {
    let [r, g, b] = color.to_rgb8();
    Color::rgb(r, g, b)
}

/// What a store mutation touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigChange {
    Pattern(String),
    /// Named, random or custom colors changed.
    Palette,
    Alpha(f32),
    ContentSize(f32),
    Speed(f32),
    Background(Color),
    CellSize(f32),
    /// Base or secondary field color changed.
    FieldColors,
    Variance(f32),
    Levels(u32),
    Animating(bool),
    /// The whole configuration was replaced.
    Replaced,
}

impl ConfigChange {
    /// Speed only scales the clock; everything else needs a fresh frame.
    #[inline]
    pub fn rearms(&self) -> bool {
        !matches!(self, ConfigChange::Speed(_) | ConfigChange::Animating(_))
    }

    /// Changes that invalidate memoized cell colors.
    #[inline]
    pub fn resets_memo(&self) -> bool {
        matches!(
            self,
            ConfigChange::Pattern(_)
                | ConfigChange::Palette
                | ConfigChange::Alpha(_)
                | ConfigChange::CellSize(_)
                | ConfigChange::Replaced
        )
    }
}

/// Handle returned by [`ConfigStore::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ConfigChange)>;

/// Observable owner of the [`Configuration`].
///
/// Setters clamp to the documented ranges, notify listeners synchronously and
/// queue the change for [`take_changes`](Self::take_changes). A setter that leaves
/// the value unchanged emits nothing. Colors are held as whole 8-bit channels,
/// the precision snapshots persist.
///
/// A [`Session`](crate::Session) drains [`take_changes`](Self::take_changes) after
/// every mutation it runs. Listeners are for shells that observe the store
/// directly, such as a panel mirroring slider values.
pub struct ConfigStore {
    config: Configuration,
    palettes: PaletteStore,
    changes: Vec<ConfigChange>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    rng: StdRng,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("config", &self.config)
            .field("pending_changes", &self.changes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::with_rng(Configuration::default(), StdRng::from_entropy())
    }

    /// Store whose random palettes are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Configuration::default(), StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Configuration, rng: StdRng) -> Self {
        Self {
            config,
            palettes: PaletteStore::builtin(),
            changes: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    #[inline]
    pub fn palettes(&self) -> &PaletteStore {
        &self.palettes
    }

    /// Registers a listener called synchronously for every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ConfigChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Drains changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<ConfigChange> {
        std::mem::take(&mut self.changes)
    }

    #[inline]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    fn emit(&mut self, change: ConfigChange) {
        log::trace!("config change: {change:?}");
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
        self.changes.push(change);
    }

    // ── pattern & palette ─────────────────────────────────────────────────

    /// Stores `name` verbatim. Unknown names are kept and reported by the renderer.
    pub fn set_pattern(&mut self, name: &str) {
        if self.config.pattern == name {
            return;
        }
        if name.parse::<PatternKind>().is_err() {
            log::warn!("pattern `{name}` is not supported; frames will be skipped");
        }
        self.config.pattern = name.to_string();
        self.emit(ConfigChange::Pattern(name.to_string()));
    }

    /// Selects a built-in palette, or generates one for [`RANDOM_PALETTE`].
    ///
    /// Selecting a named palette clears random and custom colors. Returns `false`
    /// for unknown names, leaving the configuration untouched.
    pub fn select_palette(&mut self, name: &str) -> bool {
        if name == RANDOM_PALETTE {
            self.generate_random_palette();
            return true;
        }
        let Some(palette) = self.palettes.lookup(name) else {
            log::warn!("unknown palette `{name}`");
            return false;
        };
        self.config.colors = palette.colors.clone();
        self.config.selected_palette = name.to_string();
        self.config.random_colors.clear();
        self.config.custom_colors.clear();
        self.emit(ConfigChange::Palette);
        true
    }

    /// Generates ten random colors (also seeding the custom colors) and a random background.
    pub fn generate_random_palette(&mut self) {
        let palette = Palette::random(&mut self.rng, RANDOM_PALETTE_LEN);
        self.config.random_colors = palette.colors.clone();
        self.config.custom_colors = palette.colors;
        self.config.selected_palette = RANDOM_PALETTE.to_string();
        self.emit(ConfigChange::Palette);

        let background = random_color(&mut self.rng);
        self.config.background = background;
        self.emit(ConfigChange::Background(background));
    }

    /// Sets channel `channel` (0 = r, 1 = g, 2 = b) of custom color `index`.
    pub fn set_custom_channel(&mut self, index: usize, channel: usize, value: f32) -> bool {
        let value = clamp_to(value, &(0.0..=255.0), 0.0).round();
        let Some(color) = self.config.custom_colors.get(index).copied() else {
            return false;
        };
        let Some(current) = color.channel(channel) else {
            return false;
        };
        if current != value {
            self.config.custom_colors[index] = color.with_channel(channel, value);
            self.emit(ConfigChange::Palette);
        }
        true
    }

    /// Replaces custom color `index` from a `#rrggbb` string.
    pub fn set_custom_hex(&mut self, index: usize, hex: &str) -> bool {
        let Some(color) = Color::from_hex(hex) else {
            log::debug!("ignoring malformed color `{hex}`");
            return false;
        };
        let Some(slot) = self.config.custom_colors.get_mut(index) else {
            return false;
        };
        if *slot != color {
            *slot = color;
            self.emit(ConfigChange::Palette);
        }
        true
    }

    // ── scalars ───────────────────────────────────────────────────────────

    pub fn set_alpha(&mut self, alpha: f32) {
        let v = clamp_to(alpha, &ALPHA_RANGE, self.config.alpha).round();
        if v != self.config.alpha {
            self.config.alpha = v;
            self.emit(ConfigChange::Alpha(v));
        }
    }

    pub fn set_content_size(&mut self, size: f32) {
        let v = clamp_to(size, &CONTENT_SIZE_RANGE, self.config.content_size).round();
        if v != self.config.content_size {
            self.config.content_size = v;
            self.emit(ConfigChange::ContentSize(v));
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        let v = clamp_to(speed, &SPEED_RANGE, self.config.speed);
        if v != self.config.speed {
            self.config.speed = v;
            self.emit(ConfigChange::Speed(v));
        }
    }

    pub fn set_cell_size(&mut self, cell: f32) {
        let v = clamp_to(cell, &CELL_SIZE_RANGE, self.config.cell_size).round();
        if v != self.config.cell_size {
            self.config.cell_size = v;
            self.emit(ConfigChange::CellSize(v));
        }
    }

    pub fn set_background(&mut self, color: Color) {
        let color = quantize(color);
        if color != self.config.background {
            self.config.background = color;
            self.emit(ConfigChange::Background(color));
        }
    }

    pub fn set_background_hex(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(c) => {
                self.set_background(c);
                true
            }
            None => false,
        }
    }

    // ── field parameters ──────────────────────────────────────────────────

    pub fn set_base_color(&mut self, color: Color) {
        let color = quantize(color);
        if color != self.config.field.base {
            self.config.field.base = color;
            self.emit(ConfigChange::FieldColors);
        }
    }

    pub fn set_secondary_color(&mut self, color: Color) {
        let color = quantize(color);
        if color != self.config.field.secondary {
            self.config.field.secondary = color;
            self.emit(ConfigChange::FieldColors);
        }
    }

    /// Edits one channel of the base (`secondary == false`) or secondary color.
    pub fn set_field_channel(&mut self, secondary: bool, channel: usize, value: f32) -> bool {
        let value = clamp_to(value, &(0.0..=255.0), 0.0).round();
        let current = if secondary { self.config.field.secondary } else { self.config.field.base };
        if current.channel(channel).is_none() {
            return false;
        }
        let next = current.with_channel(channel, value);
        if secondary {
            self.set_secondary_color(next);
        } else {
            self.set_base_color(next);
        }
        true
    }

    pub fn set_variance(&mut self, variance: f32) {
        let v = clamp_to(variance, &VARIANCE_RANGE, self.config.field.variance);
        if v != self.config.field.variance {
            self.config.field.variance = v;
            self.emit(ConfigChange::Variance(v));
        }
    }

    pub fn set_levels(&mut self, levels: u32) {
        let v = levels.clamp(*LEVELS_RANGE.start(), *LEVELS_RANGE.end());
        if v != self.config.field.levels {
            self.config.field.levels = v;
            self.emit(ConfigChange::Levels(v));
        }
    }

    // ── animation ─────────────────────────────────────────────────────────

    pub fn set_animating(&mut self, animating: bool) {
        if animating != self.config.animating {
            self.config.animating = animating;
            self.emit(ConfigChange::Animating(animating));
        }
    }

    /// Flips the animating flag and returns the new value.
    pub fn toggle_animating(&mut self) -> bool {
        let next = !self.config.animating;
        self.set_animating(next);
        next
    }

    /// Replaces the whole configuration. The animating flag is kept.
    pub fn replace(&mut self, mut config: Configuration) {
        config.animating = self.config.animating;
        if config != self.config {
            self.config = config;
            self.emit(ConfigChange::Replaced);
        }
    }

    /// Restores every default except the animating flag.
    pub fn reset(&mut self) {
        self.replace(Configuration::default());
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn setters_clamp_to_ranges() {
        let mut s = ConfigStore::with_seed(1);
        s.set_alpha(20.0);
        s.set_content_size(999.0);
        s.set_speed(0.0);
        s.set_cell_size(1.0);
        s.set_variance(-5.0);
        s.set_levels(50);

        let c = s.config();
        assert_eq!(c.alpha, 100.0);
        assert_eq!(c.content_size, 250.0);
        assert_eq!(c.speed, 0.1);
        assert_eq!(c.cell_size, 4.0);
        assert_eq!(c.field.variance, 0.0);
        assert_eq!(c.field.levels, 10);
    }

    #[test]
    fn nan_keeps_previous_value() {
        let mut s = ConfigStore::with_seed(1);
        s.set_speed(f32::NAN);
        assert_eq!(s.config().speed, 1.0);
        assert!(!s.has_changes());
    }

    #[test]
    fn unchanged_values_emit_nothing() {
        let mut s = ConfigStore::with_seed(1);
        s.set_alpha(255.0);
        s.set_pattern("random");
        s.set_animating(true);
        assert!(s.take_changes().is_empty());
    }

    #[test]
    fn colors_are_stored_as_whole_channels() {
        let mut s = ConfigStore::with_seed(1);
        s.set_background(Color::new(10.4, 20.0, 300.0));
        s.set_base_color(Color::new(1.6, -4.0, 3.0));
        s.set_secondary_color(Color::new(0.5, 127.49, 255.0));
        assert_eq!(s.config().background, Color::rgb(10, 20, 255));
        assert_eq!(s.config().field.base, Color::rgb(2, 0, 3));
        assert_eq!(s.config().field.secondary, Color::rgb(1, 127, 255));

        s.take_changes();
        s.set_background(Color::new(10.2, 19.8, 255.0));
        assert!(!s.has_changes());
    }

    #[test]
    fn listeners_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = ConfigStore::with_seed(1);
        let sink = Rc::clone(&seen);
        let id = s.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        s.set_pattern("diamond");
        s.set_speed(0.5);
        assert_eq!(*seen.borrow(), [ConfigChange::Pattern("diamond".into()), ConfigChange::Speed(0.5)]);
        assert_eq!(s.take_changes().len(), 2);

        assert!(s.unsubscribe(id));
        s.set_speed(0.7);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn unknown_pattern_is_kept_verbatim() {
        let mut s = ConfigStore::with_seed(1);
        s.set_pattern("nonexistent");
        assert_eq!(s.config().pattern, "nonexistent");
        assert_eq!(s.config().pattern_kind(), None);
    }

    // ── palettes ──────────────────────────────────────────────────────────

    #[test]
    fn random_palette_seeds_custom_colors_and_background() {
        let mut s = ConfigStore::with_seed(9);
        let bg = s.config().background;
        s.generate_random_palette();

        let c = s.config();
        assert_eq!(c.random_colors.len(), 10);
        assert_eq!(c.custom_colors, c.random_colors);
        assert_eq!(c.selected_palette, "random");
        assert_eq!(c.active_palette(), c.custom_colors.as_slice());
        assert_ne!(c.background, bg);
        assert_eq!(
            s.take_changes(),
            [ConfigChange::Palette, ConfigChange::Background(s.config().background)]
        );
    }

    #[test]
    fn selecting_named_palette_clears_transient_colors() {
        let mut s = ConfigStore::with_seed(2);
        s.select_palette("random");
        assert!(s.select_palette("color3"));
        let c = s.config();
        assert!(c.random_colors.is_empty() && c.custom_colors.is_empty());
        assert_eq!(c.active_palette().len(), 6);
        assert!(!s.select_palette("nope"));
        assert_eq!(s.config().selected_palette, "color3");
    }

    #[test]
    fn custom_color_edits() {
        let mut s = ConfigStore::with_seed(3);
        assert!(!s.set_custom_channel(0, 0, 10.0));
        s.generate_random_palette();
        s.take_changes();

        assert!(s.set_custom_channel(2, 1, 300.4));
        assert_eq!(s.config().custom_colors[2].g, 255.0);
        assert!(!s.set_custom_channel(2, 3, 1.0));

        assert!(s.set_custom_hex(0, "#102030"));
        assert_eq!(s.config().custom_colors[0], Color::rgb(16, 32, 48));
        assert!(!s.set_custom_hex(0, "#1020"));
        assert!(!s.set_custom_hex(40, "#102030"));
    }

    #[test]
    fn field_channel_edits() {
        let mut s = ConfigStore::with_seed(4);
        assert!(s.set_field_channel(false, 0, 10.0));
        assert!(s.set_field_channel(true, 2, 99.0));
        assert_eq!(s.config().field.base, Color::rgb(10, 0, 130));
        assert_eq!(s.config().field.secondary, Color::rgb(255, 200, 99));
        assert!(!s.set_field_channel(true, 5, 1.0));
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn toggle_and_replace() {
        let mut s = ConfigStore::with_seed(5);
        assert!(!s.toggle_animating());
        assert_eq!(s.take_changes(), [ConfigChange::Animating(false)]);

        s.set_alpha(150.0);
        s.reset();
        assert_eq!(s.config().alpha, 255.0);
        assert!(!s.config().animating);
    }

    #[test]
    fn change_classification() {
        assert!(!ConfigChange::Speed(1.0).rearms());
        assert!(ConfigChange::Alpha(100.0).rearms());
        assert!(ConfigChange::Palette.resets_memo());
        assert!(!ConfigChange::Background(Color::black()).resets_memo());
    }
}
