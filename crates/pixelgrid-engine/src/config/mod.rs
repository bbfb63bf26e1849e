//! Configuration model, observable store and snapshots.
//!
//! `Configuration` is plain data with documented defaults and ranges;
//! [`ConfigStore`] is the only mutation path and records a [`ConfigChange`] per
//! effective mutation.

mod persist;
mod snapshot;
mod store;

use std::ops::RangeInclusive;

use crate::paint::{Color, PaletteStore};
use crate::pattern::PatternKind;
use crate::pattern::field::{DEFAULT_LEVELS, FieldParams};
use crate::render::FrameParams;

pub use persist::{
    CONFIG_KEY, FIELD_STATE_KEY, IMAGE_KEY, load_config, load_field_state, load_image, save_config,
    save_field_state, save_image,
};
pub use snapshot::{ConfigSnapshot, FieldSnapshot, Rgb, RestoreReport};
pub use store::{ConfigChange, ConfigStore, ListenerId};

pub const ALPHA_RANGE: RangeInclusive<f32> = 100.0..=255.0;
pub const CONTENT_SIZE_RANGE: RangeInclusive<f32> = 180.0..=250.0;
pub const SPEED_RANGE: RangeInclusive<f32> = 0.1..=1.5;
pub const CELL_SIZE_RANGE: RangeInclusive<f32> = 4.0..=60.0;
pub const VARIANCE_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub const LEVELS_RANGE: RangeInclusive<u32> = 2..=10;

/// Side length of the default square canvas: 40 cells of 10px.
pub const DEFAULT_CANVAS_SIZE: u32 = 400;

pub const DEFAULT_PATTERN: &str = "random";
pub const DEFAULT_BACKGROUND: Color = Color::rgb(252, 254, 165);

/// Full animation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Pattern name as entered; unknown names reach the renderer and are reported there.
    pub pattern: String,
    pub selected_palette: String,
    /// Colors of the selected named palette.
    pub colors: Vec<Color>,
    pub random_colors: Vec<Color>,
    pub custom_colors: Vec<Color>,
    pub alpha: f32,
    pub content_size: f32,
    pub cell_size: f32,
    pub speed: f32,
    pub background: Color,
    pub animating: bool,
    pub field: FieldParams,
}

impl Default for Configuration {
    fn default() -> Self {
        let palettes = PaletteStore::builtin();
        let name = PaletteStore::default_name();
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            selected_palette: name.to_string(),
            colors: palettes.resolve(name).colors,
            random_colors: Vec::new(),
            custom_colors: Vec::new(),
            alpha: 255.0,
            content_size: 200.0,
            cell_size: 10.0,
            speed: 1.0,
            background: DEFAULT_BACKGROUND,
            animating: true,
            field: FieldParams { levels: DEFAULT_LEVELS, ..FieldParams::default() },
        }
    }
}

impl Configuration {
    /// Custom colors if any, else random colors if any, else the named palette.
    pub fn active_palette(&self) -> &[Color] {
        if !self.custom_colors.is_empty() {
            &self.custom_colors
        } else if !self.random_colors.is_empty() {
            &self.random_colors
        } else {
            &self.colors
        }
    }

    /// The parsed pattern kind, if the configured name is known.
    pub fn pattern_kind(&self) -> Option<PatternKind> {
        self.pattern.parse().ok()
    }

    /// Borrowed view handed to the frame renderer.
    pub fn frame_params(&self) -> FrameParams<'_> {
        FrameParams {
            pattern: &self.pattern,
            palette: self.active_palette(),
            alpha_floor: self.alpha,
            content_size: self.content_size,
            cell_size: self.cell_size,
            background: self.background,
            field: self.field,
        }
    }
}

/// Clamps `v` into `range`; NaN becomes `fallback`.
#[inline]
pub(crate) fn clamp_to(v: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(*range.start(), *range.end()) }
}
