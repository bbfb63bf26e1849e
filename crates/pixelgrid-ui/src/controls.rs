use anyhow::{Result, bail};

use pixelgrid_engine::config::{
    ALPHA_RANGE, CELL_SIZE_RANGE, CONTENT_SIZE_RANGE, ConfigStore, Configuration, LEVELS_RANGE, SPEED_RANGE,
    VARIANCE_RANGE,
};
use pixelgrid_engine::pattern::{PatternFamily, PatternKind};

/// Numeric settings exposed as sliders.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SliderId {
    Alpha,
    ContentSize,
    Speed,
    CellSize,
    Variance,
    Levels,
}

/// Range, step and label of one slider.
///
/// Values reaching the store are snapped to `step` and clamped to `[min, max]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderSpec {
    pub id: SliderId,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

pub const SLIDERS: [SliderSpec; 6] = [
    SliderSpec::of(SliderId::Alpha),
    SliderSpec::of(SliderId::ContentSize),
    SliderSpec::of(SliderId::Speed),
    SliderSpec::of(SliderId::CellSize),
    SliderSpec::of(SliderId::Variance),
    SliderSpec::of(SliderId::Levels),
];

impl SliderSpec {
    pub const fn of(id: SliderId) -> Self {
        let (label, min, max, step) = match id {
            SliderId::Alpha => ("Saturation", *ALPHA_RANGE.start(), *ALPHA_RANGE.end(), 1.0),
            SliderId::ContentSize => ("Content Size", *CONTENT_SIZE_RANGE.start(), *CONTENT_SIZE_RANGE.end(), 1.0),
            SliderId::Speed => ("Animation Speed", *SPEED_RANGE.start(), *SPEED_RANGE.end(), 0.01),
            SliderId::CellSize => ("Pixel Size", *CELL_SIZE_RANGE.start(), *CELL_SIZE_RANGE.end(), 1.0),
            SliderId::Variance => ("Color Variance", *VARIANCE_RANGE.start(), *VARIANCE_RANGE.end(), 5.0),
            SliderId::Levels => ("Levels", *LEVELS_RANGE.start() as f32, *LEVELS_RANGE.end() as f32, 1.0),
        };
        Self { id, label, min, max, step }
    }

    /// Snaps to the nearest step from `min`, then clamps. NaN maps to `min`.
    pub fn snap(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let steps = ((value - self.min) / self.step).round();
        // Re-round to the step's decimals so 0.1 + 70 * 0.01 lands on 0.8.
        let scale = (1.0 / self.step).max(1.0);
        (((self.min + steps * self.step) * scale).round() / scale).clamp(self.min, self.max)
    }

    /// Normalized position in [0, 1].
    pub fn normalized(&self, value: f32) -> f32 {
        if (self.max - self.min).abs() < f32::EPSILON {
            0.0
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }

    /// Snapped value at `fraction` of the track.
    pub fn value_at(&self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        self.snap(self.min + t * (self.max - self.min))
    }

    pub fn current(&self, config: &Configuration) -> f32 {
        match self.id {
            SliderId::Alpha => config.alpha,
            SliderId::ContentSize => config.content_size,
            SliderId::Speed => config.speed,
            SliderId::CellSize => config.cell_size,
            SliderId::Variance => config.field.variance,
            SliderId::Levels => config.field.levels as f32,
        }
    }

    /// Label with the current value, e.g. `Animation Speed: 0.80x`.
    pub fn caption(&self, config: &Configuration) -> String {
        let v = self.current(config);
        match self.id {
            SliderId::Speed => format!("{}: {v:.2}x", self.label),
            SliderId::CellSize => format!("{}: {v}px", self.label),
            SliderId::Variance => format!("{}: {v}%", self.label),
            _ => format!("{}: {v}", self.label),
        }
    }
}

/// A user action from the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    Pattern(String),
    /// Named palette, or `"random"` for a fresh random one.
    Palette(String),
    RandomPalette,
    Slider(SliderId, f32),
    CustomChannel { index: usize, channel: usize, value: f32 },
    CustomHex { index: usize, hex: String },
    BackgroundHex(String),
    /// Channel of the field base (`secondary == false`) or secondary color.
    FieldChannel { secondary: bool, channel: usize, value: f32 },
    ToggleAnimation,
}

/// Applies one input to the store.
///
/// Pattern names are passed through verbatim; an unknown one is reported by the
/// renderer on the next frame. Inputs the store rejects are errors.
pub fn apply(store: &mut ConfigStore, input: &ControlInput) -> Result<()> {
    match input {
        ControlInput::Pattern(name) => store.set_pattern(name),
        ControlInput::Palette(name) => {
            if !store.select_palette(name) {
                bail!("unknown palette `{name}`");
            }
        }
        ControlInput::RandomPalette => store.generate_random_palette(),
        ControlInput::Slider(id, value) => {
            let v = SliderSpec::of(*id).snap(*value);
            match id {
                SliderId::Alpha => store.set_alpha(v),
                SliderId::ContentSize => store.set_content_size(v),
                SliderId::Speed => store.set_speed(v),
                SliderId::CellSize => store.set_cell_size(v),
                SliderId::Variance => store.set_variance(v),
                SliderId::Levels => store.set_levels(v as u32),
            }
        }
        ControlInput::CustomChannel { index, channel, value } => {
            if !store.set_custom_channel(*index, *channel, *value) {
                bail!("no custom color channel {index}:{channel}");
            }
        }
        ControlInput::CustomHex { index, hex } => {
            if !store.set_custom_hex(*index, hex) {
                bail!("cannot set custom color {index} to `{hex}`");
            }
        }
        ControlInput::BackgroundHex(hex) => {
            if !store.set_background_hex(hex) {
                bail!("invalid background color `{hex}`");
            }
        }
        ControlInput::FieldChannel { secondary, channel, value } => {
            if !store.set_field_channel(*secondary, *channel, *value) {
                bail!("invalid color channel {channel}");
            }
        }
        ControlInput::ToggleAnimation => {
            store.toggle_animating();
        }
    }
    Ok(())
}

/// `(name, label)` pairs for a pattern selector.
pub fn pattern_options(family: PatternFamily) -> Vec<(&'static str, &'static str)> {
    PatternKind::ALL
        .iter()
        .filter(|k| k.family() == family)
        .map(|k| (k.name(), k.label()))
        .collect()
}

/// `(name, label)` pairs for the palette selector, `random` last.
pub fn palette_options(store: &ConfigStore) -> Vec<(String, String)> {
    let mut out: Vec<_> = store.palettes().iter().map(|p| (p.name.clone(), p.label.clone())).collect();
    out.push(("random".to_string(), "Random".to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConfigStore {
        ConfigStore::with_seed(3)
    }

    // ── slider specs ──────────────────────────────────────────────────────

    #[test]
    fn specs_follow_config_ranges() {
        let alpha = SliderSpec::of(SliderId::Alpha);
        assert_eq!((alpha.min, alpha.max), (100.0, 255.0));
        let levels = SliderSpec::of(SliderId::Levels);
        assert_eq!((levels.min, levels.max), (2.0, 10.0));
        assert!(SLIDERS.iter().all(|s| s.min < s.max && s.step > 0.0));
    }

    #[test]
    fn snap_rounds_to_step_and_clamps() {
        let speed = SliderSpec::of(SliderId::Speed);
        assert_eq!(speed.snap(0.803), 0.8);
        assert_eq!(speed.snap(9.0), 1.5);
        assert_eq!(speed.snap(f32::NAN), 0.1);

        let variance = SliderSpec::of(SliderId::Variance);
        assert_eq!(variance.snap(37.0), 35.0);
        assert_eq!(variance.snap(-4.0), 0.0);
    }

    #[test]
    fn track_position_maps_to_value() {
        let alpha = SliderSpec::of(SliderId::Alpha);
        assert_eq!(alpha.value_at(0.0), 100.0);
        assert_eq!(alpha.value_at(1.0), 255.0);
        assert_eq!(alpha.value_at(2.0), 255.0);
        assert!((alpha.normalized(alpha.value_at(0.5)) - 0.5).abs() < 0.01);
    }

    #[test]
    fn captions_show_current_value() {
        let config = Configuration::default();
        assert_eq!(SliderSpec::of(SliderId::Speed).caption(&config), "Animation Speed: 1.00x");
        assert_eq!(SliderSpec::of(SliderId::CellSize).caption(&config), "Pixel Size: 10px");
        assert_eq!(SliderSpec::of(SliderId::Alpha).caption(&config), "Saturation: 255");
    }

    // ── inputs ────────────────────────────────────────────────────────────

    #[test]
    fn slider_input_reaches_store() {
        let mut s = store();
        apply(&mut s, &ControlInput::Slider(SliderId::Speed, 0.456)).unwrap();
        assert_eq!(s.config().speed, 0.46);
        apply(&mut s, &ControlInput::Slider(SliderId::Levels, 7.4)).unwrap();
        assert_eq!(s.config().field.levels, 7);
    }

    #[test]
    fn pattern_is_passed_verbatim() {
        let mut s = store();
        apply(&mut s, &ControlInput::Pattern("nonexistent".into())).unwrap();
        assert_eq!(s.config().pattern, "nonexistent");
    }

    #[test]
    fn rejected_inputs_are_errors() {
        let mut s = store();
        assert!(apply(&mut s, &ControlInput::Palette("nope".into())).is_err());
        assert!(apply(&mut s, &ControlInput::BackgroundHex("#12".into())).is_err());
        assert!(apply(&mut s, &ControlInput::CustomHex { index: 0, hex: "#ffffff".into() }).is_err());

        apply(&mut s, &ControlInput::RandomPalette).unwrap();
        apply(&mut s, &ControlInput::CustomHex { index: 0, hex: "#ffffff".into() }).unwrap();
        apply(&mut s, &ControlInput::CustomChannel { index: 0, channel: 1, value: 10.0 }).unwrap();
        assert_eq!(s.config().custom_colors[0].to_rgb8(), [255, 10, 255]);
        assert!(apply(&mut s, &ControlInput::CustomChannel { index: 0, channel: 3, value: 1.0 }).is_err());
    }

    #[test]
    fn toggle_flips_animating() {
        let mut s = store();
        apply(&mut s, &ControlInput::ToggleAnimation).unwrap();
        assert!(!s.config().animating);
    }

    #[test]
    fn options_list_known_names() {
        let shapes = pattern_options(PatternFamily::Shapes);
        assert!(shapes.iter().any(|(n, _)| *n == "random"));
        assert!(shapes.iter().all(|(n, _)| n.parse::<PatternKind>().is_ok()));

        let palettes = palette_options(&store());
        assert_eq!(palettes.last().map(|p| p.0.as_str()), Some("random"));
        assert!(palettes.iter().any(|(n, _)| n == "color1"));
    }
}
