//! JSON snapshots of the configuration.
//!
//! Writing goes through serde derives. Reading treats the input as untrusted:
//! the document is parsed into a [`serde_json::Value`] and every field is
//! validated on its own, so one bad field never discards the rest.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SnapshotError;
use crate::paint::{Color, PaletteStore, RANDOM_PALETTE};
use crate::pattern::PatternKind;
use crate::pattern::field::FieldParams;

use super::{
    ALPHA_RANGE, CELL_SIZE_RANGE, CONTENT_SIZE_RANGE, Configuration, LEVELS_RANGE, SPEED_RANGE,
    VARIANCE_RANGE,
};

/// Pattern used when a field snapshot names no valid pattern.
const DEFAULT_FIELD_PATTERN: &str = "wave";

/// Exported configuration: exactly the user-facing shapes settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub current_type: String,
    pub colors: Vec<[u8; 3]>,
    pub alpha: u32,
    pub content_size: u32,
    pub random_colors: Vec<[u8; 3]>,
    pub background_color: String,
    pub custom_colors: Vec<[u8; 3]>,
    pub speed: f32,
}

/// Stored configuration: the export plus palette selection and field settings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    #[serde(flatten)]
    export: ConfigSnapshot,
    selected_palette: String,
    cell_size: u32,
    base_color: [u8; 3],
    second_color: [u8; 3],
    color_variance: f32,
    levels: u32,
}

/// `{ "r": .., "g": .., "b": .. }` color object of the field snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Color> for Rgb {
    fn from(c: Color) -> Self {
        let [r, g, b] = c.to_rgb8();
        Self { r, g, b }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::rgb(c.r, c.g, c.b)
    }
}

/// Field-engine state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSnapshot {
    pub cell_size: u32,
    pub color_variance: f32,
    pub base_color: Rgb,
    pub second_color: Rgb,
    pub animation_type: String,
}

/// Fields replaced or adjusted while restoring a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Missing or invalid fields that fell back to their default.
    pub defaulted: Vec<String>,
    /// Numeric fields clamped into their valid range.
    pub clamped: Vec<String>,
}

impl RestoreReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty() && self.clamped.is_empty()
    }

    fn default_field(&mut self, key: &str, why: &str) {
        log::warn!("snapshot field `{key}` {why}; using default");
        self.defaulted.push(key.to_string());
    }

    fn clamp_field(&mut self, key: &str, from: f64, to: f32) {
        log::warn!("snapshot field `{key}` = {from} out of range; clamped to {to}");
        self.clamped.push(key.to_string());
    }
}

impl fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("restored cleanly");
        }
        let mut parts = Vec::new();
        if !self.defaulted.is_empty() {
            parts.push(format!("defaulted: {}", self.defaulted.join(", ")));
        }
        if !self.clamped.is_empty() {
            parts.push(format!("clamped: {}", self.clamped.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

fn rgb8_list(colors: &[Color]) -> Vec<[u8; 3]> {
    colors.iter().map(|c| c.to_rgb8()).collect()
}

impl ConfigSnapshot {
    pub fn capture(config: &Configuration) -> Self {
        Self {
            current_type: config.pattern.clone(),
            colors: rgb8_list(&config.colors),
            alpha: config.alpha.round() as u32,
            content_size: config.content_size.round() as u32,
            random_colors: rgb8_list(&config.random_colors),
            background_color: config.background.to_hex(),
            custom_colors: rgb8_list(&config.custom_colors),
            speed: config.speed,
        }
    }

    /// Pretty JSON with exactly the exported keys.
    pub fn to_pretty_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON written to storage: the export plus palette selection and field settings.
    pub fn stored_json(config: &Configuration) -> Result<String, SnapshotError> {
        let stored = StoredConfig {
            export: Self::capture(config),
            selected_palette: config.selected_palette.clone(),
            cell_size: config.cell_size.round() as u32,
            base_color: config.field.base.to_rgb8(),
            second_color: config.field.secondary.to_rgb8(),
            color_variance: config.field.variance,
            levels: config.field.levels,
        };
        Ok(serde_json::to_string(&stored)?)
    }

    /// Restores a configuration from untrusted JSON.
    ///
    /// Exported keys are required; a missing or invalid one falls back to its
    /// default and is listed in the report. Stored-only keys are optional and
    /// default silently when absent. Malformed JSON or a non-object document is
    /// an error. The animating flag always comes from `Configuration::default`.
    pub fn restore(json: &str) -> Result<(Configuration, RestoreReport), SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        let obj = value.as_object().ok_or(SnapshotError::NotAnObject)?;
        let defaults = Configuration::default();
        let mut r = Reader::new(obj);

        let pattern = match r.required(&obj_key::CURRENT_TYPE).map(Value::as_str) {
            Some(Some(name)) if name.parse::<PatternKind>().is_ok() => name.to_string(),
            Some(_) => {
                r.report.default_field(obj_key::CURRENT_TYPE.0, "is not a supported pattern");
                defaults.pattern.clone()
            }
            None => defaults.pattern.clone(),
        };

        let colors = r.palette(&obj_key::COLORS, false).unwrap_or_else(|| defaults.colors.clone());
        let random_colors = r.palette(&obj_key::RANDOM_COLORS, true).unwrap_or_default();
        let custom_colors = r.palette(&obj_key::CUSTOM_COLORS, true).unwrap_or_default();
        let alpha = r.number(&obj_key::ALPHA, &ALPHA_RANGE).map(f32::round).unwrap_or(defaults.alpha);
        let content_size = r
            .number(&obj_key::CONTENT_SIZE, &CONTENT_SIZE_RANGE)
            .map(f32::round)
            .unwrap_or(defaults.content_size);
        let speed = r.number(&obj_key::SPEED, &SPEED_RANGE).unwrap_or(defaults.speed);
        let background = r.hex(&obj_key::BACKGROUND).unwrap_or(defaults.background);

        let selected_palette = match r.optional(&obj_key::SELECTED_PALETTE).map(Value::as_str) {
            Some(Some(name)) if name == RANDOM_PALETTE || PaletteStore::builtin().lookup(name).is_some() => {
                name.to_string()
            }
            Some(_) => {
                r.report.default_field(obj_key::SELECTED_PALETTE.0, "names no palette");
                defaults.selected_palette.clone()
            }
            None => defaults.selected_palette.clone(),
        };
        let cell_size = r
            .number(&obj_key::CELL_SIZE, &CELL_SIZE_RANGE)
            .map(f32::round)
            .unwrap_or(defaults.cell_size);
        let base = r.color(&obj_key::BASE_COLOR).unwrap_or(defaults.field.base);
        let secondary = r.color(&obj_key::SECOND_COLOR).unwrap_or(defaults.field.secondary);
        let variance = r.number(&obj_key::COLOR_VARIANCE, &VARIANCE_RANGE).unwrap_or(defaults.field.variance);
        let levels = r.levels(&obj_key::LEVELS).unwrap_or(defaults.field.levels);

        let config = Configuration {
            pattern,
            selected_palette,
            colors,
            random_colors,
            custom_colors,
            alpha,
            content_size,
            cell_size,
            speed,
            background,
            animating: defaults.animating,
            field: FieldParams { base, secondary, variance, levels },
        };
        Ok((config, r.report))
    }
}

impl FieldSnapshot {
    pub fn capture(config: &Configuration) -> Self {
        Self {
            cell_size: config.cell_size.round() as u32,
            color_variance: config.field.variance,
            base_color: config.field.base.into(),
            second_color: config.field.secondary.into(),
            animation_type: config.pattern.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Applies a field snapshot from untrusted JSON on top of `base`.
    ///
    /// All five keys are required; invalid or missing ones take their defaults.
    pub fn restore(json: &str, base: &Configuration) -> Result<(Configuration, RestoreReport), SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        let obj = value.as_object().ok_or(SnapshotError::NotAnObject)?;
        let defaults = Configuration::default();
        let mut r = Reader::new(obj);
        let mut config = base.clone();

        config.cell_size = r
            .number(&field_key::CELL_SIZE, &CELL_SIZE_RANGE)
            .map(f32::round)
            .unwrap_or(defaults.cell_size);
        config.field.variance = r
            .number(&field_key::COLOR_VARIANCE, &VARIANCE_RANGE)
            .unwrap_or(defaults.field.variance);
        config.field.base = r.color(&field_key::BASE_COLOR).unwrap_or(defaults.field.base);
        config.field.secondary = r.color(&field_key::SECOND_COLOR).unwrap_or(defaults.field.secondary);
        config.pattern = match r.required(&field_key::ANIMATION_TYPE).map(Value::as_str) {
            Some(Some(name)) if name.parse::<PatternKind>().is_ok() => name.to_string(),
            Some(_) => {
                r.report.default_field(field_key::ANIMATION_TYPE.0, "is not a supported pattern");
                DEFAULT_FIELD_PATTERN.to_string()
            }
            None => DEFAULT_FIELD_PATTERN.to_string(),
        };

        Ok((config, r.report))
    }
}

/// A snapshot key and whether it must be present.
#[derive(Debug, Copy, Clone)]
struct Key(&'static str, bool);

mod obj_key {
    use super::Key;

    pub const CURRENT_TYPE: Key = Key("currentType", true);
    pub const COLORS: Key = Key("colors", true);
    pub const ALPHA: Key = Key("alpha", true);
    pub const CONTENT_SIZE: Key = Key("contentSize", true);
    pub const RANDOM_COLORS: Key = Key("randomColors", true);
    pub const BACKGROUND: Key = Key("backgroundColor", true);
    pub const CUSTOM_COLORS: Key = Key("customColors", true);
    pub const SPEED: Key = Key("speed", true);

    pub const SELECTED_PALETTE: Key = Key("selectedPalette", false);
    pub const CELL_SIZE: Key = Key("cellSize", false);
    pub const BASE_COLOR: Key = Key("baseColor", false);
    pub const SECOND_COLOR: Key = Key("secondColor", false);
    pub const COLOR_VARIANCE: Key = Key("colorVariance", false);
    pub const LEVELS: Key = Key("levels", false);
}

mod field_key {
    use super::Key;

    pub const CELL_SIZE: Key = Key("cellSize", true);
    pub const COLOR_VARIANCE: Key = Key("colorVariance", true);
    pub const BASE_COLOR: Key = Key("baseColor", true);
    pub const SECOND_COLOR: Key = Key("secondColor", true);
    pub const ANIMATION_TYPE: Key = Key("animationType", true);
}

/// Per-field validating reader over a JSON object.
///
/// Each accessor returns `None` when the caller should use the default, having
/// already recorded why in the report.
struct Reader<'a> {
    obj: &'a Map<String, Value>,
    report: RestoreReport,
}

impl<'a> Reader<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self { obj, report: RestoreReport::default() }
    }

    fn lookup(&mut self, key: &Key) -> Option<&'a Value> {
        let obj: &'a Map<String, Value> = self.obj;
        match obj.get(key.0) {
            Some(Value::Null) | None => {
                if key.1 {
                    self.report.default_field(key.0, "is missing");
                }
                None
            }
            Some(v) => Some(v),
        }
    }

    fn required(&mut self, key: &Key) -> Option<&'a Value> {
        debug_assert!(key.1);
        self.lookup(key)
    }

    fn optional(&mut self, key: &Key) -> Option<&'a Value> {
        self.lookup(key)
    }

    fn number(&mut self, key: &Key, range: &RangeInclusive<f32>) -> Option<f32> {
        let v = self.lookup(key)?;
        let Some(n) = v.as_f64().filter(|n| n.is_finite()) else {
            self.report.default_field(key.0, "is not a number");
            return None;
        };
        let clamped = (n as f32).clamp(*range.start(), *range.end());
        if !range.contains(&(n as f32)) {
            self.report.clamp_field(key.0, n, clamped);
        }
        Some(clamped)
    }

    fn levels(&mut self, key: &Key) -> Option<u32> {
        let v = self.lookup(key)?;
        let Some(n) = v.as_u64() else {
            self.report.default_field(key.0, "is not a whole number");
            return None;
        };
        let clamped = n.clamp(u64::from(*LEVELS_RANGE.start()), u64::from(*LEVELS_RANGE.end())) as u32;
        if u64::from(clamped) != n {
            self.report.clamp_field(key.0, n as f64, clamped as f32);
        }
        Some(clamped)
    }

    fn hex(&mut self, key: &Key) -> Option<Color> {
        let v = self.lookup(key)?;
        let parsed = v.as_str().and_then(Color::from_hex);
        if parsed.is_none() {
            self.report.default_field(key.0, "is not a #rrggbb color");
        }
        parsed
    }

    fn color(&mut self, key: &Key) -> Option<Color> {
        let v = self.lookup(key)?;
        let parsed = parse_color(v);
        if parsed.is_none() {
            self.report.default_field(key.0, "is not a color");
        }
        parsed
    }

    /// A list of colors; `allow_empty` decides whether `[]` is valid.
    fn palette(&mut self, key: &Key, allow_empty: bool) -> Option<Vec<Color>> {
        let v = self.lookup(key)?;
        let parsed = v
            .as_array()
            .and_then(|items| items.iter().map(parse_color).collect::<Option<Vec<_>>>())
            .filter(|colors| allow_empty || !colors.is_empty());
        if parsed.is_none() {
            self.report.default_field(key.0, "is not a list of colors");
        }
        parsed
    }
}

/// Accepts `[r, g, b]` or `{ "r", "g", "b" }` with channels in `0..=255`.
fn parse_color(v: &Value) -> Option<Color> {
    let channel = |c: Option<&Value>| -> Option<f32> {
        let n = c?.as_f64()?;
        (0.0..=255.0).contains(&n).then(|| n.round() as f32)
    };
    match v {
        Value::Array(items) if items.len() == 3 => {
            Some(Color::new(channel(items.first())?, channel(items.get(1))?, channel(items.get(2))?))
        }
        Value::Object(map) => Some(Color::new(
            channel(map.get("r"))?,
            channel(map.get("g"))?,
            channel(map.get("b"))?,
        )),
        _ => None,
    }
}
