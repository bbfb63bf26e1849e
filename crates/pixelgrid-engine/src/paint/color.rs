use serde::{Deserialize, Serialize};

/// RGB color with channels nominally in `0.0..=255.0`.
///
/// Invariant:
/// - none at construction; interpolation may push channels out of range.
///
/// Channels are clamped (and rounded) only when a [`FillStyle`] is built, which is
/// the renderer's single point of use. Alpha is never stored on the color; it is a
/// separate scalar on the same 0–255 scale.
///
/// Serialized as a JSON array `[r, g, b]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from 8-bit channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32, g as f32, b as f32)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// True when every channel is finite and inside `0.0..=255.0`.
    #[inline]
    pub fn in_gamut(self) -> bool {
        [self.r, self.g, self.b].iter().all(|c| (0.0..=255.0).contains(c))
    }

    /// Clamps all channels to `[0, 255]`. NaN channels become 0.
    #[inline]
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 255.0) };
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    /// Rounds to the nearest 8-bit value per channel after clamping.
    #[inline]
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.clamped();
        [c.r.round() as u8, c.g.round() as u8, c.b.round() as u8]
    }

    /// Adds `delta` to every channel, unclamped.
    #[inline]
    pub fn offset(self, delta: f32) -> Self {
        Self::new(self.r + delta, self.g + delta, self.b + delta)
    }

    /// Returns the channel at index 0 (red), 1 (green) or 2 (blue).
    #[inline]
    pub fn channel(self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.r),
            1 => Some(self.g),
            2 => Some(self.b),
            _ => None,
        }
    }

    /// Returns a copy with one channel replaced. Out-of-range indices leave the color unchanged.
    #[inline]
    pub fn with_channel(mut self, index: usize, value: f32) -> Self {
        match index {
            0 => self.r = value,
            1 => self.g = value,
            2 => self.b = value,
            _ => {}
        }
        self
    }

    /// Parses `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Fill style handed to a raster surface: 8-bit RGB plus straight alpha in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FillStyle {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl FillStyle {
    #[inline]
    pub fn opaque(color: Color) -> Self {
        Self::new(color, 255.0)
    }

    /// Builds a fill from a color and an alpha on the 0–255 scale; both are clamped.
    #[inline]
    pub fn new(color: Color, alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 255.0) };
        Self {
            rgb: color.to_rgb8(),
            alpha: alpha / 255.0,
        }
    }

    /// Alpha as an 8-bit value.
    #[inline]
    pub fn alpha_u8(self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}
