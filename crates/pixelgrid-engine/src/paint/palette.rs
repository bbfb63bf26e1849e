use rand::Rng;

use super::gradient::palette_index_by_ratio;
use super::Color;

/// Selection name used for a transient random palette.
pub const RANDOM_PALETTE: &str = "random";

/// Number of colors in a generated random palette.
pub const RANDOM_PALETTE_LEN: usize = 10;

const COLOR1: &[Color] = &[
    Color::rgb(0, 0, 0),
    Color::rgb(0, 0, 5),
    Color::rgb(41, 10, 83),
    Color::rgb(57, 9, 98),
    Color::rgb(113, 26, 109),
    Color::rgb(169, 45, 93),
    Color::rgb(234, 103, 37),
    Color::rgb(250, 181, 26),
    Color::rgb(242, 225, 90),
    Color::rgb(252, 254, 165),
];

const COLOR2: &[Color] = &[
    Color::rgb(41, 10, 83),
    Color::rgb(113, 26, 109),
    Color::rgb(234, 103, 37),
    Color::rgb(250, 181, 26),
    Color::rgb(242, 225, 90),
];

const COLOR3: &[Color] = &[
    Color::rgb(234, 103, 37),
    Color::rgb(250, 181, 26),
    Color::rgb(242, 225, 90),
    Color::rgb(0, 0, 0),
    Color::rgb(0, 0, 5),
    Color::rgb(41, 10, 83),
];

/// Named, ordered list of colors.
///
/// Order defines the gradient axis used by distance-based patterns. Built-in
/// palettes are never empty; a palette restored from untrusted input may be,
/// and pattern code must check [`is_empty`](Self::is_empty) before indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub label: String,
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn new(name: impl Into<String>, label: impl Into<String>, colors: Vec<Color>) -> Self {
        Self { name: name.into(), label: label.into(), colors }
    }

    /// An empty palette; the fallback for unknown names.
    pub fn empty() -> Self {
        Self::new("", "", Vec::new())
    }

    /// A transient palette of `len` uniformly random colors.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let colors = (0..len).map(|_| random_color(rng)).collect();
        Self::new(RANDOM_PALETTE, "Random", colors)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index for `ratio` in `[0, 1]`, or `None` when the palette is empty.
    #[inline]
    pub fn index_by_ratio(&self, ratio: f32) -> Option<usize> {
        (!self.is_empty()).then(|| palette_index_by_ratio(self.len(), ratio))
    }

    #[inline]
    pub fn color_at_ratio(&self, ratio: f32) -> Option<Color> {
        self.index_by_ratio(ratio).map(|i| self.colors[i])
    }
}

/// Uniformly random 8-bit color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::rgb(rng.gen_range(0..=255), rng.gen_range(0..=255), rng.gen_range(0..=255))
}

/// Immutable lookup table of the built-in palettes.
#[derive(Debug, Clone)]
pub struct PaletteStore {
    palettes: Vec<Palette>,
}

impl PaletteStore {
    /// The three built-in palettes: `color1`, `color2`, `color3`.
    pub fn builtin() -> Self {
        Self {
            palettes: vec![
                Palette::new("color1", "Palette A", COLOR1.to_vec()),
                Palette::new("color2", "Palette B", COLOR2.to_vec()),
                Palette::new("color3", "Palette C", COLOR3.to_vec()),
            ],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name == name)
    }

    /// Like [`lookup`](Self::lookup) but falls back to an empty palette.
    pub fn resolve(&self, name: &str) -> Palette {
        match self.lookup(name) {
            Some(p) => p.clone(),
            None => {
                log::warn!("unknown palette `{name}`, using an empty palette");
                Palette::empty()
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }

    /// Name of the palette used for a fresh configuration.
    pub const fn default_name() -> &'static str {
        "color1"
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn builtin_palettes_are_non_empty() {
        let store = PaletteStore::builtin();
        assert_eq!(store.names().collect::<Vec<_>>(), ["color1", "color2", "color3"]);
        assert!(store.iter().all(|p| !p.is_empty() && p.colors.iter().all(|c| c.in_gamut())));
    }

    #[test]
    fn lookup_known_and_unknown() {
        let store = PaletteStore::builtin();
        assert_eq!(store.lookup("color2").map(Palette::len), Some(5));
        assert!(store.lookup("nope").is_none());
        assert!(store.resolve("nope").is_empty());
    }

    #[test]
    fn default_palette_exists() {
        assert!(PaletteStore::builtin().lookup(PaletteStore::default_name()).is_some());
    }

    #[test]
    fn color_at_ratio_walks_gradient_axis() {
        let p = PaletteStore::builtin().resolve("color1");
        assert_eq!(p.color_at_ratio(0.0), Some(Color::rgb(0, 0, 0)));
        assert_eq!(p.color_at_ratio(1.0), Some(Color::rgb(252, 254, 165)));
        assert_eq!(Palette::empty().color_at_ratio(0.5), None);
    }

    #[test]
    fn random_palette_has_requested_len() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = Palette::random(&mut rng, RANDOM_PALETTE_LEN);
        assert_eq!(p.len(), 10);
        assert_eq!(p.name, RANDOM_PALETTE);
        assert!(p.colors.iter().all(|c| c.in_gamut()));
    }
}
