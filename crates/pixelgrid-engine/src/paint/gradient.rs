use super::Color;

/// Linear blend from `a` to `b`.
///
/// `channel = a + (b - a) * t` per channel. The result is not clamped: callers
/// that allow `t` outside `[0, 1]` must clamp before painting (building a
/// [`FillStyle`](super::FillStyle) does this).
#[inline]
pub fn lerp(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
    )
}

/// Maps `ratio` in `[0, 1]` onto a palette of `len` entries.
///
/// Computes `floor(ratio * (len - 1))` and clamps into `[0, len - 1]`, so ratios
/// outside the unit range and NaN still produce a valid index. `len == 0` yields 0;
/// callers must check for an empty palette before indexing.
#[inline]
pub fn palette_index_by_ratio(len: usize, ratio: f32) -> usize {
    if len <= 1 || ratio.is_nan() {
        return 0;
    }
    let last = len - 1;
    let raw = (ratio * last as f32).floor();
    if raw <= 0.0 {
        0
    } else if raw >= last as f32 {
        last
    } else {
        raw as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn channel() -> impl Strategy<Value = f32> {
        (0u8..=255).prop_map(f32::from)
    }

    fn color() -> impl Strategy<Value = Color> {
        (channel(), channel(), channel()).prop_map(|(r, g, b)| Color::new(r, g, b))
    }

    #[test]
    fn lerp_midpoint() {
        let c = lerp(Color::rgb(0, 100, 200), Color::rgb(100, 200, 0), 0.5);
        assert_eq!(c, Color::new(50.0, 150.0, 100.0));
    }

    #[test]
    fn lerp_extrapolates_unclamped() {
        let c = lerp(Color::rgb(0, 0, 0), Color::rgb(200, 200, 200), 1.5);
        assert_eq!(c.r, 300.0);
        assert_eq!(c.clamped().r, 255.0);
    }

    #[test]
    fn index_examples() {
        assert_eq!(palette_index_by_ratio(10, 0.0), 0);
        assert_eq!(palette_index_by_ratio(10, 0.5), 4);
        assert_eq!(palette_index_by_ratio(10, 1.0), 9);
        assert_eq!(palette_index_by_ratio(1, 0.7), 0);
    }

    #[test]
    fn index_out_of_range_ratios_clamp() {
        assert_eq!(palette_index_by_ratio(5, -3.0), 0);
        assert_eq!(palette_index_by_ratio(5, 7.0), 4);
        assert_eq!(palette_index_by_ratio(5, f32::NAN), 0);
        assert_eq!(palette_index_by_ratio(5, f32::INFINITY), 4);
    }

    proptest! {
        #[test]
        fn index_is_always_in_bounds(len in 1usize..64, ratio in 0.0f32..=1.0) {
            prop_assert!(palette_index_by_ratio(len, ratio) < len);
        }

        #[test]
        fn lerp_hits_endpoints(a in color(), b in color()) {
            prop_assert_eq!(lerp(a, b, 0.0), a);
            prop_assert_eq!(lerp(a, b, 1.0), b);
        }
    }
}
