//! Choropleth color scales.
//!
//! Lookup is a step function over the scale's stops, not a smooth blend:
//! a value whose normalized position falls in `[stop[i].t, stop[i+1].t)`
//! takes `stop[i]`'s color exactly. The visible banding matches the
//! observed behavior of the tool this replaces; a smooth mode, if ever
//! wanted, belongs as an explicit alternate rather than a change of
//! default.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, ensure};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parse a CSS hex color, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let bytes = hex::decode(digits)
            .with_context(|| format!("Invalid hex color: {s}"))?;
        ensure!(bytes.len() == 3, "Expected 6 hex digits in color: {s}");
        Ok(Rgb { r: bytes[0], g: bytes[1], b: bytes[2] })
    }
}

/// One stop of a color scale: normalized position `t` in [0, 1] plus the
/// color used for the whole `[t, next_t)` bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

/// An ordered sequence of stops, strictly increasing in `t`, spanning
/// `t = 0` through `t = 1`. Stops are fixed at construction; only the
/// metric range and input value vary per call.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        ensure!(stops.len() >= 2, "Color scale needs at least two stops");
        ensure!(stops[0].t == 0.0, "First stop must sit at t = 0");
        ensure!(stops[stops.len() - 1].t == 1.0, "Last stop must sit at t = 1");
        ensure!(
            stops.windows(2).all(|pair| pair[0].t < pair[1].t),
            "Stop positions must be strictly increasing"
        );
        Ok(ColorScale { stops })
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Sequential six-stop Blues ramp for one-sided metrics such as
    /// minority population share.
    pub fn sequential_blues() -> Self {
        Self::from_hex(&["#f7fbff", "#c6dbef", "#6baed6", "#3182bd", "#08519c", "#08306b"])
    }

    /// Diverging red-to-blue ramp for two-sided metrics such as Democratic
    /// vote share, where 50% is the meaningful midpoint.
    pub fn diverging_red_blue() -> Self {
        Self::from_hex(&["#b2182b", "#ef8a62", "#fddbc7", "#d1e5f0", "#67a9cf", "#2166ac"])
    }

    /// Evenly spaced stops from hex colors. Only used with literal
    /// palettes, so construction failures are programming errors.
    fn from_hex(colors: &[&str]) -> Self {
        let last = (colors.len() - 1) as f64;
        let stops = colors.iter().enumerate()
            .map(|(i, s)| ColorStop { t: i as f64 / last, color: s.parse().unwrap() })
            .collect();
        ColorScale::new(stops).unwrap()
    }

    /// Fixed color returned for a degenerate metric range.
    #[inline]
    pub fn mid_color(&self) -> Rgb {
        self.stops[self.stops.len() / 2].color
    }

    /// Map a metric value through the scale given the observed `(min, max)`
    /// range. A degenerate range (`min == max`) yields the fixed mid-scale
    /// color; anything outside the range clamps rather than extrapolating.
    /// Never fails.
    pub fn color_for(&self, value: f64, range: (f64, f64)) -> Rgb {
        let (min, max) = range;
        if min == max {
            return self.mid_color();
        }
        self.step((value - min) / (max - min))
    }

    /// Map a percentage in [0, 100] directly (not range-normalized), for
    /// metrics with a fixed meaningful midpoint. Callers choose this over
    /// `color_for` per selected metric, never automatically.
    pub fn color_for_pct(&self, pct: f64) -> Rgb {
        self.step(pct / 100.0)
    }

    /// Step lookup: the highest stop with `stop.t <= t`, after clamping
    /// `t` into [0, 1]. NaN clamps to the bottom of the scale.
    fn step(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.stops.iter()
            .rev()
            .find(|stop| stop.t <= t)
            .unwrap_or(&self.stops[0])
            .color
    }
}

/// Observed `(min, max)` of a metric, computed once per rendering pass.
/// Consumers re-derive this at load time rather than trusting bounds
/// stored in a file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    /// Single-pass min/max over the values being colored. Non-finite
    /// values are ignored; `None` when nothing remains.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut range: Option<MetricRange> = None;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            range = Some(match range {
                None => MetricRange { min: value, max: value },
                Some(r) => MetricRange { min: r.min.min(value), max: r.max.max(value) },
            });
        }
        range
    }

    #[inline]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_and_display_round_trip() {
        let color: Rgb = "#08306b".parse().unwrap();
        assert_eq!(color, Rgb { r: 0x08, g: 0x30, b: 0x6b });
        assert_eq!(color.to_string(), "#08306b");
        assert_eq!("f7fbff".parse::<Rgb>().unwrap().to_string(), "#f7fbff");
        assert!("#08306".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
    }

    #[test]
    fn scale_construction_enforces_invariants() {
        let red = Rgb { r: 255, g: 0, b: 0 };
        assert!(ColorScale::new(vec![ColorStop { t: 0.0, color: red }]).is_err());
        assert!(ColorScale::new(vec![
            ColorStop { t: 0.1, color: red },
            ColorStop { t: 1.0, color: red },
        ]).is_err());
        assert!(ColorScale::new(vec![
            ColorStop { t: 0.0, color: red },
            ColorStop { t: 0.5, color: red },
            ColorStop { t: 0.5, color: red },
            ColorStop { t: 1.0, color: red },
        ]).is_err());
    }

    #[test]
    fn degenerate_range_returns_mid_color_for_every_scale() {
        for scale in [ColorScale::sequential_blues(), ColorScale::diverging_red_blue()] {
            for value in [-3.0, 0.0, 42.0] {
                assert_eq!(scale.color_for(value, (42.0, 42.0)), scale.mid_color());
            }
        }
    }

    #[test]
    fn midpoint_falls_in_expected_bucket() {
        // value = 50 over (0, 100): t = 0.5 lies in [0.4, 0.6), the third
        // stop of the six-stop Blues ramp.
        let scale = ColorScale::sequential_blues();
        let expected: Rgb = "#6baed6".parse().unwrap();
        assert_eq!(scale.color_for(50.0, (0.0, 100.0)), expected);
    }

    #[test]
    fn color_changes_exactly_at_stop_boundaries() {
        let scale = ColorScale::sequential_blues();
        let range = (0.0, 100.0);
        let below: Rgb = "#c6dbef".parse().unwrap();
        let at: Rgb = "#6baed6".parse().unwrap();
        assert_eq!(scale.color_for(39.999, range), below);
        assert_eq!(scale.color_for(40.0, range), at);
        assert_eq!(scale.color_for(59.999, range), at);
        assert_ne!(scale.color_for(60.0, range), at);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let scale = ColorScale::sequential_blues();
        let bottom = scale.stops()[0].color;
        let top = scale.stops()[scale.stops().len() - 1].color;
        assert_eq!(scale.color_for(-10.0, (0.0, 100.0)), bottom);
        assert_eq!(scale.color_for(250.0, (0.0, 100.0)), top);
        assert_eq!(scale.color_for(f64::NAN, (0.0, 100.0)), bottom);
    }

    #[test]
    fn diverging_variant_maps_percentage_directly() {
        let scale = ColorScale::diverging_red_blue();
        assert_eq!(scale.color_for_pct(0.0), scale.stops()[0].color);
        assert_eq!(scale.color_for_pct(100.0), scale.stops()[5].color);
        assert_eq!(scale.color_for_pct(150.0), scale.stops()[5].color);
        // 50% falls in the [0.4, 0.6) bucket.
        assert_eq!(scale.color_for_pct(50.0), scale.stops()[2].color);
    }

    #[test]
    fn metric_range_single_pass() {
        let range = MetricRange::from_values([3.0, f64::NAN, -1.0, 7.5]).unwrap();
        assert_eq!(range.as_tuple(), (-1.0, 7.5));
        assert!(!range.is_degenerate());
        assert!(MetricRange::from_values([f64::NAN]).is_none());
        assert!(MetricRange::from_values([5.0, 5.0]).unwrap().is_degenerate());
    }
}
