//! Color ramps and gradient rendering for gridded fields.

use image::Rgba;

use crate::error::{RenderError, Result};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        c.to_rgba()
    }
}

/// Linear color interpolation, `t` clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Piecewise-linear colormap over normalized positions in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<(f32, Color)>,
}

impl ColorRamp {
    /// Build a ramp from `(value, color)` stops in any units.
    ///
    /// Stop values are rescaled so the lowest sits at 0 and the highest at 1.
    pub fn new(mut stops: Vec<(f32, Color)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(RenderError::Style("color ramp needs at least one stop".to_string()));
        }
        if stops.iter().any(|(v, _)| !v.is_finite()) {
            return Err(RenderError::Style("color stop values must be finite".to_string()));
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lo = stops[0].0;
        let span = stops[stops.len() - 1].0 - lo;
        for stop in &mut stops {
            stop.0 = if span > 0.0 { (stop.0 - lo) / span } else { 0.0 };
        }
        Ok(Self { stops })
    }

    /// Five-stop perceptually uniform ramp, dark purple to yellow.
    pub fn viridis() -> Self {
        Self {
            stops: vec![
                (0.00, Color::opaque(0x44, 0x01, 0x54)),
                (0.25, Color::opaque(0x3b, 0x52, 0x8b)),
                (0.50, Color::opaque(0x21, 0x91, 0x8c)),
                (0.75, Color::opaque(0x5e, 0xc9, 0x62)),
                (1.00, Color::opaque(0xfd, 0xe7, 0x25)),
            ],
        }
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }

    /// Color at normalized position `t`; outside [0, 1] takes the end colors.
    pub fn color_at(&self, t: f32) -> Color {
        let first = self.stops[0];
        if t <= first.0 || t.is_nan() {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.0 {
                let width = hi.0 - lo.0;
                let local = if width > 0.0 { (t - lo.0) / width } else { 1.0 };
                return interpolate_color(lo.1, hi.1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::viridis()
    }
}

/// Normalize `value` into [0, 1] over `[min_val, max_val]`.
///
/// A degenerate range maps everything to the middle of the ramp.
pub fn normalize(value: f32, min_val: f32, max_val: f32) -> f32 {
    let range = max_val - min_val;
    if range.abs() < f32::EPSILON {
        return 0.5;
    }
    ((value - min_val) / range).clamp(0.0, 1.0)
}
