//! Line plots of a yearly series.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::gradient::Color;
use crate::text::{format_tick, Anchor, TextRenderer};

/// Sizing and colors for line plots.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub background: Color,
    pub line_color: Color,
    pub title_size: f32,
    pub label_size: f32,
    pub ticks: u32,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            margin_left: 80,
            margin_right: 24,
            margin_top: 48,
            margin_bottom: 56,
            background: Color::WHITE,
            line_color: Color::opaque(0x1f, 0x77, 0xb4),
            title_size: 18.0,
            label_size: 12.0,
            ticks: 5,
        }
    }
}

/// Title and axis labels of a line plot.
#[derive(Debug, Clone, Default)]
pub struct SeriesLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Plot area inside the margins.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl PlotArea {
    fn x(&self, t: f32) -> f32 {
        self.left + t * self.width
    }

    fn y(&self, t: f32) -> f32 {
        self.top + (1.0 - t) * self.height
    }
}

/// Render `values` against `years` as a line plot.
///
/// Segments touching a non-finite value are skipped. The y-axis spans the
/// finite values, padded when they are all equal.
pub fn render_timeseries(
    years: &[i32],
    values: &[f32],
    labels: &SeriesLabels,
    style: &SeriesStyle,
    text: Option<&TextRenderer>,
) -> Result<RgbaImage> {
    if years.is_empty() || years.len() != values.len() {
        return Err(RenderError::InvalidInput(format!(
            "time series needs one value per year, got {} years and {} values",
            years.len(),
            values.len()
        )));
    }
    let plot_w = style.width.saturating_sub(style.margin_left + style.margin_right);
    let plot_h = style.height.saturating_sub(style.margin_top + style.margin_bottom);
    if plot_w < 2 || plot_h < 2 {
        return Err(RenderError::InvalidInput(format!(
            "{}x{} image leaves no room for the plot area",
            style.width, style.height
        )));
    }

    let area = PlotArea {
        left: style.margin_left as f32,
        top: style.margin_top as f32,
        width: (plot_w - 1) as f32,
        height: (plot_h - 1) as f32,
    };
    let mut img = RgbaImage::from_pixel(style.width, style.height, style.background.to_rgba());

    let (x_lo, x_hi) = (years[0] as f32, years[years.len() - 1] as f32);
    let (y_lo, y_hi) = value_bounds(values);
    let x_t = |year: i32| {
        if x_hi == x_lo {
            0.5
        } else {
            (year as f32 - x_lo) / (x_hi - x_lo)
        }
    };
    let y_t = |v: f32| (v - y_lo) / (y_hi - y_lo);

    let line: Rgba<u8> = style.line_color.into();
    let points: Vec<Option<(f32, f32)>> = years
        .iter()
        .zip(values)
        .map(|(&year, &v)| v.is_finite().then(|| (area.x(x_t(year)), area.y(y_t(v)))))
        .collect();
    for pair in points.windows(2) {
        if let (Some(a), Some(b)) = (pair[0], pair[1]) {
            draw_line_segment_mut(&mut img, a, b, line);
        }
    }
    if let [Some((x, y))] = points.as_slice() {
        // lone point: draw a small cross so it is visible
        draw_line_segment_mut(&mut img, (x - 3.0, *y), (x + 3.0, *y), line);
        draw_line_segment_mut(&mut img, (*x, y - 3.0), (*x, y + 3.0), line);
    }

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(style.margin_left as i32, style.margin_top as i32).of_size(plot_w, plot_h),
        Color::BLACK.to_rgba(),
    );
    draw_axes(&mut img, &area, style, (x_lo, x_hi), (y_lo, y_hi), labels, text);

    debug!(points = values.len(), "Rendered time series");
    Ok(img)
}

/// Min and max of the finite values, widened when degenerate.
fn value_bounds(values: &[f32]) -> (f32, f32) {
    let (lo, hi) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f32::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn draw_axes(
    img: &mut RgbaImage,
    area: &PlotArea,
    style: &SeriesStyle,
    (x_lo, x_hi): (f32, f32),
    (y_lo, y_hi): (f32, f32),
    labels: &SeriesLabels,
    text: Option<&TextRenderer>,
) {
    let black = Color::BLACK.to_rgba();
    let bottom = area.y(0.0);
    let ticks = style.ticks.max(2);

    for k in 0..ticks {
        let t = k as f32 / (ticks - 1) as f32;

        let x = area.x(t);
        draw_line_segment_mut(img, (x, bottom), (x, bottom + 4.0), black);
        let y = area.y(t);
        draw_line_segment_mut(img, (area.left - 4.0, y), (area.left, y), black);

        if let Some(text) = text {
            let year = (x_lo + t * (x_hi - x_lo)).round();
            text.draw(img, &format!("{:.0}", year), x as i32, bottom as i32 + 8, style.label_size, Anchor::Center, Color::BLACK);
            let value = format_tick(y_lo + t * (y_hi - y_lo), y_hi - y_lo);
            let ty = y as i32 - style.label_size as i32 / 2;
            text.draw(img, &value, area.left as i32 - 8, ty, style.label_size, Anchor::Right, Color::BLACK);
        }
    }

    let Some(text) = text else {
        return;
    };
    let center_x = area.x(0.5) as i32;
    text.draw(
        img,
        &labels.title,
        center_x,
        (style.margin_top as i32 - style.title_size as i32) / 2,
        style.title_size,
        Anchor::Center,
        Color::BLACK,
    );
    text.draw(
        img,
        &labels.x_label,
        center_x,
        style.height as i32 - style.margin_bottom as i32 / 2,
        style.label_size,
        Anchor::Center,
        Color::BLACK,
    );
    text.draw(
        img,
        &labels.y_label,
        4,
        (style.margin_top as i32 - style.label_size as i32) / 2 + style.title_size as i32 / 2,
        style.label_size,
        Anchor::Left,
        Color::BLACK,
    );
}
