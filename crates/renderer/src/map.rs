//! Gridded map plots with a vertical colorbar.
//!
//! Layout, in pixels:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  title                       │
//! │ ┌──────────────────────────┐   ┌──┐ max      │
//! │ │                          │   │  │          │
//! │ │   grid, row 0 at bottom  │   │  │ ...      │
//! │ │                          │   │  │          │
//! │ └──────────────────────────┘   └──┘ min      │
//! └──────────────────────────────────────────────┘
//! ```

use climate_common::MaskedGrid;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::gradient::{normalize, Color, ColorRamp};
use crate::text::{format_tick, Anchor, TextRenderer};

/// Largest map edge accepted, in pixels.
const MAX_MAP_EDGE: u64 = 16_384;

/// Sizing and colors for map plots.
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Edge length of one grid cell in pixels
    pub cell_size: u32,
    pub margin: u32,
    pub title_height: u32,
    pub colorbar_gap: u32,
    pub colorbar_width: u32,
    /// Room right of the colorbar for tick labels
    pub label_width: u32,
    pub title_size: f32,
    pub label_size: f32,
    pub ticks: u32,
    pub ramp: ColorRamp,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            cell_size: 4,
            margin: 16,
            title_height: 32,
            colorbar_gap: 16,
            colorbar_width: 20,
            label_width: 72,
            title_size: 18.0,
            label_size: 12.0,
            ticks: 5,
            ramp: ColorRamp::viridis(),
        }
    }
}

/// Pixel rectangle occupied by the grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapFrame {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl MapStyle {
    /// Where the grid lands for a `height x width` grid.
    pub fn frame(&self, grid_height: usize, grid_width: usize) -> Result<MapFrame> {
        let cell = u64::from(self.cell_size);
        let w = grid_width as u64 * cell;
        let h = grid_height as u64 * cell;
        if w == 0 || h == 0 {
            return Err(RenderError::InvalidInput(format!(
                "cannot plot a {}x{} grid at cell size {}",
                grid_height, grid_width, self.cell_size
            )));
        }
        if w > MAX_MAP_EDGE || h > MAX_MAP_EDGE {
            return Err(RenderError::InvalidInput(format!(
                "map of {}x{} pixels exceeds the {} pixel limit",
                w, h, MAX_MAP_EDGE
            )));
        }
        Ok(MapFrame {
            left: self.margin,
            top: self.margin + self.title_height,
            width: w as u32,
            height: h as u32,
        })
    }

    fn image_size(&self, frame: &MapFrame) -> (u32, u32) {
        let width = frame.left
            + frame.width
            + self.colorbar_gap
            + self.colorbar_width
            + self.label_width
            + self.margin;
        let height = frame.top + frame.height + self.margin;
        (width, height)
    }
}

/// Render a masked grid as a colored map.
///
/// Each cell becomes a `cell_size` square block with grid row 0 drawn at
/// the bottom. Masked and non-finite cells stay transparent. Colors span the
/// min/max of the valid cells; a fully masked grid yields an empty frame
/// without a colorbar.
pub fn render_map(
    grid: &MaskedGrid,
    title: &str,
    style: &MapStyle,
    text: Option<&TextRenderer>,
) -> Result<RgbaImage> {
    let shape = grid.shape();
    let frame = style.frame(shape.height, shape.width)?;
    let (img_w, img_h) = style.image_size(&frame);
    let mut img = RgbaImage::from_pixel(img_w, img_h, Rgba([0, 0, 0, 0]));

    let range = grid.value_range();
    if let Some((lo, hi)) = range {
        let cell = style.cell_size;
        for row in 0..shape.height {
            // origin-lower: grid row 0 is the bottom pixel row
            let y0 = frame.top + (shape.height - 1 - row) as u32 * cell;
            for col in 0..shape.width {
                let Some(value) = grid.get(row, col).filter(|v| v.is_finite()) else {
                    continue;
                };
                let color = style.ramp.color_at(normalize(value, lo, hi));
                fill_block(&mut img, frame.left + col as u32 * cell, y0, cell, cell, color);
            }
        }
        draw_colorbar(&mut img, &frame, style, lo, hi, text);
    } else {
        warn!(title = title, "No valid cells to plot");
    }

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(frame.left as i32 - 1, frame.top as i32 - 1).of_size(frame.width + 2, frame.height + 2),
        Color::BLACK.to_rgba(),
    );

    if let Some(text) = text {
        let x = (frame.left + frame.width / 2) as i32;
        let y = style.margin as i32 + (style.title_height as i32 - style.title_size as i32) / 2;
        text.draw(&mut img, title, x, y, style.title_size, Anchor::Center, Color::BLACK);
    }

    debug!(
        width = img_w,
        height = img_h,
        valid_cells = grid.valid_count(),
        "Rendered map"
    );
    Ok(img)
}

fn draw_colorbar(
    img: &mut RgbaImage,
    frame: &MapFrame,
    style: &MapStyle,
    lo: f32,
    hi: f32,
    text: Option<&TextRenderer>,
) {
    let left = frame.left + frame.width + style.colorbar_gap;
    let top = frame.top;
    let height = frame.height;
    let last = height.saturating_sub(1).max(1) as f32;

    for py in 0..height {
        let t = 1.0 - py as f32 / last;
        fill_block(img, left, top + py, style.colorbar_width, 1, style.ramp.color_at(t));
    }
    draw_hollow_rect_mut(
        img,
        Rect::at(left as i32, top as i32).of_size(style.colorbar_width, height),
        Color::BLACK.to_rgba(),
    );

    let right = (left + style.colorbar_width) as f32;
    let ticks = style.ticks.max(2);
    for k in 0..ticks {
        let t = k as f32 / (ticks - 1) as f32;
        let y = top as f32 + (1.0 - t) * last;
        draw_line_segment_mut(img, (right, y), (right + 4.0, y), Color::BLACK.to_rgba());

        if let Some(text) = text {
            let label = format_tick(lo + t * (hi - lo), hi - lo);
            let ty = y as i32 - style.label_size as i32 / 2;
            text.draw(img, &label, right as i32 + 6, ty, style.label_size, Anchor::Left, Color::BLACK);
        }
    }
}

/// Fill a `w x h` block with its top-left corner at `(x, y)`, clipped to the image.
pub(crate) fn fill_block(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Color) {
    let rgba = color.to_rgba();
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::GridShape;

    fn style() -> MapStyle {
        MapStyle {
            cell_size: 2,
            ..MapStyle::default()
        }
    }

    fn pixel_at_cell(img: &RgbaImage, frame: &MapFrame, x_cell: u32, y_cell_from_top: u32, cell: u32) -> Rgba<u8> {
        *img.get_pixel(frame.left + x_cell * cell, frame.top + y_cell_from_top * cell)
    }

    #[test]
    fn test_row_zero_drawn_at_bottom() {
        // 2 rows: row 0 low values, row 1 high values
        let grid = MaskedGrid::new(GridShape::new(2, 1), vec![0.0, 1.0], vec![false, false]).unwrap();
        let style = style();
        let img = render_map(&grid, "t", &style, None).unwrap();
        let frame = style.frame(2, 1).unwrap();

        let top = pixel_at_cell(&img, &frame, 0, 0, 2);
        let bottom = pixel_at_cell(&img, &frame, 0, 1, 2);
        assert_eq!(top, style.ramp.color_at(1.0).to_rgba());
        assert_eq!(bottom, style.ramp.color_at(0.0).to_rgba());
    }

    #[test]
    fn test_masked_cell_is_transparent() {
        let grid = MaskedGrid::new(
            GridShape::new(1, 2),
            vec![5.0, 7.0],
            vec![false, true],
        )
        .unwrap();
        let style = style();
        let img = render_map(&grid, "t", &style, None).unwrap();
        let frame = style.frame(1, 2).unwrap();

        assert_eq!(pixel_at_cell(&img, &frame, 1, 0, 2)[3], 0);
        assert_eq!(pixel_at_cell(&img, &frame, 0, 0, 2)[3], 255);
    }

    #[test]
    fn test_image_dimensions() {
        let grid = MaskedGrid::fully_masked(GridShape::new(10, 20));
        let style = MapStyle::default();
        let img = render_map(&grid, "empty", &style, None).unwrap();

        let expected_w = 16 + 80 + 16 + 20 + 72 + 16;
        let expected_h = 16 + 32 + 40 + 16;
        assert_eq!((img.width(), img.height()), (expected_w, expected_h));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let grid = MaskedGrid::fully_masked(GridShape::new(0, 4));
        assert!(matches!(
            render_map(&grid, "t", &MapStyle::default(), None),
            Err(RenderError::InvalidInput(_))
        ));
    }
}
