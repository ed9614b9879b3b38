//! Text drawing for titles, axis labels and tick labels.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::error::{RenderError, Result};
use crate::gradient::Color;

/// Horizontal anchor for a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// A TrueType font loaded from disk.
pub struct TextRenderer {
    font: Font<'static>,
    path: PathBuf,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").field("path", &self.path).finish()
    }
}

impl TextRenderer {
    /// Load a `.ttf` font file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| RenderError::Font {
            path: path.to_path_buf(),
            message: "not a valid TrueType font".to_string(),
        })?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rendered width and height of `text` in pixels.
    pub fn measure(&self, text: &str, size: f32) -> (i32, i32) {
        text_size(Scale::uniform(size), &self.font, text)
    }

    /// Draw `text` with its top edge at `y`, horizontally anchored at `x`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        anchor: Anchor,
        color: Color,
    ) {
        let (w, _) = self.measure(text, size);
        let left = match anchor {
            Anchor::Left => x,
            Anchor::Center => x - w / 2,
            Anchor::Right => x - w,
        };
        draw_text_mut(img, color.to_rgba(), left, y, Scale::uniform(size), &self.font, text);
    }
}

/// Format a tick label with precision suited to the axis span.
pub fn format_tick(value: f32, span: f32) -> String {
    let span = span.abs();
    if span >= 10.0 {
        format!("{:.0}", value)
    } else if span >= 1.0 {
        format!("{:.1}", value)
    } else if span >= 0.01 {
        format!("{:.3}", value)
    } else {
        format!("{:.2e}", value)
    }
}
