//! Text mask: which dots sit on rendered glyph pixels.

use crate::error::Result;
use crate::font;
use crate::grid::Grid;

/// Offscreen coverage bitmap at viewport resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    /// Keep the alpha channel of an RGBA readback. Short buffers leave the
    /// remainder transparent.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Self {
        let mut mask = Self::new(width, height);
        for (slot, px) in mask.alpha.iter_mut().zip(rgba.chunks_exact(4)) {
            *slot = px[3];
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, alpha: u8) {
        if x < self.width && y < self.height {
            self.alpha[y * self.width + x] = alpha;
        }
    }

    /// Whether the pixel under (`x`, `y`), rounded down, has any coverage.
    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        if !(x >= 0.0 && y >= 0.0) {
            return false;
        }
        let (ix, iy) = (x.floor() as usize, y.floor() as usize);
        ix < self.width && iy < self.height && self.alpha[iy * self.width + ix] > 0
    }

    /// Number of covered pixels.
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }
}

/// What to draw into the mask.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    pub text: &'a str,
    /// Font size in pixels, already scaled for the viewport.
    pub font_px: f32,
    pub family: &'a str,
}

/// Renders centred text into an [`AlphaMask`].
pub trait TextRasterizer {
    fn rasterize(&mut self, style: &TextStyle<'_>, width: usize, height: usize) -> Result<AlphaMask>;
}

/// Rasterizer built on the 3×5 bitmap font; needs no browser. Cap height is
/// ~70% of the font size, like a bold sans at the same size.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapRasterizer;

const CAP_HEIGHT: f32 = 0.7;

impl TextRasterizer for BitmapRasterizer {
    fn rasterize(&mut self, style: &TextStyle<'_>, width: usize, height: usize) -> Result<AlphaMask> {
        let mut mask = AlphaMask::new(width, height);
        if width == 0 || height == 0 || style.text.is_empty() {
            return Ok(mask);
        }

        let cell = (style.font_px * CAP_HEIGHT / font::GLYPH_HEIGHT as f32).round().max(1.0) as i64;
        let text_w = font::text_width(style.text) as i64 * cell;
        let text_h = font::GLYPH_HEIGHT as i64 * cell;
        let left = (width as i64 - text_w) / 2;
        let top = (height as i64 - text_h) / 2;

        for (i, c) in style.text.chars().enumerate() {
            let g = font::glyph(c);
            let glyph_left = left + (i * font::ADVANCE) as i64 * cell;
            for gy in 0..font::GLYPH_HEIGHT {
                for gx in 0..font::GLYPH_WIDTH {
                    if !font::is_set(&g, gx, gy) {
                        continue;
                    }
                    let x0 = glyph_left + gx as i64 * cell;
                    let y0 = top + gy as i64 * cell;
                    for y in y0.max(0)..(y0 + cell).min(height as i64) {
                        for x in x0.max(0)..(x0 + cell).min(width as i64) {
                            mask.set(x as usize, y as usize, 255);
                        }
                    }
                }
            }
        }
        Ok(mask)
    }
}

/// Flag every dot whose position falls inside the mask as text and alive.
/// Returns the number of text dots.
pub fn apply_mask(grid: &mut Grid, mask: &AlphaMask) -> usize {
    let mut hits = 0;
    for dot in grid.dots_mut() {
        if mask.is_inside(dot.x, dot.y) {
            dot.is_text = true;
            dot.alive = true;
            hits += 1;
        }
    }
    hits
}
