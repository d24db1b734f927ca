use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::js_error;
use crate::error::{HeroError, Result};
use crate::raster::{AlphaMask, TextRasterizer, TextStyle};

/// Draws the headline with the browser's font stack on an offscreen canvas
/// and reads back its alpha channel.
pub struct CanvasTextRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextRasterizer {
    pub fn new(document: &Document) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HeroError::Context("offscreen canvas"))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(HeroError::Context("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HeroError::Context("2d"))?;
        Ok(Self { canvas, ctx })
    }
}

impl TextRasterizer for CanvasTextRasterizer {
    fn rasterize(&mut self, style: &TextStyle<'_>, width: usize, height: usize) -> Result<AlphaMask> {
        if width == 0 || height == 0 {
            return Ok(AlphaMask::new(width, height));
        }
        // Resizing wipes the bitmap and all context state.
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);

        let ctx = &self.ctx;
        ctx.set_fill_style_str("white");
        ctx.set_font(&format!("bold {}px {}", style.font_px, style.family));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(style.text, width as f64 / 2.0, height as f64 / 2.0)
            .map_err(js_error)?;

        let pixels = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(js_error)?
            .data();
        Ok(AlphaMask::from_rgba(width, height, &pixels.0))
    }
}
