use crate::color::Rgb;
use crate::config::DotShape;

/// Paint target for the per-frame draw pass.
///
/// Alpha is global paint state, as on a 2D canvas: callers set it before a
/// fill and restore it to `1.0` afterwards.
pub trait Surface {
    fn clear(&mut self, background: Rgb, width: f32, height: f32);
    fn set_alpha(&mut self, alpha: f32);
    fn fill_dot(&mut self, x: f32, y: f32, radius: f32, color: Rgb, shape: DotShape);
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
    pub shape: DotShape,
    pub alpha: f32,
}

/// Surface that records draw calls instead of painting. Used by tests and the
/// headless preview.
#[derive(Debug)]
pub struct RecordingSurface {
    pub draws: Vec<DrawCall>,
    pub clears: usize,
    alpha: f32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            draws: Vec::new(),
            clears: 0,
            alpha: 1.0,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alpha currently in effect; `1.0` between dots.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, _background: Rgb, _width: f32, _height: f32) {
        self.draws.clear();
        self.clears += 1;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn fill_dot(&mut self, x: f32, y: f32, radius: f32, color: Rgb, shape: DotShape) {
        self.draws.push(DrawCall {
            x,
            y,
            radius,
            color,
            shape,
            alpha: self.alpha,
        });
    }
}
