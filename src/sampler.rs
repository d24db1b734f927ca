//! Writes resampled external frames into the dot grid.
//!
//! Each function expects `cols * rows * 4` RGBA bytes matching the grid and
//! leaves the grid untouched (returning `false`) on any size mismatch.

use crate::color::Rgb;
use crate::grid::Grid;

fn fits(grid: &Grid, rgba: &[u8]) -> bool {
    !grid.is_empty() && rgba.len() == grid.len() * 4
}

fn pixel(px: &[u8]) -> Rgb {
    Rgb::new(px[0], px[1], px[2])
}

/// Binary video: pixels brighter than `cutoff` light their dot white, the
/// rest go dark.
pub fn apply_silhouette(grid: &mut Grid, rgba: &[u8], cutoff: f32) -> bool {
    if !fits(grid, rgba) {
        return false;
    }
    for (dot, px) in grid.dots_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        dot.alive = pixel(px).brightness() > cutoff;
        if dot.alive {
            dot.opacity = 1.0;
            dot.color = Some(Rgb::WHITE);
        } else {
            dot.opacity = 0.0;
            dot.color = None;
        }
    }
    true
}

/// Colour video: pixels above `floor` keep their colour, darker ones go dark.
/// Dark dots keep their previous colour override.
pub fn apply_color(grid: &mut Grid, rgba: &[u8], floor: f32) -> bool {
    if !fits(grid, rgba) {
        return false;
    }
    for (dot, px) in grid.dots_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        let color = pixel(px);
        dot.alive = color.brightness() > floor;
        if dot.alive {
            dot.color = Some(color);
            dot.opacity = 1.0;
        } else {
            dot.opacity = 0.0;
        }
    }
    true
}

/// Emulator frame: every dot shows its pixel verbatim.
pub fn apply_opaque(grid: &mut Grid, rgba: &[u8]) -> bool {
    if !fits(grid, rgba) {
        return false;
    }
    for (dot, px) in grid.dots_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        dot.alive = true;
        dot.color = Some(pixel(px));
        dot.opacity = 1.0;
    }
    true
}
