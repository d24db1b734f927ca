//! 3×5 bitmap font stamped directly into grid cells.
//!
//! Used for the block-stacking side panel, overlay messages, and as the
//! host-side text rasterizer.

use crate::color::Rgb;
use crate::grid::Grid;

pub const GLYPH_WIDTH: usize = 3;
pub const GLYPH_HEIGHT: usize = 5;
/// Glyph width plus one blank column.
pub const ADVANCE: usize = 4;

/// One row per entry; bit 2 is the leftmost column.
pub type Glyph = [u8; GLYPH_HEIGHT];

const BLANK: Glyph = [0; GLYPH_HEIGHT];

/// Glyph for `c`. Letters are case-folded; unknown characters render as `0`.
pub fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        ' ' => BLANK,
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        _ => glyph('0'),
    }
}

#[inline]
pub fn is_set(g: &Glyph, col: usize, row: usize) -> bool {
    col < GLYPH_WIDTH && row < GLYPH_HEIGHT && g[row] & (0b100 >> col) != 0
}

/// Width in cells of `text` laid out with [`ADVANCE`] spacing.
pub fn text_width(text: &str) -> usize {
    match text.chars().count() {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

/// Stamp `text` with its top-left at (`col`, `row`). Lit cells become alive
/// with `color` at `opacity`; unlit cells are left untouched. Cells outside
/// the grid are clipped.
pub fn draw_text(grid: &mut Grid, text: &str, col: i32, row: i32, color: Rgb, opacity: f32) {
    for (i, c) in text.chars().enumerate() {
        let g = glyph(c);
        let left = col + (i * ADVANCE) as i32;
        for gy in 0..GLYPH_HEIGHT {
            for gx in 0..GLYPH_WIDTH {
                if is_set(&g, gx, gy) {
                    grid.paint(left + gx as i32, row + gy as i32, color, opacity);
                }
            }
        }
    }
}
