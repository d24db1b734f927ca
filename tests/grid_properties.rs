#![cfg(not(target_arch = "wasm32"))]

use dotfield::config::Theme;
use dotfield::dot::{Dot, DotTuning, Easing, FrameContext, OPACITY_FLOOR, REFERENCE_FRAME_MS};
use dotfield::life;
use dotfield::noise::NoiseField;
use dotfield::raster::{apply_mask, BitmapRasterizer, TextRasterizer, TextStyle};
use dotfield::{Grid, HeroConfig, RecordingSurface, Stage, Viewport};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn grid(width: f32, height: f32, spacing: f32) -> Grid {
    Grid::build(Viewport::new(width, height), spacing, 3.0, &mut SmallRng::seed_from_u64(17))
}

fn text_grid(text: &str) -> Grid {
    let mut g = grid(100.0, 100.0, 5.0);
    let style = TextStyle {
        text,
        font_px: 40.0,
        family: "monospace",
    };
    let mask = BitmapRasterizer.rasterize(&style, 100, 100).unwrap();
    apply_mask(&mut g, &mask);
    g
}

fn text_cells(g: &Grid) -> Vec<(usize, usize)> {
    g.dots().iter().filter(|d| d.is_text).map(|d| (d.col, d.row)).collect()
}

#[test]
fn short_word_lands_on_the_grid_reproducibly() {
    let first = text_grid("AB");
    let cells = text_cells(&first);
    assert!(!cells.is_empty());
    assert!(first.dots().iter().filter(|d| d.is_text).all(|d| d.alive));
    assert_eq!(text_cells(&text_grid("AB")), cells);
}

#[test]
fn palindromic_word_maps_symmetrically() {
    let g = text_grid("AHA");
    let cols = g.cols();
    assert!(!text_cells(&g).is_empty());
    for dot in g.dots() {
        let mirror = g.get((cols - 1 - dot.col) as i32, dot.row as i32).unwrap();
        assert_eq!(dot.is_text, mirror.is_text, "({}, {})", dot.col, dot.row);
    }
}

fn context(noise: &NoiseField, scroll_y: f32) -> FrameContext<'_> {
    FrameContext {
        stage: Stage::Idle,
        elapsed_ms: 2_000.0,
        stage_elapsed_ms: 2_000.0,
        easing: Easing::for_frame(REFERENCE_FRAME_MS),
        pointer: None,
        interaction_radius: 150.0,
        scroll_y,
        viewport_height: 800.0,
        noise,
        tuning: DotTuning::from(&HeroConfig::default()),
    }
}

proptest! {
    #[test]
    fn grid_covers_the_viewport(w in 1.0f32..2000.0, h in 1.0f32..1200.0, spacing in 4.0f32..60.0) {
        let g = grid(w, h, spacing);
        prop_assert_eq!(g.cols() * g.rows(), g.len());
        prop_assert_eq!(g.cols(), (w / spacing).ceil() as usize);
        prop_assert_eq!(g.rows(), (h / spacing).ceil() as usize);
        for dot in g.dots() {
            let found = g.get(dot.col as i32, dot.row as i32).unwrap();
            prop_assert_eq!((found.x, found.y), dot.origin());
        }
    }

    #[test]
    fn draw_calls_skip_faint_dots(opacities in prop::collection::vec(0.0f32..1.0, 1..200)) {
        let theme = Theme::dark();
        let mut surface = RecordingSurface::new();
        let mut drawn = 0;
        for (i, opacity) in opacities.iter().enumerate() {
            let mut dot = Dot::new(i as f32, 0.0, i, 0, 3.0, 0.5, 0.0);
            dot.opacity = *opacity;
            drawn += dot.draw(&mut surface, &theme) as usize;
        }
        let visible = opacities.iter().filter(|&&o| o > OPACITY_FLOOR).count();
        prop_assert_eq!(drawn, visible);
        prop_assert_eq!(surface.draws.len(), visible);
        prop_assert_eq!(surface.alpha(), 1.0);
    }

    #[test]
    fn evaporation_leaves_no_trace(scroll in 1.0f32..2000.0, bias in 0.0f32..1.0) {
        let noise = NoiseField::seeded(4);
        let mut dot = Dot::new(120.0, 340.0, 0, 0, 3.0, bias, 10.0);
        dot.update(&context(&noise, scroll));
        prop_assert!(dot.opacity >= 0.0 && dot.opacity <= 1.0);
        prop_assert!(dot.radius >= 0.0);

        dot.update(&context(&noise, 0.0));
        prop_assert_eq!((dot.x, dot.y), dot.origin());
    }

    #[test]
    fn life_rule_is_b3_s23(alive in any::<bool>(), n in 0u8..=8) {
        prop_assert_eq!(life::rule(alive, n), n == 3 || (alive && n == 2));
    }

    #[test]
    fn life_step_matches_reference(cells in prop::collection::vec(any::<bool>(), 8 * 6)) {
        let (cols, rows) = (8usize, 6usize);
        let mut g = grid(80.0, 60.0, 10.0);
        for (dot, &alive) in g.dots_mut().iter_mut().zip(&cells) {
            dot.alive = alive;
        }

        let at = |c: i32, r: i32| {
            c >= 0 && r >= 0 && (c as usize) < cols && (r as usize) < rows && cells[r as usize * cols + c as usize]
        };
        let expected: Vec<bool> = (0..rows as i32)
            .flat_map(|r| (0..cols as i32).map(move |c| (c, r)))
            .map(|(c, r)| {
                let n = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)]
                    .iter()
                    .filter(|(dc, dr)| at(c + dc, r + dr))
                    .count();
                n == 3 || (at(c, r) && n == 2)
            })
            .collect();

        let population = life::step(&mut g);
        let actual: Vec<bool> = g.dots().iter().map(|d| d.alive).collect();
        prop_assert_eq!(population, expected.iter().filter(|&&a| a).count());
        prop_assert_eq!(actual, expected);
    }
}
