//! Dot grid: row-major storage, responsive sizing, and animated density
//! changes.

use log::debug;
use rand::Rng;

use crate::color::Rgb;
use crate::dot::Dot;

/// Viewports narrower than this get the aggressive mobile scale.
pub const MOBILE_BREAKPOINT: f32 = 600.0;
/// Spacing differences below this count as settled.
pub const SPACING_EPSILON: f32 = 0.01;
/// Per-frame approach coefficient for spacing transitions (at 60 Hz).
pub const SPACING_EASE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Responsive multiplier for spacing, radii and font size.
    pub fn visual_scale(&self) -> f32 {
        visual_scale(self.width)
    }
}

pub fn visual_scale(width: f32) -> f32 {
    if width < MOBILE_BREAKPOINT {
        (width / 1500.0).max(0.0)
    } else {
        (width / 1920.0).max(0.5)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Grid {
    cols: usize,
    rows: usize,
    spacing: f32,
    dots: Vec<Dot>,
}

impl Grid {
    /// Lay out a fresh grid of dots `spacing` pixels apart, centres offset by
    /// half a cell. Degenerate inputs yield an empty grid.
    pub fn build<R: Rng + ?Sized>(viewport: Viewport, spacing: f32, base_radius: f32, rng: &mut R) -> Self {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(spacing) || !usable(viewport.width) || !usable(viewport.height) {
            return Self {
                spacing: spacing.max(0.0),
                ..Self::default()
            };
        }

        let cols = (viewport.width / spacing).ceil() as usize;
        let rows = (viewport.height / spacing).ceil() as usize;
        let mut dots = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = col as f32 * spacing + spacing / 2.0;
                let y = row as f32 * spacing + spacing / 2.0;
                let bias = rng.random::<f32>();
                let noise_offset = rng.random::<f32>() * 1000.0;
                dots.push(Dot::new(x, y, col, row, base_radius, bias, noise_offset));
            }
        }
        debug!("grid rebuilt: {cols}x{rows} @ {spacing:.2}px");
        Self {
            cols,
            rows,
            spacing,
            dots,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn dots_mut(&mut self) -> &mut [Dot] {
        &mut self.dots
    }

    pub fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&Dot> {
        self.index(col, row).map(|i| &self.dots[i])
    }

    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Dot> {
        self.index(col, row).map(move |i| &mut self.dots[i])
    }

    /// Mark a cell alive in `color`. Out-of-range cells are ignored.
    pub fn paint(&mut self, col: i32, row: i32, color: Rgb, opacity: f32) {
        if let Some(dot) = self.get_mut(col, row) {
            dot.alive = true;
            dot.color = Some(color);
            dot.opacity = opacity;
        }
    }

    /// Mark a cell dead with the default colour.
    pub fn blank(&mut self, col: i32, row: i32, opacity: f32) {
        if let Some(dot) = self.get_mut(col, row) {
            dot.alive = false;
            dot.color = None;
            dot.opacity = opacity;
        }
    }

    pub fn alive_count(&self) -> usize {
        self.dots.iter().filter(|d| d.alive).count()
    }

    pub fn alive_fraction(&self) -> f32 {
        if self.dots.is_empty() {
            0.0
        } else {
            self.alive_count() as f32 / self.dots.len() as f32
        }
    }

    /// Drop every game/text flag so a grid at the wrong density shows nothing
    /// until it is rebuilt.
    pub fn clear_game_state(&mut self) {
        for dot in &mut self.dots {
            dot.alive = false;
            dot.is_text = false;
            dot.color = None;
            dot.opacity = 0.0;
        }
    }

    /// Text dots become the starting population.
    pub fn revive_text(&mut self) {
        for dot in self.dots.iter_mut().filter(|d| d.is_text) {
            dot.alive = true;
            dot.opacity = 1.0;
        }
    }
}

/// Result of one [`SpacingTransition::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpacingStep {
    Settled,
    Moved,
    Snapped,
}

/// Base spacing easing toward a target, one rebuild per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacingTransition {
    current: f32,
    target: f32,
}

impl SpacingTransition {
    pub fn new(spacing: f32) -> Self {
        Self {
            current: spacing,
            target: spacing,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn retarget(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `spacing` with no animation.
    pub fn snap_to(&mut self, spacing: f32) {
        self.current = spacing;
        self.target = spacing;
    }

    pub fn is_at(&self, spacing: f32) -> bool {
        self.target == spacing && (self.current - spacing).abs() < SPACING_EPSILON
    }

    pub fn step(&mut self, ease: f32) -> SpacingStep {
        if (self.target - self.current).abs() > SPACING_EPSILON {
            self.current += (self.target - self.current) * ease;
            SpacingStep::Moved
        } else if self.current != self.target {
            self.current = self.target;
            SpacingStep::Snapped
        } else {
            SpacingStep::Settled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(9)
    }

    #[test]
    fn cell_counts_round_up() {
        let grid = Grid::build(Viewport::new(100.0, 50.0), 18.0, 3.0, &mut rng());
        assert_eq!(grid.cols(), 6);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.len(), 18);
        let first = &grid.dots()[0];
        assert_eq!(first.origin(), (9.0, 9.0));
        let last = grid.get(5, 2).unwrap();
        assert_eq!((last.col, last.row), (5, 2));
    }

    #[test]
    fn degenerate_viewports_give_empty_grids() {
        for vp in [Viewport::new(0.0, 100.0), Viewport::new(100.0, 0.0), Viewport::new(f32::NAN, 1.0)] {
            let grid = Grid::build(vp, 18.0, 3.0, &mut rng());
            assert!(grid.is_empty());
            assert_eq!(grid.cols() * grid.rows(), grid.len());
        }
        assert!(Grid::build(Viewport::new(100.0, 100.0), 0.0, 3.0, &mut rng()).is_empty());
    }

    #[test]
    fn lookup_is_bounds_checked() {
        let grid = Grid::build(Viewport::new(40.0, 40.0), 10.0, 3.0, &mut rng());
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert_eq!(grid.index(3, 2), Some(11));
    }

    #[test]
    fn visual_scale_is_tighter_on_mobile() {
        assert_eq!(visual_scale(1920.0), 1.0);
        assert_eq!(visual_scale(700.0), 0.5);
        assert!((visual_scale(450.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn transition_eases_then_snaps() {
        let mut t = SpacingTransition::new(18.0);
        t.retarget(10.0);
        let mut steps = 0;
        loop {
            match t.step(SPACING_EASE) {
                SpacingStep::Moved => steps += 1,
                SpacingStep::Snapped => break,
                SpacingStep::Settled => panic!("settled without snapping"),
            }
            assert!(t.current() > 10.0 && t.current() <= 18.0);
        }
        assert!(steps > 10);
        assert_eq!(t.current(), 10.0);
        assert_eq!(t.step(SPACING_EASE), SpacingStep::Settled);
    }
}
