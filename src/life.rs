//! Conway's Game of Life on the dot grid. Edges do not wrap.

use crate::grid::Grid;

/// Count live neighbours of (`col`, `row`) within the grid bounds.
pub fn neighbours(grid: &Grid, col: usize, row: usize) -> u8 {
    let mut n = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid
                .get(col as i32 + dx, row as i32 + dy)
                .is_some_and(|d| d.alive)
            {
                n += 1;
            }
        }
    }
    n
}

#[inline]
pub fn rule(alive: bool, neighbours: u8) -> bool {
    matches!((alive, neighbours), (true, 2) | (_, 3))
}

/// Advance one generation (B3/S23). Every `next_alive` is computed from the
/// current population before any cell changes. Survivors lose any colour
/// they were painted with. Returns the new population.
pub fn step(grid: &mut Grid) -> usize {
    let next: Vec<bool> = grid
        .dots()
        .iter()
        .map(|d| rule(d.alive, neighbours(grid, d.col, d.row)))
        .collect();

    let mut population = 0;
    for (dot, alive) in grid.dots_mut().iter_mut().zip(next) {
        dot.next_alive = alive;
        dot.alive = alive;
        dot.color = None;
        population += alive as usize;
    }
    population
}

/// Bring every dot within `radius` pixels of (`x`, `y`) to life at full
/// opacity. Returns how many dots the brush touched.
pub fn paint(grid: &mut Grid, x: f32, y: f32, radius: f32) -> usize {
    let r2 = radius * radius;
    let mut touched = 0;
    for dot in grid.dots_mut() {
        if (dot.x - x).powi(2) + (dot.y - y).powi(2) < r2 {
            dot.alive = true;
            dot.opacity = 1.0;
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Viewport;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid(cols: usize, rows: usize) -> Grid {
        let vp = Viewport::new(cols as f32 * 10.0, rows as f32 * 10.0);
        Grid::build(vp, 10.0, 3.0, &mut SmallRng::seed_from_u64(3))
    }

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        grid.dots().iter().filter(|d| d.alive).map(|d| (d.col, d.row)).collect()
    }

    #[test]
    fn b3_s23() {
        for n in 0..=8 {
            assert_eq!(rule(false, n), n == 3);
            assert_eq!(rule(true, n), n == 2 || n == 3);
        }
    }

    #[test]
    fn dead_board_stays_dead() {
        let mut g = grid(6, 6);
        assert_eq!(step(&mut g), 0);
        assert!(alive_cells(&g).is_empty());
    }

    #[test]
    fn blinker_oscillates() {
        let mut g = grid(5, 5);
        for col in 1..=3 {
            g.get_mut(col, 2).unwrap().alive = true;
        }
        assert_eq!(step(&mut g), 3);
        assert_eq!(alive_cells(&g), vec![(2, 1), (2, 2), (2, 3)]);
        step(&mut g);
        assert_eq!(alive_cells(&g), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn diagonal_seed_collapses_to_its_centre() {
        let mut g = grid(5, 5);
        for i in 1..=3 {
            g.get_mut(i, i).unwrap().alive = true;
        }
        assert_eq!(step(&mut g), 1);
        assert_eq!(alive_cells(&g), vec![(2, 2)]);
        assert_eq!(step(&mut g), 0);
    }

    #[test]
    fn corner_block_is_stable_without_wrapping() {
        let mut g = grid(4, 4);
        for (c, r) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            g.get_mut(c, r).unwrap().alive = true;
        }
        g.get_mut(3, 3).unwrap().alive = true;
        step(&mut g);
        assert_eq!(alive_cells(&g), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn step_drops_paint_colour() {
        let mut g = grid(4, 4);
        for (c, r) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            g.paint(c, r, crate::color::Rgb::RED, 1.0);
        }
        step(&mut g);
        assert!(g.dots().iter().all(|d| d.color.is_none()));
    }

    #[test]
    fn brush_covers_a_disc() {
        let mut g = grid(5, 5);
        // centre of (2, 2) is (25, 25); neighbours sit 10px away
        assert_eq!(paint(&mut g, 25.0, 25.0, 10.0), 1);
        assert_eq!(paint(&mut g, 25.0, 25.0, 10.5), 5);
        assert!(g.get(2, 1).unwrap().alive);
        assert!(!g.get(1, 1).unwrap().alive);
        assert_eq!(g.get(2, 2).unwrap().opacity, 1.0);
    }
}
