//! Block-stacking game on a fixed 10×20 board, projected onto the dot grid.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::font;
use crate::grid::Grid;

pub const BOARD_COLS: usize = 10;
pub const BOARD_ROWS: usize = 20;

/// Points for clearing 0..=4 lines at once, before the level multiplier.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

const WALL_OPACITY: f32 = 0.5;
const EMPTY_OPACITY: f32 = 0.05;
const TEXT_OPACITY: f32 = 0.8;
/// Columns right of the board cleared for the score panel.
const PANEL_WIDTH: i32 = 40;
const PANEL_GAP: i32 = 2;
const PANEL_PITCH: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::L,
        Tetromino::J,
        Tetromino::S,
        Tetromino::Z,
    ];

    pub fn color(self) -> Rgb {
        match self {
            Tetromino::I => Rgb::new(0x00, 0xf0, 0xf0),
            Tetromino::O => Rgb::new(0xf0, 0xf0, 0x00),
            Tetromino::T => Rgb::new(0xa0, 0x00, 0xf0),
            Tetromino::L => Rgb::new(0xf0, 0xa0, 0x00),
            Tetromino::J => Rgb::new(0x00, 0x00, 0xf0),
            Tetromino::S => Rgb::new(0x00, 0xf0, 0x00),
            Tetromino::Z => Rgb::new(0xf0, 0x00, 0x00),
        }
    }

    /// Spawn orientation.
    pub fn shape(self) -> Shape {
        match self {
            Tetromino::I => Shape::from_rows(&["####"]),
            Tetromino::O => Shape::from_rows(&["##", "##"]),
            Tetromino::T => Shape::from_rows(&[".#.", "###"]),
            Tetromino::L => Shape::from_rows(&["#..", "###"]),
            Tetromino::J => Shape::from_rows(&["..#", "###"]),
            Tetromino::S => Shape::from_rows(&[".##", "##."]),
            Tetromino::Z => Shape::from_rows(&["##.", ".##"]),
        }
    }
}

/// Occupancy matrix of at most 4×4, stored row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: [[bool; 4]; 4],
}

impl Shape {
    fn from_rows(rows: &[&str]) -> Self {
        let mut cells = [[false; 4]; 4];
        let mut width = 0;
        for (y, row) in rows.iter().enumerate() {
            width = width.max(row.len());
            for (x, c) in row.chars().enumerate() {
                cells[y][x] = c == '#';
            }
        }
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y][x]
    }

    /// Occupied cells as (x, y) offsets.
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.cells[y][x])
            .map(|(x, y)| (x as i32, y as i32))
    }

    /// Clockwise quarter turn: `out[x][h-1-y] = in[y][x]`.
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[x][self.height - 1 - y] = self.cells[y][x];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Counter-clockwise quarter turn: `out[w-1-x][y] = in[y][x]`.
    pub fn rotated_ccw(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[self.width - 1 - x][y] = self.cells[y][x];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

pub struct Board {
    cells: [[Option<Tetromino>; BOARD_COLS]; BOARD_ROWS],
    piece: Option<Piece>,
    score: u32,
    lines: u32,
    level: u32,
    running: bool,
    game_over: bool,
    rng: SmallRng,
}

impl Board {
    /// Fresh board with a piece waiting; not running until [`Board::start`].
    pub fn new(seed: u64) -> Self {
        let mut board = Self {
            cells: [[None; BOARD_COLS]; BOARD_ROWS],
            piece: None,
            score: 0,
            lines: 0,
            level: 0,
            running: false,
            game_over: false,
            rng: SmallRng::seed_from_u64(seed),
        };
        board.reset();
        board
    }

    /// Empty the board, zero the counters and spawn a piece.
    pub fn reset(&mut self) {
        self.cells = [[None; BOARD_COLS]; BOARD_ROWS];
        self.score = 0;
        self.lines = 0;
        self.level = 0;
        self.game_over = false;
        self.spawn_random();
    }

    pub fn start(&mut self) {
        self.reset();
        self.running = !self.game_over;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// No effect once the game is over.
    pub fn resume(&mut self) {
        if !self.game_over {
            self.running = true;
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Tetromino> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    pub fn set_cell(&mut self, x: usize, y: usize, value: Option<Tetromino>) {
        if let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = value;
        }
    }

    /// Milliseconds between automatic drops at the current level.
    pub fn gravity_interval_ms(&self) -> f64 {
        (200.0 - self.level as f64 * 10.0).max(50.0)
    }

    fn spawn_random(&mut self) {
        let kind = Tetromino::ALL[self.rng.random_range(0..Tetromino::ALL.len())];
        self.spawn(kind);
    }

    /// Place `kind` centred at the top. A piece that collides on arrival ends
    /// the game.
    pub fn spawn(&mut self, kind: Tetromino) {
        let shape = kind.shape();
        let x = (BOARD_COLS / 2) as i32 - (shape.width() / 2) as i32;
        let piece = Piece { kind, shape, x, y: 0 };
        if self.collides(&shape, x, 0) {
            self.game_over = true;
            self.running = false;
        }
        self.piece = Some(piece);
    }

    fn accepts_input(&self) -> bool {
        self.running && !self.game_over
    }

    fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.blocks().any(|(bx, by)| {
            let (cx, cy) = (x + bx, y + by);
            if cx < 0 || cx >= BOARD_COLS as i32 || cy >= BOARD_ROWS as i32 {
                return true;
            }
            cy >= 0 && self.cells[cy as usize][cx as usize].is_some()
        })
    }

    /// Shift the piece. A blocked downward move locks it, clears lines and
    /// spawns the next piece. Returns whether the piece moved.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.piece else {
            return false;
        };
        if !self.collides(&piece.shape, piece.x + dx, piece.y + dy) {
            self.piece = Some(Piece {
                x: piece.x + dx,
                y: piece.y + dy,
                ..piece
            });
            return true;
        }
        if dy > 0 {
            self.lock(&piece);
            self.clear_lines();
            self.spawn_random();
        }
        false
    }

    /// Gravity step; same as a downward move with no points.
    pub fn drop(&mut self) {
        self.move_by(0, 1);
    }

    pub fn soft_drop(&mut self) {
        if self.move_by(0, 1) {
            self.score += 1;
        }
    }

    /// Fall until blocked, then lock. Two points per cell fallen.
    pub fn hard_drop(&mut self) {
        if !self.accepts_input() {
            return;
        }
        let mut fallen = 0;
        while self.move_by(0, 1) {
            fallen += 1;
        }
        self.score += fallen * 2;
    }

    pub fn rotate_cw(&mut self) {
        self.rotate_with(Shape::rotated_cw);
    }

    pub fn rotate_ccw(&mut self) {
        self.rotate_with(Shape::rotated_ccw);
    }

    fn rotate_with(&mut self, turn: fn(&Shape) -> Shape) {
        if !self.accepts_input() {
            return;
        }
        let Some(piece) = self.piece else {
            return;
        };
        let shape = turn(&piece.shape);
        // In place, then one column left, then one right.
        for kick in [0, -1, 1] {
            if !self.collides(&shape, piece.x + kick, piece.y) {
                self.piece = Some(Piece {
                    shape,
                    x: piece.x + kick,
                    ..piece
                });
                return;
            }
        }
    }

    fn lock(&mut self, piece: &Piece) {
        for (bx, by) in piece.shape.blocks() {
            let (x, y) = (piece.x + bx, piece.y + by);
            if y >= 0 {
                self.set_cell(x as usize, y as usize, Some(piece.kind));
            }
        }
    }

    /// Remove full rows, shifting everything above down. Returns the number
    /// of rows cleared.
    pub fn clear_lines(&mut self) -> usize {
        let kept: Vec<_> = self
            .cells
            .iter()
            .filter(|row| row.iter().any(Option::is_none))
            .copied()
            .collect();
        let cleared = BOARD_ROWS - kept.len();
        if cleared == 0 {
            return 0;
        }

        let mut cells = [[None; BOARD_COLS]; BOARD_ROWS];
        cells[cleared..].copy_from_slice(&kept);
        self.cells = cells;

        self.score += LINE_SCORES[cleared.min(4)] * (self.level + 1);
        self.lines += cleared as u32;
        self.level = self.lines / 10;
        cleared
    }

    /// Write the board, the falling piece, the score panel and any game-over
    /// banner into `grid`, centred. Does nothing before the first start.
    pub fn project(&self, grid: &mut Grid) {
        if !self.running && !self.game_over {
            return;
        }
        let (cols, rows) = (grid.cols() as i32, grid.rows() as i32);
        let left = (cols - BOARD_COLS as i32).div_euclid(2);
        let top = (rows - BOARD_ROWS as i32).div_euclid(2);
        let (board_w, board_h) = (BOARD_COLS as i32, BOARD_ROWS as i32);

        for y in -1..=board_h {
            for x in -1..=board_w {
                if x == -1 || x == board_w || y == board_h {
                    grid.paint(left + x, top + y, Rgb::WALL, WALL_OPACITY);
                }
            }
        }

        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (col, row) = (left + x as i32, top + y as i32);
                match cell {
                    Some(kind) => grid.paint(col, row, kind.color(), 1.0),
                    None => grid.blank(col, row, EMPTY_OPACITY),
                }
            }
        }

        if let Some(piece) = &self.piece {
            for (bx, by) in piece.shape.blocks() {
                let y = piece.y + by;
                if y >= 0 {
                    grid.paint(left + piece.x + bx, top + y, piece.kind.color(), 1.0);
                }
            }
        }

        let panel = left + board_w + PANEL_GAP;
        for y in 0..board_h {
            for x in 0..PANEL_WIDTH {
                grid.blank(panel + x, top + y, EMPTY_OPACITY);
            }
        }
        let lines = [
            "SCORE".to_string(),
            self.score.to_string(),
            "LV".to_string(),
            self.level.to_string(),
        ];
        for (i, text) in lines.iter().enumerate() {
            font::draw_text(grid, text, panel, top + i as i32 * PANEL_PITCH, Rgb::WHITE, TEXT_OPACITY);
        }

        if self.game_over {
            let cx = left + board_w / 2;
            let cy = top + board_h / 2;
            font::draw_text(grid, "GAME", cx - 7, cy - 4, Rgb::RED, TEXT_OPACITY);
            font::draw_text(grid, "OVER", cx - 7, cy + 2, Rgb::RED, TEXT_OPACITY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Viewport;

    fn running_board(kind: Tetromino) -> Board {
        let mut board = Board::new(11);
        board.start();
        board.spawn(kind);
        board
    }

    #[test]
    fn every_shape_has_four_blocks() {
        for kind in Tetromino::ALL {
            assert_eq!(kind.shape().blocks().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn quarter_turns_have_order_four() {
        for kind in Tetromino::ALL {
            let s = kind.shape();
            assert_eq!(s.rotated_cw().rotated_cw().rotated_cw().rotated_cw(), s);
            assert_eq!(s.rotated_cw().rotated_ccw(), s);
            assert_eq!(s.rotated_ccw().rotated_ccw(), s.rotated_cw().rotated_cw());
        }
    }

    #[test]
    fn t_turns_clockwise() {
        let t = Tetromino::T.shape().rotated_cw();
        assert_eq!((t.width(), t.height()), (2, 3));
        // #.
        // ##
        // #.
        assert!(t.is_set(0, 0) && t.is_set(0, 1) && t.is_set(1, 1) && t.is_set(0, 2));
        assert!(!t.is_set(1, 0) && !t.is_set(1, 2));
    }

    #[test]
    fn spawn_is_centred() {
        let board = running_board(Tetromino::I);
        assert_eq!(board.piece().map(|p| (p.x, p.y)), Some((3, 0)));
        let board = running_board(Tetromino::O);
        assert_eq!(board.piece().map(|p| p.x), Some(4));
    }

    #[test]
    fn walls_block_sideways_moves() {
        let mut board = running_board(Tetromino::O);
        for _ in 0..10 {
            board.move_by(-1, 0);
        }
        assert_eq!(board.piece().map(|p| p.x), Some(0));
        assert!(!board.move_by(-1, 0));
    }

    #[test]
    fn rotation_kicks_off_the_wall() {
        let mut board = running_board(Tetromino::I);
        board.rotate_cw();
        for _ in 0..10 {
            board.move_by(1, 0);
        }
        let before = board.piece().copied();
        assert_eq!(before.map(|p| p.x), Some(9));
        board.rotate_cw();
        // no kick makes room for a horizontal I at the wall
        assert_eq!(board.piece().map(|p| p.shape.width()), Some(1));

        let mut board = running_board(Tetromino::T);
        board.rotate_cw();
        for _ in 0..10 {
            board.move_by(1, 0);
        }
        // vertical T hugging the right wall: turning back needs one step left
        board.rotate_ccw();
        let piece = board.piece().copied().unwrap();
        assert_eq!(piece.shape, Tetromino::T.shape());
        assert_eq!(piece.x, 7);
    }

    #[test]
    fn clears_score_by_level() {
        let mut board = running_board(Tetromino::O);
        for n in 1..=4usize {
            for y in BOARD_ROWS - n..BOARD_ROWS {
                for x in 0..BOARD_COLS {
                    board.set_cell(x, y, Some(Tetromino::J));
                }
            }
            let before = board.score();
            let level = board.level();
            assert_eq!(board.clear_lines(), n);
            assert_eq!(board.score() - before, LINE_SCORES[n] * (level + 1));
        }
        assert_eq!(board.lines(), 10);
        assert_eq!(board.level(), 1);
        assert_eq!(board.gravity_interval_ms(), 190.0);
    }

    #[test]
    fn clearing_shifts_rows_down() {
        let mut board = running_board(Tetromino::O);
        board.set_cell(0, 18, Some(Tetromino::S));
        for x in 0..BOARD_COLS {
            board.set_cell(x, 19, Some(Tetromino::Z));
        }
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.cell(0, 19), Some(Tetromino::S));
        assert_eq!(board.cell(1, 19), None);
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut board = running_board(Tetromino::O);
        board.set_cell(4, 0, Some(Tetromino::I));
        board.spawn(Tetromino::O);
        assert!(board.is_game_over());
        assert!(!board.is_running());
        board.resume();
        assert!(!board.is_running());
        board.hard_drop();
        assert_eq!(board.score(), 0);

        board.start();
        assert!(board.is_running());
        assert!(!board.is_game_over());
    }

    #[test]
    fn paused_board_ignores_input() {
        let mut board = running_board(Tetromino::O);
        board.pause();
        assert!(!board.move_by(0, 1));
        board.soft_drop();
        assert_eq!(board.score(), 0);
        board.resume();
        board.soft_drop();
        assert_eq!(board.score(), 1);
    }

    fn grid(cols: usize, rows: usize) -> Grid {
        let vp = Viewport::new(cols as f32 * 10.0, rows as f32 * 10.0);
        Grid::build(vp, 10.0, 3.0, &mut SmallRng::seed_from_u64(1))
    }

    #[test]
    fn projection_is_centred_with_walls() {
        let board = running_board(Tetromino::O);
        let mut g = grid(60, 30);
        board.project(&mut g);
        // left = 25, top = 5
        let wall = g.get(24, 10).unwrap();
        assert!(wall.alive);
        assert_eq!(wall.color, Some(Rgb::WALL));
        assert_eq!(wall.opacity, 0.5);
        assert_eq!(g.get(35, 25).unwrap().color, Some(Rgb::WALL));
        assert_eq!(g.get(25, 4).unwrap().color, None);

        let empty = g.get(25, 20).unwrap();
        assert!(!empty.alive);
        assert_eq!(empty.opacity, 0.05);

        // O piece at board (4, 0)
        let block = g.get(29, 5).unwrap();
        assert!(block.alive);
        assert_eq!(block.color, Some(Tetromino::O.color()));

        // "SCORE" starts at the panel origin; S row 0 is ".##"
        assert!(g.get(38, 5).unwrap().alive);
        assert!(!g.get(37, 5).unwrap().alive);
    }

    #[test]
    fn projection_waits_for_start() {
        let board = Board::new(3);
        let mut g = grid(30, 30);
        board.project(&mut g);
        assert_eq!(g.alive_count(), 0);
    }

    #[test]
    fn game_over_banner_survives_the_panel() {
        let mut board = running_board(Tetromino::O);
        board.set_cell(4, 0, Some(Tetromino::I));
        board.spawn(Tetromino::O);
        let mut g = grid(60, 30);
        board.project(&mut g);
        // "GAME" at (30 - 7, 15 - 4); G row 0 is ".##" so (24, 11) is lit
        let cell = g.get(24, 11).unwrap();
        assert!(cell.alive);
        assert_eq!(cell.color, Some(Rgb::RED));
        // last glyph "E" reaches into the panel columns
        assert_eq!(g.get(37, 11).unwrap().color, Some(Rgb::RED));
    }
}
