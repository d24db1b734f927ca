#![cfg(not(target_arch = "wasm32"))]

use dotfield::tetris::{Board, Tetromino, BOARD_COLS, BOARD_ROWS};
use proptest::prelude::*;

fn running(kind: Tetromino) -> Board {
    let mut board = Board::new(3);
    board.start();
    board.spawn(kind);
    board
}

fn fill_row(board: &mut Board, y: usize, skip: &[usize]) {
    for x in (0..BOARD_COLS).filter(|x| !skip.contains(x)) {
        board.set_cell(x, y, Some(Tetromino::I));
    }
}

#[test]
fn o_hard_drop_then_single_clear() {
    let mut board = running(Tetromino::O);
    board.hard_drop();
    // 18 rows at two points each
    assert_eq!(board.score(), 36);
    for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
        assert_eq!(board.cell(x, y), Some(Tetromino::O));
    }

    fill_row(&mut board, 19, &[4, 5]);
    assert_eq!(board.clear_lines(), 1);
    assert_eq!(board.score(), 136);
    assert_eq!(board.lines(), 1);
    assert_eq!(board.cell(4, 19), Some(Tetromino::O));
    assert_eq!(board.cell(0, 19), None);
    assert_eq!(board.cell(4, 18), None);
}

#[test]
fn four_lines_pay_eight_hundred() {
    let mut board = running(Tetromino::T);
    for y in 16..BOARD_ROWS {
        fill_row(&mut board, y, &[]);
    }
    assert_eq!(board.clear_lines(), 4);
    assert_eq!(board.score(), 800);
}

#[test]
fn tenth_line_raises_level_and_multiplier() {
    let mut board = running(Tetromino::T);
    for batch in [4, 4, 2] {
        for y in BOARD_ROWS - batch..BOARD_ROWS {
            fill_row(&mut board, y, &[]);
        }
        board.clear_lines();
    }
    assert_eq!(board.score(), 800 + 800 + 300);
    assert_eq!(board.level(), 1);

    fill_row(&mut board, BOARD_ROWS - 1, &[]);
    board.clear_lines();
    assert_eq!(board.score(), 1900 + 200);
    assert_eq!(board.gravity_interval_ms(), 190.0);
}

#[test]
fn gravity_bottoms_out() {
    let mut board = running(Tetromino::T);
    assert_eq!(board.gravity_interval_ms(), 200.0);
    for _ in 0..160 {
        fill_row(&mut board, BOARD_ROWS - 1, &[]);
        board.clear_lines();
    }
    assert_eq!(board.level(), 16);
    assert_eq!(board.gravity_interval_ms(), 50.0);
}

#[test]
fn stacking_out_ends_the_game_until_restart() {
    let mut board = Board::new(9);
    board.start();
    for _ in 0..200 {
        if board.is_game_over() {
            break;
        }
        board.hard_drop();
    }
    assert!(board.is_game_over());
    assert!(!board.is_running());

    let score = board.score();
    board.resume();
    board.hard_drop();
    assert!(!board.is_running());
    assert_eq!(board.score(), score);

    board.start();
    assert!(board.is_running());
    assert_eq!(board.score(), 0);
}

#[test]
fn paused_board_ignores_input() {
    let mut board = running(Tetromino::L);
    board.pause();
    let before = board.piece().copied();
    assert!(!board.move_by(1, 0));
    board.rotate_cw();
    board.hard_drop();
    assert_eq!(board.piece().copied(), before);
    assert_eq!(board.score(), 0);
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Left,
    Right,
    Cw,
    Ccw,
    Soft,
    Hard,
    Gravity,
}

fn op() -> impl Strategy<Value = Op> {
    prop::sample::select(vec![Op::Left, Op::Right, Op::Cw, Op::Ccw, Op::Soft, Op::Hard, Op::Gravity])
}

proptest! {
    #[test]
    fn four_quarter_turns_are_identity(kind in prop::sample::select(Tetromino::ALL.to_vec())) {
        let shape = kind.shape();
        let turned = shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
        prop_assert_eq!(turned, shape);
        prop_assert_eq!(shape.rotated_cw().rotated_ccw(), shape);
        prop_assert_eq!(shape.rotated_cw().blocks().count(), 4);
    }

    #[test]
    fn falling_piece_stays_on_the_board(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..200)) {
        let mut board = Board::new(seed);
        board.start();
        for op in ops {
            match op {
                Op::Left => { board.move_by(-1, 0); }
                Op::Right => { board.move_by(1, 0); }
                Op::Cw => board.rotate_cw(),
                Op::Ccw => board.rotate_ccw(),
                Op::Soft => board.soft_drop(),
                Op::Hard => board.hard_drop(),
                Op::Gravity => board.drop(),
            }
            if board.is_game_over() {
                break;
            }
            let piece = board.piece().copied().unwrap();
            for (bx, by) in piece.shape.blocks() {
                let (x, y) = (piece.x + bx, piece.y + by);
                prop_assert!((0..BOARD_COLS as i32).contains(&x));
                prop_assert!((0..BOARD_ROWS as i32).contains(&y));
                prop_assert_eq!(board.cell(x as usize, y as usize), None);
            }
        }
        for y in 0..BOARD_ROWS {
            let full = (0..BOARD_COLS).all(|x| board.cell(x, y).is_some());
            prop_assert!(!full, "row {} left full", y);
        }
    }
}
