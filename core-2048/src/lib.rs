//! Board engine for N×N sliding-tile games.
//!
//! Moves are reduced to "merge every row left" by reorienting the board with the transforms
//! below, merging, and reorienting back.

mod board;
mod direction;

pub mod logic;
pub mod metrics;
pub mod query;

pub use board::{Board, BoardError, Cell, MAX_TILE};
pub use direction::{Direction, ParseDirectionError};

/// Pure board-to-board reorientation.
pub type Transform = fn(&Board) -> Board;

pub fn identity(board: &Board) -> Board {
    board.clone()
}

/// Swaps rows and columns. Self-inverse.
pub fn transpose_board(board: &Board) -> Board {
    Board::from_fn(board.size(), |row, col| board.get(col, row))
}

/// Reverses every row. Self-inverse.
pub fn mirror_board(board: &Board) -> Board {
    let last = board.size() - 1;

    Board::from_fn(board.size(), |row, col| board.get(row, last - col))
}

/// Quarter turn clockwise.
pub fn rotate_board(board: &Board) -> Board {
    let last = board.size() - 1;

    Board::from_fn(board.size(), |row, col| board.get(last - col, row))
}

pub fn rotate(board: &Board, quarter_turns: usize) -> Board {
    (0..quarter_turns % 4).fold(board.clone(), |board, _| rotate_board(&board))
}

/// Transpose, then mirror.
pub fn transpose_mirror_board(board: &Board) -> Board {
    mirror_board(&transpose_board(board))
}

/// Mirror, then transpose. Inverse of [`transpose_mirror_board`].
pub fn mirror_transpose_board(board: &Board) -> Board {
    transpose_board(&mirror_board(board))
}

/// Right-to-left composition: the last transform runs first. No transforms is the identity.
pub fn compose(transforms: &[Transform]) -> impl Fn(&Board) -> Board + '_ {
    move |board| {
        transforms
            .iter()
            .rev()
            .fold(board.clone(), |board, transform| transform(&board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        Board::from_rows([[2, 4, 8], [16, 32, 64], [128, 256, 0]])
    }

    #[test]
    fn transpose_swaps_axes() {
        let board = Board::from_rows([[2, 4], [8, 16]]);

        assert_eq!(transpose_board(&board), Board::from_rows([[2, 8], [4, 16]]));
    }

    #[test]
    fn mirror_reverses_rows_without_touching_input() {
        let board = sample();
        let mirrored = mirror_board(&board);

        assert_eq!(
            mirrored,
            Board::from_rows([[8, 4, 2], [64, 32, 16], [0, 256, 128]])
        );
        assert_eq!(board, sample());
    }

    #[test]
    fn transforms_are_involutions() {
        let board = sample();

        assert_eq!(transpose_board(&transpose_board(&board)), board);
        assert_eq!(mirror_board(&mirror_board(&board)), board);
        assert_eq!(
            mirror_transpose_board(&transpose_mirror_board(&board)),
            board
        );
    }

    #[test]
    fn rotate_clockwise() {
        let board = Board::from_rows([[2, 4], [8, 16]]);

        assert_eq!(rotate_board(&board), Board::from_rows([[8, 2], [16, 4]]));
        assert_eq!(rotate_board(&board), transpose_mirror_board(&board));
    }

    #[test]
    fn four_quarter_turns_return_to_start() {
        let board = sample();
        let stepwise = (0..4).fold(board.clone(), |board, _| rotate_board(&board));

        assert_eq!(stepwise, board);
        assert_eq!(rotate(&board, 4), board);
        assert_eq!(rotate(&board, 5), rotate_board(&board));
    }

    #[test]
    fn compose_applies_right_to_left() {
        let board = sample();

        assert_eq!(
            compose(&[mirror_board, transpose_board])(&board),
            transpose_mirror_board(&board)
        );
        assert_eq!(
            compose(&[transpose_board, mirror_board])(&board),
            mirror_transpose_board(&board)
        );
        assert_eq!(compose(&[])(&board), board);
    }
}
