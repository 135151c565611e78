use crate::{Board, MAX_TILE};

/// `(row, col)` of every empty cell, row by row, left to right.
pub fn empty_cells(board: &Board) -> Vec<(usize, usize)> {
    let size = board.size();

    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_none())
        .map(|(i, _)| (i / size, i % size))
        .collect()
}

pub fn has_empty_cells(board: &Board) -> bool {
    board.cells().iter().any(Option::is_none)
}

fn has_adjacent_matches(board: &Board) -> bool {
    let size = board.size();

    (0..size).any(|row| {
        (0..size).any(|col| {
            let Some(value) = board.get(row, col).filter(|&value| value < MAX_TILE) else {
                return false;
            };

            let right = col + 1 < size && board.get(row, col + 1) == Some(value);
            let below = row + 1 < size && board.get(row + 1, col) == Some(value);

            right || below
        })
    })
}

/// No empty cell and no equal neighbours in any row or column.
pub fn is_game_over(board: &Board) -> bool {
    !has_empty_cells(board) && !has_adjacent_matches(board)
}

/// Exact match against `target`; a board holding only larger tiles does not count.
pub fn has_winning_tile(board: &Board, target: u32) -> bool {
    board.cells().contains(&Some(target))
}

pub fn boards_equal(a: &Board, b: &Board) -> bool {
    a == b
}
