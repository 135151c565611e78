use rand::Rng;

use crate::{
    identity, mirror_board, mirror_transpose_board, query, transpose_board,
    transpose_mirror_board, Board, Cell, Direction, Transform, MAX_TILE,
};

pub const INITIAL_TILE_COUNT_MIN: usize = 2;
pub const INITIAL_TILE_COUNT_MAX: usize = 4;
/// A spawned tile is a 4 one time in this many, otherwise a 2.
pub const FOUR_TILE_ODDS: usize = 10;

/// Reorientation that turns a move into a left merge, and its exact inverse.
#[derive(Clone, Copy)]
pub struct Orientation {
    pub prepare: Transform,
    pub restore: Transform,
}

const ORIENTATIONS: [Orientation; 4] = [
    Orientation {
        prepare: identity,
        restore: identity,
    },
    Orientation {
        prepare: mirror_board,
        restore: mirror_board,
    },
    Orientation {
        prepare: transpose_board,
        restore: transpose_board,
    },
    Orientation {
        prepare: transpose_mirror_board,
        restore: mirror_transpose_board,
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeResult {
    pub board: Board,
    pub score: u64,
}

pub const fn orientation(direction: Direction) -> Orientation {
    ORIENTATIONS[direction as usize]
}

/// Slides a line toward index 0, merging each equal adjacent pair once.
///
/// Returns the new line (same length) and the sum of the merged tile values.
/// [`MAX_TILE`] tiles slide but stay unmerged.
pub fn merge_line(line: &[Cell]) -> (Vec<Cell>, u64) {
    let mut merged = Vec::with_capacity(line.len());
    let mut score = 0;

    let mut tiles = line.iter().flatten().copied().peekable();

    while let Some(tile) = tiles.next() {
        if tiles.next_if(|&next| next == tile && tile < MAX_TILE).is_some() {
            let value = tile * 2;
            score += u64::from(value);
            merged.push(Some(value));
        } else {
            merged.push(Some(tile));
        }
    }

    merged.resize(line.len(), None);

    (merged, score)
}

/// Applies a move. Never spawns a tile and never touches `board`.
pub fn merge_board(board: &Board, direction: Direction) -> MergeResult {
    let Orientation { prepare, restore } = orientation(direction);

    let mut score = 0;

    let merged = prepare(board).map_rows(|row| {
        let (line, line_score) = merge_line(row);
        score += line_score;
        line
    });

    MergeResult {
        board: restore(&merged),
        score,
    }
}

/// The move result, or `None` when the move leaves the board unchanged.
pub fn try_move(board: &Board, direction: Direction) -> Option<MergeResult> {
    let result = merge_board(board, direction);

    (!query::boards_equal(board, &result.board)).then_some(result)
}

pub fn try_all_moves(board: &Board) -> [Option<MergeResult>; 4] {
    Direction::ALL.map(|direction| try_move(board, direction))
}

/// Places a 2 (or, one time in [`FOUR_TILE_ODDS`], a 4) on a uniformly chosen empty cell.
/// Does nothing on a full board.
pub fn add_random_tile(rng: &mut impl Rng, board: &mut Board) {
    let empty_cells = query::empty_cells(board);

    if empty_cells.is_empty() {
        return;
    }

    let rand = rng.gen_range(0..empty_cells.len() * FOUR_TILE_ODDS);

    let (row, col) = empty_cells[rand / FOUR_TILE_ODDS];
    let value = if rand % FOUR_TILE_ODDS == 0 { 4 } else { 2 };

    board.set(row, col, Some(value));
}

/// Empty board of the given size seeded with two to four random tiles.
pub fn init_board(rng: &mut impl Rng, size: usize) -> Board {
    let mut board = Board::empty(size);

    let tile_count = rng.gen_range(INITIAL_TILE_COUNT_MIN..=INITIAL_TILE_COUNT_MAX);

    for _ in 0..tile_count {
        add_random_tile(rng, &mut board);
    }

    board
}
