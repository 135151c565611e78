use crate::{logic, Board, Direction};

pub mod expectimax;
pub mod random;

pub trait Ai {
    /// `None` when no move changes the board.
    fn get_next_move(&mut self, board: &Board) -> Option<Direction>;
}

fn get_all_moves(board: &Board) -> impl Iterator<Item = (Board, Direction)> + '_ {
    Direction::iter().filter_map(move |direction| {
        logic::try_move(board, direction).map(|result| (result.board, direction))
    })
}

/// Expectimax suggestion with the default tuning. Falls back to `Left` on a stuck board.
pub fn get_local_ai_hint(board: &Board) -> Direction {
    expectimax::search(
        board,
        &expectimax::SearchConfig::default(),
        &crate::metrics::EvaluationWeights::default(),
    )
}
