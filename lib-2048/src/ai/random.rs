use rand::Rng;

use crate::{Board, Direction};

use super::Ai;

/// Picks uniformly among the moves that change the board.
pub struct RandomAi<R> {
    rng: R,
}

impl<R> Ai for RandomAi<R>
where
    R: Rng,
{
    fn get_next_move(&mut self, board: &Board) -> Option<Direction> {
        let moves: Vec<Direction> = super::get_all_moves(board)
            .map(|(_, direction)| direction)
            .collect();

        (!moves.is_empty()).then(|| moves[self.rng.gen_range(0..moves.len())])
    }
}

impl<R> RandomAi<R>
where
    R: Rng,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn only_picks_changing_moves() {
        let mut ai = RandomAi::new(ChaCha8Rng::seed_from_u64(7));
        // Only Right and Down change this board.
        let board = Board::from_rows([[2, 0], [0, 0]]);

        for _ in 0..50 {
            let direction = ai.get_next_move(&board);
            assert!(matches!(direction, Some(Direction::Right | Direction::Down)));
        }
    }

    #[test]
    fn stuck_board_has_no_move() {
        let mut ai = RandomAi::new(ChaCha8Rng::seed_from_u64(7));

        assert_eq!(ai.get_next_move(&Board::from_rows([[2, 4], [4, 2]])), None);
    }
}
