use crate::{
    ai::{
        expectimax::{ExpectimaxAi, SearchConfig},
        Ai,
    },
    metrics::EvaluationWeights,
    Board, Direction,
};

use super::{HintError, HintProvider};

/// Expectimax search on the local machine. Always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalProvider {
    config: SearchConfig,
    weights: EvaluationWeights,
}

impl LocalProvider {
    pub const fn new(config: SearchConfig, weights: EvaluationWeights) -> Self {
        Self { config, weights }
    }
}

impl HintProvider for LocalProvider {
    fn name(&self) -> &str {
        "Local"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn get_hint(&self, board: &Board) -> Result<Direction, HintError> {
        let direction = ExpectimaxAi::new(self.config, self.weights)
            .get_next_move(board)
            .unwrap_or(Direction::Left);

        Ok(direction)
    }
}
