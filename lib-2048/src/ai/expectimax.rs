use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    metrics::{self, EvaluationWeights},
    query, Board, Direction,
};

use super::Ai;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Player plies searched, counting the root move.
    pub depth: u32,
    /// Chance nodes expand only the first this-many empty cells in row-major order.
    pub max_chance_samples: usize,
    /// Probability that a spawned tile is a 2.
    pub prob2: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            max_chance_samples: 6,
            prob2: 0.9,
        }
    }
}

pub struct ExpectimaxAi {
    config: SearchConfig,
    weights: EvaluationWeights,
    // One table per remaining depth, cleared before each search.
    transposition_tables: Vec<FxHashMap<Board, f64>>,
}

impl Ai for ExpectimaxAi {
    fn get_next_move(&mut self, board: &Board) -> Option<Direction> {
        let start = Instant::now();

        let depth = self.config.depth.saturating_sub(1);

        self.transposition_tables.clear();
        self.transposition_tables
            .resize_with(depth as usize + 1, FxHashMap::default);

        // Strictly greater replaces, so ties keep the earlier direction.
        let best = super::get_all_moves(board).fold(
            None,
            |best: Option<(f64, Direction)>, (new_board, direction)| {
                let score = self.expectimax_opponent_move(&new_board, depth);

                match best {
                    Some((best_score, _)) if score <= best_score => best,
                    _ => Some((score, direction)),
                }
            },
        );

        debug!(
            ?best,
            size = board.size(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "expectimax search finished"
        );

        best.map(|(_, direction)| direction)
    }
}

impl ExpectimaxAi {
    pub fn new(config: SearchConfig, weights: EvaluationWeights) -> Self {
        Self {
            config,
            weights,
            transposition_tables: Vec::new(),
        }
    }

    fn evaluate(&self, board: &Board) -> f64 {
        metrics::evaluate(board, &self.weights)
    }

    fn expectimax_opponent_move(&mut self, board: &Board, depth: u32) -> f64 {
        if let Some(&score) = self.transposition_tables[depth as usize].get(board) {
            return score;
        }

        let empty_cells = query::empty_cells(board);

        if empty_cells.is_empty() {
            return self.evaluate(board);
        }

        let SearchConfig {
            max_chance_samples,
            prob2,
            ..
        } = self.config;

        // Weighted over every empty cell even though only the first few are expanded.
        let probability = 1.0 / empty_cells.len() as f64;

        let score = empty_cells
            .iter()
            .take(max_chance_samples)
            .fold(0.0, |total_score, &(row, col)| {
                let score2 = self.expectimax_player_move(&board.with_tile(row, col, 2), depth);
                let score4 = self.expectimax_player_move(&board.with_tile(row, col, 4), depth);

                total_score + prob2 * probability * score2 + (1.0 - prob2) * probability * score4
            });

        self.transposition_tables[depth as usize].insert(board.clone(), score);

        score
    }

    fn expectimax_player_move(&mut self, board: &Board, depth: u32) -> f64 {
        let Some(depth) = depth.checked_sub(1) else {
            return self.evaluate(board);
        };

        super::get_all_moves(board)
            .map(|(new_board, _)| self.expectimax_opponent_move(&new_board, depth))
            .max_by(f64::total_cmp)
            .unwrap_or_else(|| self.evaluate(board))
    }
}

/// Best move for `board`, or `Left` when no move changes it.
pub fn search(board: &Board, config: &SearchConfig, weights: &EvaluationWeights) -> Direction {
    ExpectimaxAi::new(*config, *weights)
        .get_next_move(board)
        .unwrap_or(Direction::Left)
}
