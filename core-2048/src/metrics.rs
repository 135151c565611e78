//! Static board evaluation for search leaves.

use std::cmp::{self, Ordering};

use serde::{Deserialize, Serialize};

use crate::{query, transpose_board, Board, Cell};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub empty: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub corner: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            empty: 2.7,
            monotonicity: 1.0,
            smoothness: 0.1,
            corner: 1.0,
        }
    }
}

pub fn empty_count(board: &Board) -> u32 {
    query::empty_cells(board).len() as u32
}

/// Larger of the strictly increasing and strictly decreasing neighbour counts. Empty is 0.
pub fn line_monotonicity(line: &[Cell]) -> u32 {
    let (increasing, decreasing) = line.windows(2).fold((0, 0), |(increasing, decreasing), pair| {
        match pair[0].unwrap_or(0).cmp(&pair[1].unwrap_or(0)) {
            Ordering::Less => (increasing + 1, decreasing),
            Ordering::Greater => (increasing, decreasing + 1),
            Ordering::Equal => (increasing, decreasing),
        }
    });

    cmp::max(increasing, decreasing)
}

/// [`line_monotonicity`] summed over every row and every column.
pub fn monotonicity_score(board: &Board) -> u32 {
    let row_score: u32 = board.rows().map(line_monotonicity).sum();
    let column_score: u32 = transpose_board(board).rows().map(line_monotonicity).sum();

    row_score + column_score
}

/// Minus the log2 gap between every pair of occupied right and bottom neighbours.
pub fn smoothness_score(board: &Board) -> f64 {
    let size = board.size();
    let mut smoothness = 0.0;

    for row in 0..size {
        for col in 0..size {
            let Some(value) = board.get(row, col) else {
                continue;
            };

            let neighbours = [
                (col + 1 < size).then(|| board.get(row, col + 1)).flatten(),
                (row + 1 < size).then(|| board.get(row + 1, col)).flatten(),
            ];

            for neighbour in neighbours.into_iter().flatten() {
                smoothness -= (f64::from(value).log2() - f64::from(neighbour).log2()).abs();
            }
        }
    }

    smoothness
}

/// The largest tile if it sits in a corner, else 0.
pub fn corner_score(board: &Board) -> u32 {
    let max_tile = board.max_tile();
    let last = board.size() - 1;

    let in_corner = [(0, 0), (0, last), (last, 0), (last, last)]
        .into_iter()
        .any(|(row, col)| board.get(row, col) == Some(max_tile));

    if in_corner {
        max_tile
    } else {
        0
    }
}

pub fn evaluate(board: &Board, weights: &EvaluationWeights) -> f64 {
    weights.empty * f64::from(empty_count(board))
        + weights.monotonicity * f64::from(monotonicity_score(board))
        + weights.smoothness * smoothness_score(board)
        + weights.corner * f64::from(corner_score(board))
}
