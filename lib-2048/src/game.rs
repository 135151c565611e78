use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::BoardConfig, logic, persist::BestScoreStore, query, Board, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Paused,
    Won,
    Lost,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("unsupported board size {0}")]
    UnsupportedSize(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the move was applied (and a tile spawned).
    pub changed: bool,
    pub score_gained: u64,
    pub status: GameStatus,
}

/// One player session: board, score, status, and the best score for the current size.
pub struct Game<S, R> {
    config: BoardConfig,
    board: Board,
    score: u64,
    best_score: u64,
    status: GameStatus,
    store: S,
    rng: R,
}

impl<S, R> Game<S, R>
where
    S: BestScoreStore,
    R: Rng,
{
    pub fn new(store: S, rng: R) -> Self {
        Self::from_config(BoardConfig::default(), store, rng)
    }

    pub fn with_size(size: usize, store: S, rng: R) -> Result<Self, GameError> {
        let config = BoardConfig::for_size(size).ok_or(GameError::UnsupportedSize(size))?;

        Ok(Self::from_config(config, store, rng))
    }

    /// Resumes from an existing position with a zero score.
    pub fn from_board(board: Board, store: S, rng: R) -> Result<Self, GameError> {
        let size = board.size();
        let config = BoardConfig::for_size(size).ok_or(GameError::UnsupportedSize(size))?;
        let best_score = store.load(size);

        Ok(Self {
            config,
            board,
            score: 0,
            best_score,
            status: GameStatus::Playing,
            store,
            rng,
        })
    }

    fn from_config(config: BoardConfig, store: S, mut rng: R) -> Self {
        let board = logic::init_board(&mut rng, config.size);
        let best_score = store.load(config.size);

        Self {
            config,
            board,
            score: 0,
            best_score,
            status: GameStatus::Playing,
            store,
            rng,
        }
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn score(&self) -> u64 {
        self.score
    }

    pub const fn best_score(&self) -> u64 {
        self.best_score
    }

    pub const fn status(&self) -> GameStatus {
        self.status
    }

    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub const fn size(&self) -> usize {
        self.config.size
    }

    pub const fn winning_tile(&self) -> u32 {
        self.config.winning_tile
    }

    /// Directions that would change the current board.
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::iter()
            .filter(|&direction| logic::try_move(&self.board, direction).is_some())
            .collect()
    }

    /// Applies a move. Ignored outside `Playing` and when the board would not change.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let unchanged = MoveOutcome {
            changed: false,
            score_gained: 0,
            status: self.status,
        };

        if self.status != GameStatus::Playing {
            return unchanged;
        }

        let Some(logic::MergeResult {
            board: mut new_board,
            score: score_gained,
        }) = logic::try_move(&self.board, direction)
        else {
            return unchanged;
        };

        logic::add_random_tile(&mut self.rng, &mut new_board);
        self.board = new_board;

        self.score += score_gained;

        if self.score > self.best_score {
            self.best_score = self.score;
            self.store.save(self.config.size, self.best_score);
        }

        debug!(%direction, score_gained, score = self.score, "move applied");

        if query::has_winning_tile(&self.board, self.config.winning_tile) {
            info!(score = self.score, tile = self.config.winning_tile, "game won");
            self.status = GameStatus::Won;
        } else if query::is_game_over(&self.board) {
            info!(score = self.score, best_score = self.best_score, "game lost");
            self.status = GameStatus::Lost;
        }

        MoveOutcome {
            changed: true,
            score_gained,
            status: self.status,
        }
    }

    /// Fresh board and zero score. The best score is kept.
    pub fn restart(&mut self) {
        self.board = logic::init_board(&mut self.rng, self.config.size);
        self.score = 0;
        self.status = GameStatus::Playing;
    }

    /// Starts a new game on a board of `size`, with that size's best score.
    pub fn set_board_size(&mut self, size: usize) -> Result<(), GameError> {
        let config = BoardConfig::for_size(size).ok_or(GameError::UnsupportedSize(size))?;

        self.config = config;
        self.best_score = self.store.load(size);
        self.restart();

        Ok(())
    }

    /// Leaves the `Won` state and keeps playing on the same board.
    pub fn continue_playing(&mut self) {
        if self.status == GameStatus::Won {
            self.status = GameStatus::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
        }
    }
}
