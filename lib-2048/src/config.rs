use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{ai::expectimax::SearchConfig, metrics::EvaluationWeights};

pub const DEFAULT_BOARD_SIZE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub size: usize,
    pub name: &'static str,
    pub winning_tile: u32,
}

pub const BOARD_CONFIGS: [BoardConfig; 3] = [
    BoardConfig {
        size: 4,
        name: "4×4",
        winning_tile: 2048,
    },
    BoardConfig {
        size: 5,
        name: "5×5",
        winning_tile: 4096,
    },
    BoardConfig {
        size: 6,
        name: "6×6",
        winning_tile: 8192,
    },
];

impl BoardConfig {
    pub fn for_size(size: usize) -> Option<Self> {
        BOARD_CONFIGS.into_iter().find(|config| config.size == size)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BOARD_CONFIGS[0]
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse tuning file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Search and evaluation tuning, loadable from a JSON file. Missing fields keep their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub search: SearchConfig,
    pub weights: EvaluationWeights,
}

impl AiConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&text)?)
    }
}
