//! Best-score storage keyed by board size.
//!
//! Stores never fail outward: read problems yield 0 and write problems are logged and dropped.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::warn;

const BEST_SCORE_PREFIX: &str = "game2048_best_score_";

pub trait BestScoreStore {
    fn load(&self, size: usize) -> u64;
    fn save(&mut self, size: usize, score: u64);
}

pub fn storage_key(size: usize) -> String {
    format!("{BEST_SCORE_PREFIX}{size}x{size}")
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    scores: BTreeMap<usize, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self, size: usize) -> u64 {
        self.scores.get(&size).copied().unwrap_or(0)
    }

    fn save(&mut self, size: usize, score: u64) {
        self.scores.insert(size, score);
    }
}

#[derive(thiserror::Error, Debug)]
enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// All best scores in one JSON object, e.g. `{"game2048_best_score_4x4": 1024}`.
///
/// Other keys in the object are kept as they are, whatever their type.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clear(&mut self, size: usize) {
        let result = self.read_scores().and_then(|mut scores| {
            scores.remove(&storage_key(size));
            self.write_scores(&scores)
        });

        if let Err(err) = result {
            warn!(%err, size, path = %self.path.display(), "failed to clear best score");
        }
    }

    pub fn clear_all(&mut self) {
        let result = self.read_scores().and_then(|mut scores| {
            scores.retain(|key, _| !key.starts_with(BEST_SCORE_PREFIX));
            self.write_scores(&scores)
        });

        if let Err(err) = result {
            warn!(%err, path = %self.path.display(), "failed to clear best scores");
        }
    }

    fn read_scores(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_scores(&self, scores: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(scores)?;
        fs::write(&self.path, text)?;

        Ok(())
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self, size: usize) -> u64 {
        match self.read_scores() {
            Ok(scores) => scores
                .get(&storage_key(size))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            Err(err) => {
                warn!(%err, size, path = %self.path.display(), "failed to load best score");
                0
            }
        }
    }

    fn save(&mut self, size: usize, score: u64) {
        // An unreadable file is overwritten.
        let mut scores = self.read_scores().unwrap_or_else(|err| {
            warn!(%err, path = %self.path.display(), "discarding unreadable best scores");
            BTreeMap::new()
        });

        scores.insert(storage_key(size), Value::from(score));

        if let Err(err) = self.write_scores(&scores) {
            warn!(%err, size, score, path = %self.path.display(), "failed to save best score");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_both_dimensions() {
        assert_eq!(storage_key(5), "game2048_best_score_5x5");
    }

    #[test]
    fn memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();

        assert_eq!(store.load(4), 0);
        store.save(4, 512);
        assert_eq!(store.load(4), 512);
        assert_eq!(store.load(5), 0);
    }
}
