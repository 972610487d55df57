//! Best score per game
//!
//! One number per game name in a small JSON file. A score is written back
//! only when it beats the stored best.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::Outcome;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    scores: BTreeMap<String, u64>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored best for a game, 0 if none
    pub fn best(&self, game: &str) -> u64 {
        self.scores.get(game).copied().unwrap_or(0)
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn submit(&mut self, game: &str, score: u64) -> bool {
        if score == 0 || score <= self.best(game) {
            return false;
        }
        self.scores.insert(game.to_string(), score);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.scores.iter().map(|(game, score)| (game.as_str(), *score))
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Load from `path`; a missing or corrupt file starts fresh
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.scores.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high scores in {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores from {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("High scores saved ({} games)", self.scores.len());
        Ok(())
    }

    /// Load, submit and save in one go. The file is only written when the
    /// score is a new best. Returns whether it was.
    pub fn record(path: &Path, game: &str, score: u64) -> Result<bool> {
        let mut scores = Self::load(path);
        if !scores.submit(game, score) {
            return Ok(false);
        }
        scores.save(path)?;
        log::info!("New {} high score: {}", game, score);
        Ok(true)
    }

    /// Record a run's frozen final score. A run that never reached a
    /// terminal state has no final score and is not recorded.
    pub fn record_run(path: &Path, game: &str, outcome: Option<&Outcome>) -> Result<bool> {
        match outcome {
            Some(outcome) => Self::record(path, game, outcome.final_score),
            None => Ok(false),
        }
    }
}
