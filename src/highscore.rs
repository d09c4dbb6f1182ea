//! High-score persistence
//!
//! A single integer, read once at startup and written back only when a run
//! ends with a strictly better score. Missing or corrupt files are treated
//! as "no previous high score" - logged, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk envelope for the persisted score.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HighScoreFile {
    score: u32,
}

/// The load/compare/write contract around the persisted high score.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    /// Value read at startup. Writes compare against this, not against any
    /// score written since - one record per process run.
    loaded: u32,
    /// Best score seen so far this process, for display.
    best: u32,
}

impl HighScoreStore {
    /// Read the store once. Absence or corruption yields 0.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let loaded = read_score(&path);
        Self {
            path,
            loaded,
            best: loaded,
        }
    }

    /// In-memory store for tests and headless runs; never touches disk.
    pub fn in_memory(loaded: u32) -> Self {
        Self {
            path: PathBuf::new(),
            loaded,
            best: loaded,
        }
    }

    /// The high score as loaded at startup.
    pub fn loaded_score(&self) -> u32 {
        self.loaded
    }

    /// The best score seen this process (for the HUD).
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Track a running score for display. Does not write.
    pub fn observe(&mut self, score: u32) {
        if score > self.best {
            self.best = score;
        }
    }

    /// Called at a life-ending event: persist `score` iff it strictly beats
    /// the value loaded at startup. Returns whether a write happened.
    pub fn maybe_record(&mut self, score: u32) -> bool {
        self.observe(score);
        if score <= self.loaded {
            return false;
        }
        if self.path.as_os_str().is_empty() {
            return true;
        }
        match serde_json::to_string(&HighScoreFile { score }) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::warn!("failed to write high score to {:?}: {err}", self.path);
                    false
                } else {
                    log::info!("new high score {score} written to {:?}", self.path);
                    true
                }
            }
            Err(err) => {
                log::warn!("failed to encode high score: {err}");
                false
            }
        }
    }
}

fn read_score(path: &Path) -> u32 {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<HighScoreFile>(&contents) {
            Ok(file) => file.score,
            Err(err) => {
                log::warn!("corrupt high score file {path:?}: {err}; starting at 0");
                0
            }
        },
        Err(err) => {
            log::info!("no high score file at {path:?} ({err}); starting at 0");
            0
        }
    }
}
