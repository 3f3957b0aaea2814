//! Save/load of the daily leaderboard
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the save)
//! - Unknown versions are rejected rather than guessed at

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::ScoreEntry;

/// Current save format version
pub const LEADERBOARD_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("leaderboard file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported leaderboard file version {found} (expected {})", LEADERBOARD_FILE_VERSION)]
    UnsupportedVersion { found: u32 },
}

/// On-disk form of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardFile {
    pub version: u32,
    /// Local day the entries were recorded on
    pub day_marker: i64,
    pub entries: Vec<ScoreEntry>,
}

impl LeaderboardFile {
    pub fn new(day_marker: i64, entries: Vec<ScoreEntry>) -> Self {
        Self {
            version: LEADERBOARD_FILE_VERSION,
            day_marker,
            entries,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let file: Self = serde_json::from_str(json)?;
        if file.version != LEADERBOARD_FILE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: file.version,
            });
        }
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a saved leaderboard; `Ok(None)` if nothing has been saved yet
pub fn load(path: &Path) -> Result<Option<LeaderboardFile>, PersistenceError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file = LeaderboardFile::from_json(&json)?;
    log::info!(
        "Loaded {} leaderboard entries from {}",
        file.entries.len(),
        path.display()
    );
    Ok(Some(file))
}

/// Save a leaderboard, replacing any previous save atomically
pub fn save(path: &Path, file: &LeaderboardFile) -> Result<(), PersistenceError> {
    let json = file.to_json()?;
    let tmp = path.with_extension("tmp");
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    log::info!(
        "Leaderboard saved ({} entries) to {}",
        file.entries.len(),
        path.display()
    );
    Ok(())
}
