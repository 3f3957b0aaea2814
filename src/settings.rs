//! Game settings and preferences
//!
//! Read from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_PLAYER_NAME, PIG_SPEED};
use crate::sim::RoundConfig;

pub use crate::sim::HomePlacement;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Gameplay ===
    /// Where home goes on reset
    pub home_placement: HomePlacement,
    /// Pig speed in canvas units per tick
    pub pig_speed: f32,
    /// RNG seed; a fresh one is drawn per run when absent
    pub seed: Option<u64>,

    // === Leaderboard ===
    /// Name attached to recorded times
    pub player_name: String,
    /// Local timezone for the daily reset, minutes east of UTC
    pub utc_offset_minutes: i32,
    /// Where the leaderboard is saved; in-memory only when absent
    pub leaderboard_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,

            home_placement: HomePlacement::Random,
            pig_speed: PIG_SPEED,
            seed: None,

            player_name: DEFAULT_PLAYER_NAME.to_string(),
            utc_offset_minutes: 0,
            leaderboard_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    /// Round tunables derived from these settings
    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            canvas: self.canvas(),
            placement: self.home_placement,
            pig_speed: self.pig_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"home_placement": "fixed", "seed": 42}"#).unwrap();
        assert_eq!(settings.home_placement, HomePlacement::Fixed);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.canvas(), Vec2::new(800.0, 600.0));
        assert_eq!(settings.player_name, "Anonymous");
    }

    #[test]
    fn test_round_config_follows_settings() {
        let settings = Settings {
            canvas_width: 480.0,
            canvas_height: 320.0,
            pig_speed: 4.0,
            ..Default::default()
        };
        let config = settings.round_config();
        assert_eq!(config.canvas, Vec2::new(480.0, 320.0));
        assert_eq!(config.pig_speed, 4.0);
        assert_eq!(config.placement, HomePlacement::Random);
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let path = std::env::temp_dir().join("nini-home-settings-does-not-exist.json");
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Io { .. })));
        assert_eq!(Settings::load(Some(&path)), Settings::default());
    }

    #[test]
    fn test_bad_placement_rejected() {
        let result: Result<Settings, _> = serde_json::from_str(r#"{"home_placement": "moon"}"#);
        assert!(result.is_err());
    }
}
