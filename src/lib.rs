//! Nini Doesn't Want to Go Home - steer a runaway pig with drawn walls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, round state)
//! - `session`: Command queue and generation-gated tick scheduling
//! - `leaderboard`: Daily best-times store
//! - `api`: Leaderboard HTTP contract (transport agnostic)
//! - `persistence`: Save/load of the leaderboard
//! - `platform`: Clock and timezone abstraction
//! - `settings`: Data-driven configuration

pub mod api;
pub mod leaderboard;
pub mod logging;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use leaderboard::{Leaderboard, ScoreEntry, SharedLeaderboard};
pub use session::{Command, ScoreSink, Session, TickTicket};
pub use settings::{HomePlacement, Settings};

/// Game configuration constants
pub mod consts {
    /// Gap kept between placed objects and the canvas edge
    pub const CANVAS_PADDING: f32 = 20.0;

    /// Pig defaults
    pub const PIG_SIZE: f32 = 30.0;
    /// Distance travelled per tick (not time-scaled)
    pub const PIG_SPEED: f32 = 3.0;
    /// Hitbox shrink per side, avoids collisions on near-miss grazes
    pub const HITBOX_INSET: f32 = 5.0;

    /// Home defaults
    pub const HOME_SIZE: f32 = 100.0;

    /// Canvases narrower than this slow the pig down in fixed placement
    pub const NARROW_CANVAS_WIDTH: f32 = 500.0;
    pub const NARROW_CANVAS_SPEED_SCALE: f32 = 0.7;

    /// Upper bound on spawn rejection sampling
    pub const MAX_SPAWN_ATTEMPTS: u32 = 256;

    /// Leaderboard defaults
    pub const MAX_SCORES: usize = 10;
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

    /// Nominal frame rate used by the headless driver
    pub const FRAME_RATE: f64 = 60.0;
}

/// Format elapsed seconds the way the HUD shows them (one decimal)
#[inline]
pub fn format_seconds(secs: f64) -> String {
    format!("{secs:.1}")
}
