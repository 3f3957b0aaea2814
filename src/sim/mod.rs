//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick motion, never scaled by frame time
//! - Seeded RNG only
//! - Stable iteration order (walls in drawing order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, EdgeHits, bounce_off_bounds, first_obstacle_hit, reflect_velocity};
pub use geometry::{Rect, point_in_rect, segment_intersects_rect, segments_intersect};
pub use state::{
    GameEvent, Home, HomePlacement, Obstacle, Pig, Round, RoundConfig, RoundSnapshot, RoundStatus,
    TooFewPoints,
};
pub use tick::{MotionReport, advance_pig, tick};
