//! Fixed-step simulation tick
//!
//! Moves the pig one step, resolves edge and wall bounces, then checks
//! whether it made it home.

use glam::Vec2;

use super::collision::{CollisionResult, EdgeHits, bounce_off_bounds, first_obstacle_hit, reflect_velocity};
use super::state::{GameEvent, Obstacle, Pig, Round, RoundStatus};

/// What happened to the pig during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReport {
    pub edges: EdgeHits,
    /// At most one wall is resolved per step
    pub collision: Option<CollisionResult>,
}

/// Advance the pig by one step against the canvas and the walls
///
/// Speed is per tick, not per second. Only the first wall segment touching
/// the hitbox is resolved; the pig is then nudged once along its new velocity
/// and kept inside the canvas.
pub fn advance_pig(pig: &mut Pig, obstacles: &[Obstacle], bounds: Vec2) -> MotionReport {
    pig.pos += pig.vel;

    let edges = bounce_off_bounds(&mut pig.pos, &mut pig.vel, pig.size, bounds);

    let collision = first_obstacle_hit(&pig.hitbox(), obstacles);
    if let Some(hit) = collision {
        pig.vel = reflect_velocity(pig.vel, hit.normal);
        pig.pos += pig.vel;
        // The nudge must not carry the pig through a canvas edge
        pig.pos.x = pig.pos.x.min(bounds.x - pig.size).max(0.0);
        pig.pos.y = pig.pos.y.min(bounds.y - pig.size).max(0.0);
    }

    MotionReport { edges, collision }
}

/// Advance a running round to wall-clock time `now` (seconds)
///
/// Returns `GameEvent::Won` exactly once, on the tick the pig lands fully
/// inside home. Rounds that are idle, paused or already won are untouched.
pub fn tick(round: &mut Round, now: f64) -> Option<GameEvent> {
    if round.status != RoundStatus::Running {
        return None;
    }

    round.time_ticks += 1;

    let bounds = round.config.canvas;
    let report = advance_pig(&mut round.pig, &round.obstacles, bounds);
    if let Some(hit) = report.collision {
        log::debug!(
            "Tick {}: bounced off wall {} segment {}",
            round.time_ticks,
            hit.obstacle,
            hit.segment
        );
    }

    round.elapsed = now - round.start_time;

    if round.home.contains(&round.pig) {
        round.status = RoundStatus::Won;
        log::info!(
            "Round {} won in {:.1}s ({} ticks)",
            round.generation(),
            round.elapsed,
            round.time_ticks
        );
        return Some(GameEvent::Won {
            elapsed_secs: round.elapsed,
        });
    }

    None
}
