//! Collision detection and response against canvas edges and drawn walls
//!
//! Walls are polylines; each consecutive point pair is a straight segment
//! tested against the pig's inset hitbox. Response is a plain mirror
//! reflection about the segment normal.

use glam::Vec2;

use super::geometry::{Rect, segment_intersects_rect};
use super::state::Obstacle;

/// Result of an obstacle scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Index of the obstacle that was hit
    pub obstacle: usize,
    /// Index of the segment's first point within that obstacle
    pub segment: usize,
    /// Unit normal of the hit segment (direction angle + 90°)
    pub normal: Vec2,
}

/// Which canvas edges were hit during a bounds check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHits {
    pub x: bool,
    pub y: bool,
}

impl EdgeHits {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit normal of segment `p1-p2`, taken as its direction angle plus 90°
#[inline]
pub fn segment_normal(p1: Vec2, p2: Vec2) -> Vec2 {
    let dir = p2 - p1;
    let angle = dir.y.atan2(dir.x);
    Vec2::from_angle(angle + std::f32::consts::FRAC_PI_2)
}

/// Keep a square of `size` inside `bounds`, mirroring velocity on each edge hit
///
/// Axes are handled independently so a corner produces two flips in one call.
pub fn bounce_off_bounds(pos: &mut Vec2, vel: &mut Vec2, size: f32, bounds: Vec2) -> EdgeHits {
    let mut hits = EdgeHits::default();

    if pos.x < 0.0 {
        pos.x = 0.0;
        vel.x = -vel.x;
        hits.x = true;
    } else if pos.x + size > bounds.x {
        pos.x = bounds.x - size;
        vel.x = -vel.x;
        hits.x = true;
    }

    if pos.y < 0.0 {
        pos.y = 0.0;
        vel.y = -vel.y;
        hits.y = true;
    } else if pos.y + size > bounds.y {
        pos.y = bounds.y - size;
        vel.y = -vel.y;
        hits.y = true;
    }

    hits
}

/// Find the first wall segment touching `hitbox`
///
/// Obstacles are scanned in insertion order, segments in point order. Walls
/// with fewer than two points and zero-length segments never match.
pub fn first_obstacle_hit(hitbox: &Rect, obstacles: &[Obstacle]) -> Option<CollisionResult> {
    for (obstacle_idx, obstacle) in obstacles.iter().enumerate() {
        for (segment_idx, pair) in obstacle.points().windows(2).enumerate() {
            let (p1, p2) = (pair[0], pair[1]);
            if p1 == p2 {
                continue;
            }
            if segment_intersects_rect(p1, p2, hitbox) {
                return Some(CollisionResult {
                    obstacle: obstacle_idx,
                    segment: segment_idx,
                    normal: segment_normal(p1, p2),
                });
            }
        }
    }
    None
}
