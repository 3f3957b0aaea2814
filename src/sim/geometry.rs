//! Geometry kernel for straight segments and axis-aligned boxes
//!
//! Pure, stateless functions. Every collision check in the simulation is
//! composed from these three tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square with its top-left corner at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// The four boundary edges, clockwise from the top
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = self.min();
        let br = self.max();
        let tr = Vec2::new(br.x, tl.y);
        let bl = Vec2::new(tl.x, br.y);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// True if `other` lies entirely within this rectangle (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.x + other.width <= self.x + self.width
            && other.y >= self.y
            && other.y + other.height <= self.y + self.height
    }
}

/// Inclusive point-in-rectangle test
#[inline]
pub fn point_in_rect(p: Vec2, rect: &Rect) -> bool {
    p.x >= rect.x && p.x <= rect.x + rect.width && p.y >= rect.y && p.y <= rect.y + rect.height
}

/// Check if segments `p1-p2` and `p3-p4` intersect
///
/// Solves for the parameters t (along p1-p2) and u (along p3-p4) with the
/// cross-product determinant. Parallel and collinear segments (determinant
/// exactly zero) are reported as non-intersecting.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let det = d1.perp_dot(d2);
    if det == 0.0 {
        return false;
    }

    let offset = p3 - p1;
    let t = offset.perp_dot(d2) / det;
    let u = offset.perp_dot(d1) / det;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Check if segment `p1-p2` touches a rectangle
///
/// True when either endpoint is inside, or the segment crosses one of the
/// four edges.
pub fn segment_intersects_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    if point_in_rect(p1, rect) || point_in_rect(p2, rect) {
        return true;
    }

    rect.edges()
        .iter()
        .any(|&(a, b)| segments_intersect(p1, p2, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_in_rect_inclusive() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(point_in_rect(Vec2::new(10.0, 10.0), &rect));
        assert!(point_in_rect(Vec2::new(30.0, 30.0), &rect));
        assert!(point_in_rect(Vec2::new(20.0, 15.0), &rect));
        assert!(!point_in_rect(Vec2::new(30.1, 15.0), &rect));
        assert!(!point_in_rect(Vec2::new(15.0, 9.9), &rect));
    }

    #[test]
    fn test_crossing_segments() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        ));
    }

    #[test]
    fn test_segments_touching_at_endpoint() {
        // T-junction: second segment ends on the first
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 0.0),
        ));
    }

    #[test]
    fn test_segments_short_of_each_other() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 1.0),
        ));
    }

    #[test]
    fn test_collinear_overlap_is_not_an_intersection() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        ));
    }

    #[test]
    fn test_segment_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Vec2::new(5.0, 5.0),
            Vec2::new(6.0, 6.0),
            &rect
        ));
    }

    #[test]
    fn test_segment_passing_through_rect() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Vec2::new(-10.0, 10.0),
            Vec2::new(30.0, 10.0),
            &rect
        ));
    }

    #[test]
    fn test_segment_missing_rect() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(!segment_intersects_rect(
            Vec2::new(-10.0, 30.0),
            Vec2::new(30.0, 25.0),
            &rect
        ));
    }

    #[test]
    fn test_rect_inset_and_containment() {
        let outer = Rect::new(0.0, 0.0, 30.0, 30.0);
        let inner = outer.inset(5.0);
        assert_eq!(inner, Rect::new(5.0, 5.0, 20.0, 20.0));
        assert!(outer.contains_rect(&inner));
        assert!(outer.contains_rect(&outer));
        assert!(!inner.contains_rect(&outer));
    }

    proptest! {
        #[test]
        fn prop_segments_intersect_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            dx in -100.0f32..100.0, dy in -100.0f32..100.0,
        ) {
            let (a, b, c, d) = (Vec2::new(ax, ay), Vec2::new(bx, by), Vec2::new(cx, cy), Vec2::new(dx, dy));
            // Reversing a segment's direction must not change the answer
            prop_assert_eq!(segments_intersect(a, b, c, d), segments_intersect(b, a, d, c));
        }

        #[test]
        fn prop_segment_with_endpoint_inside_hits(
            x in 0.0f32..20.0, y in 0.0f32..20.0,
            ox in -500.0f32..500.0, oy in -500.0f32..500.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
            prop_assert!(segment_intersects_rect(Vec2::new(x, y), Vec2::new(ox, oy), &rect));
        }
    }
}
