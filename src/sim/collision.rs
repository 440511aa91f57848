//! Axis-aligned box collision
//!
//! One overlap predicate serves every check: player vs boss, projectile vs
//! actor, and projectile vs wall. No rotation and no swept volumes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self, other)
    }

    /// Whether this box spans the x coordinate range of `other`
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x && self.max().x > other.min.x
    }
}

/// AABB overlap predicate
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &boxed(5.0, 5.0, 10.0, 10.0)));
        assert!(overlaps(&a, &boxed(2.0, 2.0, 2.0, 2.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &boxed(10.0, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &boxed(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = boxed(0.0, 0.0, 10.0, 4.0);
        let b = boxed(8.0, -3.0, 4.0, 4.0);
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_overlaps_x_ignores_height() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps_x(&boxed(5.0, 500.0, 10.0, 1.0)));
        assert!(!a.overlaps_x(&boxed(20.0, 0.0, 10.0, 10.0)));
    }
}
