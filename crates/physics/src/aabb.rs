//! Axis-aligned bounding boxes.
//!
//! All gameplay collision in the runner is expressed through `Aabb` queries:
//! lane geometry is axis-aligned by construction, so boxes are sufficient and
//! keep the per-tick collision pass trivially cheap.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box defined by its minimum and maximum corners.
///
/// Intersection uses closed-interval semantics: two boxes touching at a
/// boundary face count as intersecting. A degenerate box (any `min` component
/// greater than its `max`) never intersects anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from explicit corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from a center point and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create a box from a center point and half-extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// The volume spanned by a box of the given half-extents moving between
    /// two sampled center positions. Used for swept collision tests.
    pub fn from_sweep(from_center: Vec3, to_center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: from_center.min(to_center) - half_extents,
            max: from_center.max(to_center) + half_extents,
        }
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box in each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half-extents of the box in each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Whether any axis is inverted (min past max).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Closed-interval overlap test. Degenerate boxes never intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The box grown by `amount` on every face.
    pub fn expanded_by(&self, amount: f32) -> Self {
        let pad = Vec3::splat(amount);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// The smallest box containing both inputs.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_size(center, Vec3::ONE)
    }

    #[test]
    fn overlap_is_symmetric_and_reflexive() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(0.4, 0.0, 0.0));
        assert!(a.intersects(&a));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_faces_count_as_intersecting() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.01, 0.0, 0.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn degenerate_box_never_intersects() {
        let bad = Aabb::new(Vec3::ONE, Vec3::ZERO);
        let good = unit_box_at(Vec3::ZERO);
        assert!(!bad.intersects(&good));
        assert!(!good.intersects(&bad));
        assert!(!bad.intersects(&bad));
    }

    #[test]
    fn sweep_covers_both_endpoints_and_path() {
        let half = Vec3::splat(0.5);
        let swept = Aabb::from_sweep(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), half);
        assert!(swept.intersects(&unit_box_at(Vec3::ZERO)));
        assert!(swept.intersects(&unit_box_at(Vec3::new(0.0, 0.0, 2.0))));
        assert!(swept.intersects(&unit_box_at(Vec3::new(0.0, 0.0, 4.0))));
        assert!(!swept.intersects(&unit_box_at(Vec3::new(0.0, 0.0, 6.0))));
    }

    #[test]
    fn expand_and_translate() {
        let a = unit_box_at(Vec3::ZERO).expanded_by(0.5);
        assert_eq!(a.size(), Vec3::splat(2.0));
        let moved = a.translated(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(moved.center(), Vec3::new(0.0, 0.0, 3.0));
    }
}
