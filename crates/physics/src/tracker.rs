//! Per-entity last-known-position cache.
//!
//! The swept collision test needs the movement vector between the previous
//! and current tick. The tracker stores the last recorded position per entity
//! id; the session records the player every tick and reads it back on the
//! next one.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec3;

/// Last-recorded positions keyed by entity id.
///
/// Only the player is tracked today, but the cache is generic over the id
/// type so any entity can opt in.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker<K: Copy + Eq + Hash> {
    positions: HashMap<K, Vec3>,
}

impl<K: Copy + Eq + Hash> PositionTracker<K> {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Record the current position for `id`, replacing any previous entry.
    pub fn record(&mut self, id: K, position: Vec3) {
        self.positions.insert(id, position);
    }

    /// The last recorded position for `id`, if any.
    pub fn last(&self, id: K) -> Option<Vec3> {
        self.positions.get(&id).copied()
    }

    /// Drop the entry for a destroyed entity.
    pub fn forget(&mut self, id: K) {
        self.positions.remove(&id);
    }

    /// Drop every entry. Called on game reset.
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read_back() {
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.last(1u32), None);
        tracker.record(1u32, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(tracker.last(1u32), Some(Vec3::new(1.0, 2.0, 3.0)));
        tracker.record(1u32, Vec3::ZERO);
        assert_eq!(tracker.last(1u32), Some(Vec3::ZERO));
    }

    #[test]
    fn forget_and_clear() {
        let mut tracker = PositionTracker::new();
        tracker.record(1u32, Vec3::ONE);
        tracker.record(2u32, Vec3::ZERO);
        tracker.forget(1u32);
        assert_eq!(tracker.last(1u32), None);
        assert_eq!(tracker.last(2u32), Some(Vec3::ZERO));
        tracker.clear();
        assert_eq!(tracker.last(2u32), None);
    }
}
