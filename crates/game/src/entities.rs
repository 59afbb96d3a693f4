//! Entity types for the runner simulation.
//!
//! Entities live in `Vec`s with ordered iteration; ids are handed out by a
//! monotonic generator and never reused within a session.

use glam::Vec3;
use lanerush_physics::Aabb;
use serde::{Deserialize, Serialize};

use crate::scene::VisualHandle;

/// Unique identifier for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids, starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIdGenerator {
    next_id: u32,
}

impl EntityIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A discrete lane index. Lane 0 is the leftmost; the count is configured on
/// the session (default 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane(pub u8);

impl Lane {
    /// World-space x of this lane's center, with lanes laid out symmetrically
    /// around x = 0.
    pub fn center_x(self, lane_width: f32, lane_count: u8) -> f32 {
        (f32::from(self.0) - f32::from(lane_count - 1) * 0.5) * lane_width
    }
}

/// Obstacle varieties. `half_extents` drives both collision and footprint;
/// low kinds never trigger collectable height adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Full-height wall spanning most of a lane. Must be dodged.
    Barrier,
    /// Low bar the player can jump over.
    Hurdle,
    /// Ground spikes, low profile.
    Spike,
    /// Chest-height box, jumpable with effort.
    Crate,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Barrier,
        ObstacleKind::Hurdle,
        ObstacleKind::Spike,
        ObstacleKind::Crate,
    ];

    pub fn half_extents(self) -> Vec3 {
        match self {
            ObstacleKind::Barrier => Vec3::new(0.8, 1.2, 0.3),
            ObstacleKind::Hurdle => Vec3::new(0.7, 0.3, 0.15),
            ObstacleKind::Spike => Vec3::new(0.6, 0.25, 0.25),
            ObstacleKind::Crate => Vec3::new(0.6, 0.6, 0.6),
        }
    }

    /// Total height above the ground plane.
    pub fn height(self) -> f32 {
        self.half_extents().y * 2.0
    }

    /// Flat kinds don't force collectables floating above them.
    pub fn is_low(self) -> bool {
        matches!(self, ObstacleKind::Hurdle | ObstacleKind::Spike)
    }
}

/// Time-limited power-up varieties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Invincibility: obstacle collisions have no consequence.
    Shield,
    /// Lifts the player to flight height, ignoring gravity.
    Flight,
    /// 1.5x scroll speed plus magnet pull on collectables.
    Boost,
    /// Grants a second jump while airborne.
    DoubleJump,
    /// Marks a safe lane ahead and guides the player into it.
    SafeLane,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Shield,
        PowerUpKind::Flight,
        PowerUpKind::Boost,
        PowerUpKind::DoubleJump,
        PowerUpKind::SafeLane,
    ];
}

/// Collectable varieties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectableKind {
    Coin,
    Gem,
    /// Grants the wrapped power-up on pickup.
    Power(PowerUpKind),
    /// Spawned only during flight; collectable only while flight is active.
    AerialCoin,
}

impl CollectableKind {
    /// Kinds eligible for the regular spawn roll.
    pub const REGULAR: [CollectableKind; 2] = [CollectableKind::Coin, CollectableKind::Gem];

    /// Regular pickups count toward the power-up fairness counter.
    pub fn is_regular(self) -> bool {
        matches!(self, CollectableKind::Coin | CollectableKind::Gem)
    }

    pub fn half_extents(self) -> Vec3 {
        match self {
            CollectableKind::Coin | CollectableKind::AerialCoin => Vec3::splat(0.25),
            CollectableKind::Gem => Vec3::splat(0.3),
            CollectableKind::Power(_) => Vec3::splat(0.4),
        }
    }

    pub fn score_value(self) -> u32 {
        match self {
            CollectableKind::Coin => 10,
            CollectableKind::Gem => 25,
            CollectableKind::AerialCoin => 15,
            CollectableKind::Power(_) => 0,
        }
    }
}

/// A spawned obstacle.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub lane: Lane,
    /// Center position. z is negative ahead of the player and increases as
    /// the world scrolls.
    pub position: Vec3,
    /// False until the visual representation passes its readiness check; an
    /// entity must never collide while this is false.
    pub collision_enabled: bool,
    pub visual: VisualHandle,
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.kind.half_extents())
    }
}

/// A spawned collectable.
#[derive(Debug, Clone)]
pub struct Collectable {
    pub id: EntityId,
    pub kind: CollectableKind,
    pub lane: Lane,
    pub position: Vec3,
    /// Visual spin, radians. Only aerial coins rotate.
    pub rotation: f32,
    pub collision_enabled: bool,
    pub visual: VisualHandle,
}

impl Collectable {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.kind.half_extents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generator_is_monotonic() {
        let mut ids = EntityIdGenerator::new();
        let a = ids.next();
        let b = ids.next();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }

    #[test]
    fn lane_centers_are_symmetric() {
        let width = 2.0;
        assert_eq!(Lane(0).center_x(width, 3), -2.0);
        assert_eq!(Lane(1).center_x(width, 3), 0.0);
        assert_eq!(Lane(2).center_x(width, 3), 2.0);
    }

    #[test]
    fn low_obstacles_are_flat() {
        assert!(ObstacleKind::Hurdle.is_low());
        assert!(ObstacleKind::Spike.is_low());
        assert!(!ObstacleKind::Barrier.is_low());
        assert!(!ObstacleKind::Crate.is_low());
    }

    #[test]
    fn power_pickups_are_not_regular() {
        assert!(CollectableKind::Coin.is_regular());
        assert!(CollectableKind::Gem.is_regular());
        assert!(!CollectableKind::Power(PowerUpKind::Shield).is_regular());
        assert!(!CollectableKind::AerialCoin.is_regular());
    }
}
