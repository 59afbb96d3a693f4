//! Lanerush Physics
//!
//! Collision geometry for the endless-runner simulation core. The world is
//! lane-based and axis-aligned, so every query reduces to AABB tests:
//!
//! - **Aabb**: the bounding-box value type
//! - **Sweep queries**: standard, swept-volume and predictive overlap plus
//!   pickup-radius expansion and safe-spawn distance
//! - **PositionTracker**: last-known positions for reconstructing per-tick
//!   movement vectors
//!
//! Everything is pure and synchronous; queries cannot fail. Malformed
//! (inverted) boxes degrade to "never intersects".

pub mod aabb;
pub mod sweep;
pub mod tracker;

pub use aabb::Aabb;
pub use sweep::{
    collectable_hit, is_safe_spawn_distance, pickup_expansion, standard_hit, swept_hit,
    CollisionConfig,
};
pub use tracker::PositionTracker;
