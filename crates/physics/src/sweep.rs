//! Collision queries for the runner: standard, swept and predictive overlap,
//! pickup-radius expansion, and safe-spawn distance.
//!
//! Everything here is a pure function of its inputs. The world scrolls toward
//! the player along +z, so "ahead of the player" is negative z and the
//! player's apparent motion relative to an obstacle over one tick is −z. The
//! caller supplies the previous player center already expressed in that
//! relative frame (last tracked position shifted by the per-tick scroll).
//!
//! A plain per-frame AABB test misses fast relative motion: at high game
//! speed an obstacle can cross the whole player box between two samples
//! (tunneling). The swept test covers the volume between the two sampled
//! centers, and at very high speed an extra predicted box is tested one
//! look-ahead step further along the travel axis.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;

/// Tuning constants for the collision queries.
///
/// The predictive gate and look-ahead factors are empirically tuned gameplay
/// values, kept configurable rather than derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Lateral displacement per tick above which the frame counts as a lane
    /// change.
    pub lane_change_threshold: f32,

    /// Fraction by which the swept volume's lateral half-extent shrinks
    /// during a lane change. The player is visually still mostly in its
    /// source lane mid-transition, so the full diagonal sweep over-reports.
    pub lane_change_shrink: f32,

    /// Game speed above which pickup-radius expansion starts growing.
    pub high_speed_threshold: f32,

    /// Multiplier on `high_speed_threshold` above which the predicted box is
    /// also tested.
    pub predictive_gate: f32,

    /// How far ahead (in units of current speed) the predicted box is
    /// translated along the travel axis.
    pub predictive_lookahead: f32,

    /// Base pickup expansion radius applied at any speed.
    pub pickup_base_radius: f32,

    /// Extra pickup expansion per unit of speed above the threshold.
    pub pickup_speed_factor: f32,

    /// Extra pickup expansion while a magnet effect is active.
    pub pickup_magnet_bonus: f32,

    /// Minimum spawn distance from the player at zero speed.
    pub safe_spawn_base: f32,

    /// Additional required spawn distance per unit of speed.
    pub safe_spawn_per_speed: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            lane_change_threshold: 0.05,
            lane_change_shrink: 0.4,
            high_speed_threshold: 0.15,
            predictive_gate: 1.3,
            predictive_lookahead: 1.5,
            pickup_base_radius: 0.3,
            pickup_speed_factor: 2.0,
            pickup_magnet_bonus: 1.2,
            safe_spawn_base: 6.0,
            safe_spawn_per_speed: 20.0,
        }
    }
}

/// Plain AABB overlap.
#[inline]
pub fn standard_hit(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Swept overlap between the moving player box and a static target box.
///
/// Three stages, any of which reports a hit:
/// 1. standard overlap of the current box (cheap path),
/// 2. overlap of the volume swept from `previous_center` to the current
///    center, with the lateral extent shrunk when the frame is a lane change,
/// 3. at very high speed, overlap of a predicted box translated forward by
///    `speed * predictive_lookahead` along the travel axis.
pub fn swept_hit(
    current: &Aabb,
    previous_center: Vec3,
    target: &Aabb,
    speed: f32,
    config: &CollisionConfig,
) -> bool {
    if standard_hit(current, target) {
        return true;
    }

    let mut half_extents = current.half_extents();
    let lateral = (current.center().x - previous_center.x).abs();
    if lateral > config.lane_change_threshold {
        half_extents.x *= 1.0 - config.lane_change_shrink;
    }

    let swept = Aabb::from_sweep(previous_center, current.center(), half_extents);
    if swept.intersects(target) {
        return true;
    }

    if speed > config.predictive_gate * config.high_speed_threshold {
        let predicted =
            current.translated(Vec3::new(0.0, 0.0, -speed * config.predictive_lookahead));
        if predicted.intersects(target) {
            return true;
        }
    }

    false
}

/// Expansion radius applied to the player box for pickup tests.
///
/// Additive: base, plus a term growing with speed above the threshold, plus a
/// flat bonus while a magnet effect is active.
pub fn pickup_expansion(speed: f32, has_magnet: bool, config: &CollisionConfig) -> f32 {
    let speed_term = (speed - config.high_speed_threshold).max(0.0) * config.pickup_speed_factor;
    let magnet_term = if has_magnet {
        config.pickup_magnet_bonus
    } else {
        0.0
    };
    config.pickup_base_radius + speed_term + magnet_term
}

/// Whether the player collects an item: standard overlap, or overlap against
/// the player box grown by the speed/magnet-dependent pickup radius.
pub fn collectable_hit(
    player: &Aabb,
    item: &Aabb,
    speed: f32,
    has_magnet: bool,
    config: &CollisionConfig,
) -> bool {
    if standard_hit(player, item) {
        return true;
    }
    let expansion = pickup_expansion(speed, has_magnet, config);
    player.expanded_by(expansion).intersects(item)
}

/// Whether `candidate` is far enough from the player for a fresh spawn.
/// The required distance grows with speed so faster runs never spawn
/// entities on top of the player.
pub fn is_safe_spawn_distance(
    player_position: Vec3,
    candidate: Vec3,
    speed: f32,
    config: &CollisionConfig,
) -> bool {
    let required = config.safe_spawn_base + speed * config.safe_spawn_per_speed;
    player_position.distance(candidate) >= required
}
