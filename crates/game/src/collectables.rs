//! Collectable and power-up placement, fairness scheduling, and the magnet.
//!
//! Regular collectables are best-effort: a bounded placement search that
//! silently skips the cycle when every candidate overlaps an obstacle.
//! Power-ups are guaranteed: the same search, but with a fixed center-lane
//! fallback so the fairness promise is never broken by placement.

use glam::Vec3;
use lanerush_physics::{is_safe_spawn_distance, CollisionConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    Collectable, CollectableKind, EntityId, EntityIdGenerator, Lane, Obstacle, PowerUpKind,
};
use crate::random::SeededRandom;
use crate::scene::{VisualKind, WorldHooks};

/// Tuning for collectable spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectableConfig {
    /// Delay between spawn cycles, ms.
    pub spawn_interval_ms: f32,

    /// Placement attempts before a regular spawn is skipped.
    pub max_attempts: u32,

    /// Inflation applied to the preview box when testing obstacle overlap.
    pub preview_margin: f32,

    /// Regular collectables appear this far ahead of the player.
    pub regular_min_ahead: f32,
    pub regular_max_ahead: f32,

    /// Power-ups appear closer, for near-term visibility.
    pub power_min_ahead: f32,
    pub power_max_ahead: f32,

    /// Center-lane fallback distance when every power-up attempt failed.
    pub power_fallback_ahead: f32,

    /// A power-up spawn is forced after this much time without one, ms.
    pub powerup_interval_ms: f32,

    /// ... or after this many regular pickups, whichever comes first.
    pub pickup_threshold: u32,

    /// Magnet pull radius around the player.
    pub magnet_radius: f32,

    /// Magnet pull step per tick.
    pub magnet_pull: f32,

    /// Distance behind the player past which collectables are removed.
    pub despawn_distance: f32,

    /// Horizontal footprint overlap (per axis) that triggers the height lift.
    pub footprint_overlap: f32,

    /// Clearance above a tall obstacle's top for a lifted collectable.
    pub lift_margin: f32,

    /// Default float height of a collectable's center.
    pub item_height: f32,

    /// Aerial coins: spawn cadence while flight is active, ms.
    pub aerial_interval_ms: f32,

    /// Aerial coins: height above the current player position.
    pub aerial_height_offset: f32,

    /// Aerial coins: distance-ahead range.
    pub aerial_min_ahead: f32,
    pub aerial_max_ahead: f32,

    /// Aerial coins: visual spin per tick, radians.
    pub aerial_spin_per_tick: f32,
}

impl Default for CollectableConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1800.0,
            max_attempts: 10,
            preview_margin: 0.5,
            regular_min_ahead: 30.0,
            regular_max_ahead: 70.0,
            power_min_ahead: 18.0,
            power_max_ahead: 30.0,
            power_fallback_ahead: 24.0,
            powerup_interval_ms: 25_000.0,
            pickup_threshold: 8,
            magnet_radius: 6.0,
            magnet_pull: 0.45,
            despawn_distance: 12.0,
            footprint_overlap: 1.0,
            lift_margin: 0.2,
            item_height: 0.8,
            aerial_interval_ms: 700.0,
            aerial_height_offset: 1.2,
            aerial_min_ahead: 12.0,
            aerial_max_ahead: 24.0,
            aerial_spin_per_tick: 0.15,
        }
    }
}

/// Guarantees a power-up within a bounded time or pickup count, independent
/// of randomness. Both conditions reset atomically when a power-up spawns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FairnessCounter {
    since_power_ms: f32,
    regular_pickups: u32,
}

impl FairnessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the wall-clock side by measured elapsed time.
    pub fn advance(&mut self, dt_ms: f32) {
        self.since_power_ms += dt_ms;
    }

    /// Count one collected regular pickup.
    pub fn record_regular_pickup(&mut self) {
        self.regular_pickups += 1;
    }

    /// Whether the next collectable spawn must be a power-up.
    pub fn should_spawn_power_up(&self, interval_ms: f32, threshold: u32) -> bool {
        self.since_power_ms >= interval_ms || self.regular_pickups >= threshold
    }

    /// Reset both bounds. Called exactly when a power-up is spawned.
    pub fn mark_power_up_spawned(&mut self) {
        self.since_power_ms = 0.0;
        self.regular_pickups = 0;
    }

    pub fn regular_pickups(&self) -> u32 {
        self.regular_pickups
    }
}

/// Runtime collectable manager.
#[derive(Debug)]
pub struct CollectableSpawner {
    config: CollectableConfig,
    collectables: Vec<Collectable>,
    fairness: FairnessCounter,
    next_spawn_ms: f32,
    next_aerial_ms: f32,
}

impl CollectableSpawner {
    pub fn new(config: CollectableConfig) -> Self {
        let initial_delay = config.spawn_interval_ms;
        let aerial_delay = config.aerial_interval_ms;
        Self {
            config,
            collectables: Vec::new(),
            fairness: FairnessCounter::new(),
            next_spawn_ms: initial_delay,
            next_aerial_ms: aerial_delay,
        }
    }

    pub fn collectables(&self) -> &[Collectable] {
        &self.collectables
    }

    pub fn fairness(&self) -> &FairnessCounter {
        &self.fairness
    }

    /// Count a successful collection. Regular kinds feed the fairness
    /// counter; power-up pickups don't (spawning one already reset it).
    pub fn record_pickup(&mut self, kind: CollectableKind) {
        if kind.is_regular() {
            self.fairness.record_regular_pickup();
        }
    }

    /// Scroll all collectables toward the player and spin the aerial ones.
    pub fn advance(&mut self, speed: f32) {
        for item in &mut self.collectables {
            item.position.z += speed;
            if item.kind == CollectableKind::AerialCoin {
                item.rotation += self.config.aerial_spin_per_tick;
            }
        }
    }

    /// Run one tick of spawn scheduling.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt_ms: f32,
        speed: f32,
        player_position: Vec3,
        obstacles: &[Obstacle],
        flight_active: bool,
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        self.fairness.advance(dt_ms);

        self.next_spawn_ms -= dt_ms;
        if self.next_spawn_ms <= 0.0 {
            self.next_spawn_ms = self.config.spawn_interval_ms;
            let forced = self.fairness.should_spawn_power_up(
                self.config.powerup_interval_ms,
                self.config.pickup_threshold,
            );
            if forced {
                self.spawn_power_up(
                    speed,
                    player_position,
                    obstacles,
                    lane_width,
                    lane_count,
                    collision,
                    rng,
                    ids,
                    hooks,
                );
            } else {
                self.spawn_regular(
                    speed,
                    player_position,
                    obstacles,
                    lane_width,
                    lane_count,
                    collision,
                    rng,
                    ids,
                    hooks,
                );
            }
        }

        if flight_active {
            self.next_aerial_ms -= dt_ms;
            if self.next_aerial_ms <= 0.0 {
                self.next_aerial_ms = self.config.aerial_interval_ms;
                self.spawn_aerial(player_position, lane_width, lane_count, rng, ids, hooks);
            }
        } else {
            self.next_aerial_ms = self.config.aerial_interval_ms;
        }
    }

    /// Best-effort regular spawn: bounded search, silent skip on failure.
    #[allow(clippy::too_many_arguments)]
    fn spawn_regular(
        &mut self,
        speed: f32,
        player_position: Vec3,
        obstacles: &[Obstacle],
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        let kind = *rng
            .pick(&CollectableKind::REGULAR)
            .unwrap_or(&CollectableKind::Coin);
        let placed = self.try_place(
            kind,
            self.config.regular_min_ahead,
            self.config.regular_max_ahead,
            speed,
            player_position,
            obstacles,
            lane_width,
            lane_count,
            collision,
            rng,
        );
        match placed {
            Some((lane, position)) => {
                self.push_item(kind, lane, position, obstacles, ids, hooks);
            }
            None => debug!(?kind, "collectable placement exhausted, skipping cycle"),
        }
    }

    /// Guaranteed power-up spawn: same search, fixed fallback on failure.
    #[allow(clippy::too_many_arguments)]
    fn spawn_power_up(
        &mut self,
        speed: f32,
        player_position: Vec3,
        obstacles: &[Obstacle],
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        let power = *rng.pick(&PowerUpKind::ALL).unwrap_or(&PowerUpKind::Shield);
        let kind = CollectableKind::Power(power);
        let (lane, position) = self
            .try_place(
                kind,
                self.config.power_min_ahead,
                self.config.power_max_ahead,
                speed,
                player_position,
                obstacles,
                lane_width,
                lane_count,
                collision,
                rng,
            )
            .unwrap_or_else(|| {
                // Fairness beats placement elegance: center lane, fixed spot.
                let lane = Lane(lane_count / 2);
                let position = Vec3::new(
                    lane.center_x(lane_width, lane_count),
                    self.config.item_height,
                    -self.config.power_fallback_ahead,
                );
                debug!(?power, "power-up placement exhausted, using fallback position");
                (lane, position)
            });

        self.push_item(kind, lane, position, obstacles, ids, hooks);
        self.fairness.mark_power_up_spawned();
    }

    /// Aerial coin above the player's current height. Only called while the
    /// flight power-up is active.
    fn spawn_aerial(
        &mut self,
        player_position: Vec3,
        lane_width: f32,
        lane_count: u8,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        let lane = rng.lane(lane_count);
        let position = Vec3::new(
            lane.center_x(lane_width, lane_count),
            player_position.y + self.config.aerial_height_offset,
            -rng.next_range(self.config.aerial_min_ahead, self.config.aerial_max_ahead),
        );
        self.push_item(CollectableKind::AerialCoin, lane, position, &[], ids, hooks);
    }

    /// Bounded random placement search. Returns the first candidate whose
    /// inflated preview box clears every obstacle and which is far enough
    /// from the player.
    #[allow(clippy::too_many_arguments)]
    fn try_place(
        &self,
        kind: CollectableKind,
        min_ahead: f32,
        max_ahead: f32,
        speed: f32,
        player_position: Vec3,
        obstacles: &[Obstacle],
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
    ) -> Option<(Lane, Vec3)> {
        for _ in 0..self.config.max_attempts {
            let lane = rng.lane(lane_count);
            let position = Vec3::new(
                lane.center_x(lane_width, lane_count),
                self.config.item_height,
                -rng.next_range(min_ahead, max_ahead),
            );
            if !is_safe_spawn_distance(player_position, position, speed, collision) {
                continue;
            }
            let preview = lanerush_physics::Aabb::from_center_half_extents(
                position,
                kind.half_extents(),
            )
            .expanded_by(self.config.preview_margin);
            if obstacles.iter().any(|o| preview.intersects(&o.aabb())) {
                continue;
            }
            return Some((lane, position));
        }
        None
    }

    /// Finalize a spawn: tall-obstacle height lift, visual creation,
    /// readiness gating.
    fn push_item(
        &mut self,
        kind: CollectableKind,
        lane: Lane,
        mut position: Vec3,
        obstacles: &[Obstacle],
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        // Cosmetic fix: a collectable sitting on a tall obstacle's footprint
        // floats above it instead of clipping through.
        for obstacle in obstacles {
            if obstacle.kind.is_low() {
                continue;
            }
            let dx = (position.x - obstacle.position.x).abs();
            let dz = (position.z - obstacle.position.z).abs();
            if dx <= self.config.footprint_overlap && dz <= self.config.footprint_overlap {
                let lifted =
                    obstacle.kind.height() + self.config.lift_margin + kind.half_extents().y;
                position.y = position.y.max(lifted);
            }
        }

        let id = ids.next();
        let visual = hooks.spawn_visual(VisualKind::Collectable(kind), position);
        let collision_enabled = hooks.visual_ready(visual);
        debug!(id = id.0, ?kind, lane = lane.0, "collectable spawned");

        self.collectables.push(Collectable {
            id,
            kind,
            lane,
            position,
            rotation: 0.0,
            collision_enabled,
            visual,
        });
    }

    /// Direct insertion for scenario tests.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, item: Collectable) {
        self.collectables.push(item);
    }

    /// Pull every collectable within the magnet radius one linear step
    /// toward the player. Runs independently of collision checks; the pull
    /// alone can bring an item into pickup range on a later tick.
    pub fn apply_magnet(&mut self, player_position: Vec3) {
        let radius = self.config.magnet_radius;
        let pull = self.config.magnet_pull;
        for item in &mut self.collectables {
            let to_player = player_position - item.position;
            let distance = to_player.length();
            if distance == 0.0 || distance > radius {
                continue;
            }
            if distance <= pull {
                item.position = player_position;
            } else {
                item.position += to_player / distance * pull;
            }
        }
    }

    /// Remove a collected item and release its visual.
    pub fn collect(&mut self, id: EntityId, hooks: &mut dyn WorldHooks) -> Option<CollectableKind> {
        let index = self.collectables.iter().position(|c| c.id == id)?;
        let item = self.collectables.swap_remove(index);
        hooks.remove_visual(item.visual);
        Some(item.kind)
    }

    /// Remove every aerial coin outright. Called when flight ends.
    pub fn purge_aerial(&mut self, hooks: &mut dyn WorldHooks) {
        let items = std::mem::take(&mut self.collectables);
        for item in items {
            if item.kind == CollectableKind::AerialCoin {
                hooks.remove_visual(item.visual);
            } else {
                self.collectables.push(item);
            }
        }
    }

    /// Remove collectables past the despawn threshold.
    pub fn despawn_passed(&mut self, hooks: &mut dyn WorldHooks) {
        let threshold = self.config.despawn_distance;
        let items = std::mem::take(&mut self.collectables);
        for item in items {
            if item.position.z > threshold {
                hooks.remove_visual(item.visual);
            } else {
                self.collectables.push(item);
            }
        }
    }

    /// Re-check readiness of collision-disabled collectables.
    pub fn upgrade_readiness(&mut self, hooks: &dyn WorldHooks) {
        for item in &mut self.collectables {
            if !item.collision_enabled && hooks.visual_ready(item.visual) {
                item.collision_enabled = true;
            }
        }
    }

    /// Clear everything and release all visuals. Safe mid-flight.
    pub fn reset(&mut self, hooks: &mut dyn WorldHooks) {
        for item in self.collectables.drain(..) {
            hooks.remove_visual(item.visual);
        }
        self.fairness = FairnessCounter::new();
        self.next_spawn_ms = self.config.spawn_interval_ms;
        self.next_aerial_ms = self.config.aerial_interval_ms;
    }
}
