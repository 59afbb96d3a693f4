//! Procedural obstacle placement and lifecycle.
//!
//! The spawner is driven once per tick through `update(dt_ms, ..)`; all
//! scheduling is countdown-based, so a game reset simply clears state and
//! there are no pending callbacks to cancel.
//!
//! Two strategies share the interface:
//!
//! - **Adaptive** (primary): randomized spawn intervals, shortened as game
//!   speed rises so spatial density stays roughly constant, gated on a
//!   minimum scrolled distance since the previous spawn.
//! - **Pattern**: a pre-generated sequence of `(offset, kind, lane)` entries
//!   with randomized spacing and density, played back against scrolled
//!   distance and regenerated when exhausted.
//!
//! Obstacle type never immediately repeats. Lane choice is uniform with no
//! de-dup against the previous obstacle's lane; that is observed gameplay
//! behavior, kept as-is.

use glam::Vec3;
use lanerush_physics::{is_safe_spawn_distance, CollisionConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{EntityIdGenerator, Lane, Obstacle, ObstacleKind};
use crate::random::SeededRandom;
use crate::scene::{VisualKind, WorldHooks};

/// Tuning for obstacle spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Nominal minimum delay between spawns at zero speed, ms.
    pub min_interval_ms: f32,

    /// Nominal maximum delay between spawns at zero speed, ms.
    pub max_interval_ms: f32,

    /// Absolute floor the adapted minimum never drops below, ms.
    pub interval_floor_ms: f32,

    /// The adapted maximum always stays at least this far above the adapted
    /// minimum, ms.
    pub min_max_offset_ms: f32,

    /// Interval reduction per unit of game speed, ms.
    pub speed_sensitivity: f32,

    /// Minimum scrolled distance between consecutive spawn points.
    pub min_spacing: f32,

    /// Re-check delay when a due spawn is blocked by the spacing gate, ms.
    pub retry_delay_ms: f32,

    /// How far ahead of the player new obstacles appear.
    pub spawn_ahead: f32,

    /// Distance behind the player past which obstacles are removed.
    pub despawn_distance: f32,

    /// Pattern mode: spacing range between consecutive entries.
    pub pattern_min_spacing: f32,
    pub pattern_max_spacing: f32,

    /// Pattern mode: probability an entry slot is filled; misses become
    /// extra gaps.
    pub pattern_density: f32,

    /// Pattern mode: entries generated per sequence.
    pub pattern_length: usize,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1400.0,
            max_interval_ms: 2600.0,
            interval_floor_ms: 500.0,
            min_max_offset_ms: 400.0,
            speed_sensitivity: 3000.0,
            min_spacing: 8.0,
            retry_delay_ms: 180.0,
            spawn_ahead: 60.0,
            despawn_distance: 12.0,
            pattern_min_spacing: 6.0,
            pattern_max_spacing: 14.0,
            pattern_density: 0.7,
            pattern_length: 32,
        }
    }
}

/// Which placement policy the spawner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnStrategy {
    Adaptive,
    Pattern,
}

#[derive(Debug, Clone)]
struct PatternEntry {
    /// Scrolled distance from the start of the sequence.
    offset: f32,
    kind: ObstacleKind,
    lane: Lane,
}

/// Runtime obstacle manager: spawning, advancing, despawning.
#[derive(Debug)]
pub struct ObstacleSpawner {
    config: ObstacleConfig,
    strategy: SpawnStrategy,
    obstacles: Vec<Obstacle>,
    last_kind: Option<ObstacleKind>,
    /// Total distance the world has scrolled this session.
    scrolled: f32,
    /// Scroll position of the most recent spawn.
    last_spawn_scroll: Option<f32>,
    /// Countdown to the next adaptive spawn attempt, ms.
    next_spawn_ms: f32,
    pattern: Vec<PatternEntry>,
    pattern_cursor: usize,
    /// Scroll position the current pattern sequence is anchored to.
    pattern_origin: f32,
}

impl ObstacleSpawner {
    pub fn new(config: ObstacleConfig, strategy: SpawnStrategy) -> Self {
        let initial_delay = config.min_interval_ms;
        Self {
            config,
            strategy,
            obstacles: Vec::new(),
            last_kind: None,
            scrolled: 0.0,
            last_spawn_scroll: None,
            next_spawn_ms: initial_delay,
            pattern: Vec::new(),
            pattern_cursor: 0,
            pattern_origin: 0.0,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn scrolled(&self) -> f32 {
        self.scrolled
    }

    /// Scroll all obstacles toward the player by `speed`.
    pub fn advance(&mut self, speed: f32) {
        self.scrolled += speed;
        for obstacle in &mut self.obstacles {
            obstacle.position.z += speed;
        }
    }

    /// Run one tick of spawn scheduling.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt_ms: f32,
        speed: f32,
        player_position: Vec3,
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        match self.strategy {
            SpawnStrategy::Adaptive => {
                self.next_spawn_ms -= dt_ms;
                if self.next_spawn_ms > 0.0 {
                    return;
                }
                if !self.spacing_satisfied() {
                    // Poll again shortly rather than skipping the cycle.
                    self.next_spawn_ms = self.config.retry_delay_ms;
                    return;
                }
                self.spawn_one(
                    None,
                    None,
                    speed,
                    player_position,
                    lane_width,
                    lane_count,
                    collision,
                    rng,
                    ids,
                    hooks,
                );
                self.next_spawn_ms = self.roll_interval(speed, rng);
            }
            SpawnStrategy::Pattern => {
                if self.pattern_cursor >= self.pattern.len() {
                    self.regenerate_pattern(lane_count, rng);
                }
                while self.pattern_cursor < self.pattern.len() {
                    let entry = self.pattern[self.pattern_cursor].clone();
                    if self.scrolled - self.pattern_origin < entry.offset {
                        break;
                    }
                    self.pattern_cursor += 1;
                    self.spawn_one(
                        Some(entry.kind),
                        Some(entry.lane),
                        speed,
                        player_position,
                        lane_width,
                        lane_count,
                        collision,
                        rng,
                        ids,
                        hooks,
                    );
                }
            }
        }
    }

    /// Remove obstacles past the despawn threshold and release their visuals.
    pub fn despawn_passed(&mut self, hooks: &mut dyn WorldHooks) {
        let threshold = self.config.despawn_distance;
        let obstacles = std::mem::take(&mut self.obstacles);
        for obstacle in obstacles {
            if obstacle.position.z > threshold {
                debug!(id = obstacle.id.0, kind = ?obstacle.kind, "obstacle despawned");
                hooks.remove_visual(obstacle.visual);
            } else {
                self.obstacles.push(obstacle);
            }
        }
    }

    /// Re-check readiness of collision-disabled obstacles and upgrade any
    /// whose visual has since become ready.
    pub fn upgrade_readiness(&mut self, hooks: &dyn WorldHooks) {
        for obstacle in &mut self.obstacles {
            if !obstacle.collision_enabled && hooks.visual_ready(obstacle.visual) {
                obstacle.collision_enabled = true;
            }
        }
    }

    /// Clear everything and release all visuals. Safe mid-flight.
    pub fn reset(&mut self, hooks: &mut dyn WorldHooks) {
        for obstacle in self.obstacles.drain(..) {
            hooks.remove_visual(obstacle.visual);
        }
        self.last_kind = None;
        self.scrolled = 0.0;
        self.last_spawn_scroll = None;
        self.next_spawn_ms = self.config.min_interval_ms;
        self.pattern.clear();
        self.pattern_cursor = 0;
        self.pattern_origin = 0.0;
    }

    /// Direct insertion for scenario tests.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    fn spacing_satisfied(&self) -> bool {
        match self.last_spawn_scroll {
            None => true,
            Some(at) => self.scrolled - at >= self.config.min_spacing,
        }
    }

    /// Speed-adapted randomized interval. Faster scroll means shorter
    /// wall-clock intervals, clamped to a floor, with max kept above min.
    fn roll_interval(&self, speed: f32, rng: &mut SeededRandom) -> f32 {
        let reduction = speed * self.config.speed_sensitivity;
        let min = (self.config.min_interval_ms - reduction).max(self.config.interval_floor_ms);
        let max = (self.config.max_interval_ms - reduction).max(min + self.config.min_max_offset_ms);
        rng.next_range(min, max)
    }

    fn pick_kind(&self, rng: &mut SeededRandom) -> ObstacleKind {
        let candidates: Vec<ObstacleKind> = ObstacleKind::ALL
            .into_iter()
            .filter(|&kind| Some(kind) != self.last_kind)
            .collect();
        *rng.pick(&candidates).unwrap_or(&ObstacleKind::Barrier)
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_one(
        &mut self,
        kind: Option<ObstacleKind>,
        lane: Option<Lane>,
        speed: f32,
        player_position: Vec3,
        lane_width: f32,
        lane_count: u8,
        collision: &CollisionConfig,
        rng: &mut SeededRandom,
        ids: &mut EntityIdGenerator,
        hooks: &mut dyn WorldHooks,
    ) {
        let kind = kind.unwrap_or_else(|| self.pick_kind(rng));
        let lane = lane.unwrap_or_else(|| rng.lane(lane_count));
        let position = Vec3::new(
            lane.center_x(lane_width, lane_count),
            kind.half_extents().y,
            -self.config.spawn_ahead,
        );

        if !is_safe_spawn_distance(player_position, position, speed, collision) {
            // The spawn point would land on top of the player; skip this
            // cycle and let the scheduler try again.
            return;
        }

        let id = ids.next();
        let visual = hooks.spawn_visual(VisualKind::Obstacle(kind), position);
        let collision_enabled = hooks.visual_ready(visual);
        debug!(id = id.0, ?kind, lane = lane.0, collision_enabled, "obstacle spawned");

        self.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            position,
            collision_enabled,
            visual,
        });
        self.last_kind = Some(kind);
        self.last_spawn_scroll = Some(self.scrolled);
    }

    fn regenerate_pattern(&mut self, lane_count: u8, rng: &mut SeededRandom) {
        self.pattern.clear();
        self.pattern_cursor = 0;
        self.pattern_origin = self.scrolled;

        let mut offset = 0.0;
        let mut last_kind: Option<ObstacleKind> = None;
        while self.pattern.len() < self.config.pattern_length {
            offset += rng.next_range(
                self.config.pattern_min_spacing,
                self.config.pattern_max_spacing,
            );
            // Density roll: misses widen the gap instead of placing.
            if rng.next_f32() > self.config.pattern_density {
                continue;
            }
            let candidates: Vec<ObstacleKind> = ObstacleKind::ALL
                .into_iter()
                .filter(|&kind| Some(kind) != last_kind)
                .collect();
            let kind = *rng.pick(&candidates).unwrap_or(&ObstacleKind::Barrier);
            last_kind = Some(kind);
            self.pattern.push(PatternEntry {
                offset,
                kind,
                lane: rng.lane(lane_count),
            });
        }
        debug!(entries = self.pattern.len(), "obstacle pattern regenerated");
    }
}
