//! The per-tick game coordinator.
//!
//! `GameSession` owns every runtime component — player, spawners, power-up
//! timers, position tracker — and drives them once per rendered frame through
//! `tick`. There are no module-level globals and no self-rescheduling
//! callbacks: all timing flows through `tick(dt_ms)`, which makes reset
//! trivial (clear state, nothing pending to cancel) and timing testable
//! without wall-clock waits.
//!
//! The session is single-threaded and synchronous; nothing in a tick blocks.

use glam::Vec3;
use lanerush_physics::{collectable_hit, swept_hit, CollisionConfig, PositionTracker};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::collectables::{CollectableConfig, CollectableSpawner};
use crate::entities::{
    CollectableKind, EntityId, EntityIdGenerator, Lane, Obstacle, ObstacleKind, PowerUpKind,
};
use crate::obstacles::{ObstacleConfig, ObstacleSpawner, SpawnStrategy};
use crate::player::{PlayerConfig, PlayerState};
use crate::powerups::{ActivePowerUp, PowerUpMachine};
use crate::random::SeededRandom;
use crate::scene::{IndicatorColor, VisualHandle, VisualKind, WorldHooks};

/// Power-up durations and effect tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpConfig {
    pub shield_ms: f32,
    pub flight_ms: f32,
    pub boost_ms: f32,
    pub double_jump_ms: f32,
    pub safe_lane_ms: f32,

    /// Scroll-speed multiplier while Boost is active.
    pub boost_speed_factor: f32,

    /// Safe-lane guide: marker count, spacing, and start distance ahead.
    pub guide_marker_count: u32,
    pub guide_marker_spacing: f32,
    pub guide_start_ahead: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            shield_ms: 8000.0,
            flight_ms: 7000.0,
            boost_ms: 6000.0,
            double_jump_ms: 10_000.0,
            safe_lane_ms: 6000.0,
            boost_speed_factor: 1.5,
            guide_marker_count: 8,
            guide_marker_spacing: 3.0,
            guide_start_ahead: 6.0,
        }
    }
}

impl PowerUpConfig {
    pub fn duration_ms(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Shield => self.shield_ms,
            PowerUpKind::Flight => self.flight_ms,
            PowerUpKind::Boost => self.boost_ms,
            PowerUpKind::DoubleJump => self.double_jump_ms,
            PowerUpKind::SafeLane => self.safe_lane_ms,
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub lane_count: u8,
    pub lane_width: f32,

    /// World scroll per tick at session start, units.
    pub base_speed: f32,

    /// Scroll speed gained per second of play, units/tick.
    pub speed_ramp_per_sec: f32,

    /// Hard cap on the unboosted scroll speed.
    pub max_speed: f32,

    /// RNG seed. Sessions are reproducible per seed; hosts wanting unseeded
    /// behavior pass entropy.
    pub seed: u32,

    pub collision: CollisionConfig,
    pub player: PlayerConfig,
    pub obstacles: ObstacleConfig,
    pub obstacle_strategy: SpawnStrategy,
    pub collectables: CollectableConfig,
    pub powerups: PowerUpConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lane_count: 3,
            lane_width: 2.0,
            base_speed: 0.18,
            speed_ramp_per_sec: 0.002,
            max_speed: 0.6,
            seed: 1,
            collision: CollisionConfig::default(),
            player: PlayerConfig::default(),
            obstacles: ObstacleConfig::default(),
            obstacle_strategy: SpawnStrategy::Adaptive,
            collectables: CollectableConfig::default(),
            powerups: PowerUpConfig::default(),
        }
    }
}

/// Configuration validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("lane width must be positive, got {0}")]
    BadLaneWidth(f32),
    #[error("base speed must be positive, got {0}")]
    BadBaseSpeed(f32),
    #[error("max speed {max} must be at least base speed {base}")]
    MaxBelowBase { base: f32, max: f32 },
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.lane_width <= 0.0 {
            return Err(ConfigError::BadLaneWidth(self.lane_width));
        }
        if self.base_speed <= 0.0 {
            return Err(ConfigError::BadBaseSpeed(self.base_speed));
        }
        if self.max_speed < self.base_speed {
            return Err(ConfigError::MaxBelowBase {
                base: self.base_speed,
                max: self.max_speed,
            });
        }
        Ok(())
    }
}

/// Player input sampled for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub steer_left: bool,
    pub steer_right: bool,
    pub jump: bool,
}

/// Gameplay outcomes of a tick. The host decides presentation: an
/// `ObstacleHit` may end the run or play a stumble, `Collected` updates the
/// score UI, and so on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ObstacleHit(ObstacleKind),
    Collected(CollectableKind),
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
}

/// What happened during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
}

/// The safe-lane guide path: marker entities in one lane, with obstacles in
/// that lane along the path collision-exempt.
#[derive(Debug)]
struct GuideState {
    lane: Lane,
    /// Marker visuals with their current z positions.
    markers: Vec<(VisualHandle, f32)>,
}

impl GuideState {
    fn exempts(&self, obstacle: &Obstacle) -> bool {
        if obstacle.lane != self.lane || self.markers.is_empty() {
            return false;
        }
        let mut min_z = f32::INFINITY;
        let mut max_z = f32::NEG_INFINITY;
        for &(_, z) in &self.markers {
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }
        (min_z..=max_z).contains(&obstacle.position.z)
    }
}

/// One run of the game: every component, owned in one place.
#[derive(Debug)]
pub struct GameSession<H: WorldHooks> {
    config: SessionConfig,
    hooks: H,
    ids: EntityIdGenerator,
    rng: SeededRandom,
    player: PlayerState,
    player_id: EntityId,
    tracker: PositionTracker<EntityId>,
    obstacles: ObstacleSpawner,
    collectables: CollectableSpawner,
    powerups: PowerUpMachine,
    guide: Option<GuideState>,
    /// Unboosted scroll speed, units per tick.
    speed: f32,
    score: u32,
    distance: f32,
    active: bool,
}

impl<H: WorldHooks> GameSession<H> {
    pub fn new(config: SessionConfig, mut hooks: H) -> Result<Self, ConfigError> {
        config.validate()?;
        hooks.set_player_color(IndicatorColor::Default);

        let mut ids = EntityIdGenerator::new();
        let player_id = ids.next();
        let player = PlayerState::new(&config.player, config.lane_count);
        let obstacles = ObstacleSpawner::new(config.obstacles.clone(), config.obstacle_strategy);
        let collectables = CollectableSpawner::new(config.collectables.clone());
        let rng = SeededRandom::new(config.seed);
        let speed = config.base_speed;

        Ok(Self {
            config,
            hooks,
            ids,
            rng,
            player,
            player_id,
            tracker: PositionTracker::new(),
            obstacles,
            collectables,
            powerups: PowerUpMachine::new(),
            guide: None,
            speed,
            score: 0,
            distance: 0.0,
            active: true,
        })
    }

    /// Current scroll speed including the boost multiplier.
    pub fn current_speed(&self) -> f32 {
        if self.powerups.is_active(PowerUpKind::Boost) {
            self.speed * self.config.powerups.boost_speed_factor
        } else {
            self.speed
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total distance scrolled this run.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pause or resume the session. While inactive, `tick` is a no-op and
    /// spawners stop rescheduling.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Active power-ups with remaining durations, for HUD rendering.
    pub fn active_power_ups(&self) -> Vec<ActivePowerUp> {
        self.powerups.snapshot()
    }

    /// Grant a power-up directly, exactly as if its pickup were collected.
    pub fn grant_power_up(&mut self, kind: PowerUpKind) {
        let mut events = Vec::new();
        self.activate_power_up(kind, &mut events);
    }

    /// Advance the whole simulation by one frame.
    pub fn tick(&mut self, input: TickInput, dt_ms: f32) -> TickReport {
        if !self.active {
            return TickReport::default();
        }

        let dt_s = dt_ms / 1000.0;
        self.speed = (self.speed + self.config.speed_ramp_per_sec * dt_s)
            .min(self.config.max_speed);
        let speed = self.current_speed();
        let mut events = Vec::new();

        // Player input and physics.
        if input.steer_left {
            self.player.steer_left();
        }
        if input.steer_right {
            self.player.steer_right(self.config.lane_count);
        }
        if input.jump {
            self.player.jump(&self.config.player);
        }
        if let Some(guide) = &self.guide {
            // Nudged toward the safe lane every tick while the guide lasts.
            self.player.lane = guide.lane;
        }
        self.player
            .update(dt_s, &self.config.player, self.config.lane_width, self.config.lane_count);

        // Previous player center in the obstacle-relative frame: the world
        // scrolled +speed this tick, so the player's apparent motion is -z.
        let previous_center = self
            .tracker
            .last(self.player_id)
            .unwrap_or(self.player.position)
            + Vec3::new(0.0, 0.0, speed);

        // Scroll the world.
        self.obstacles.advance(speed);
        self.collectables.advance(speed);
        if let Some(guide) = &mut self.guide {
            for (_, z) in &mut guide.markers {
                *z += speed;
            }
        }

        // Spawning.
        self.obstacles.update(
            dt_ms,
            speed,
            self.player.position,
            self.config.lane_width,
            self.config.lane_count,
            &self.config.collision,
            &mut self.rng,
            &mut self.ids,
            &mut self.hooks,
        );
        self.collectables.update(
            dt_ms,
            speed,
            self.player.position,
            self.obstacles.obstacles(),
            self.powerups.is_active(PowerUpKind::Flight),
            self.config.lane_width,
            self.config.lane_count,
            &self.config.collision,
            &mut self.rng,
            &mut self.ids,
            &mut self.hooks,
        );

        // Magnet pull while boosting.
        if self.powerups.is_active(PowerUpKind::Boost) {
            self.collectables.apply_magnet(self.player.position);
        }

        // Entities whose visuals became ready start colliding now.
        self.obstacles.upgrade_readiness(&self.hooks);
        self.collectables.upgrade_readiness(&self.hooks);

        // Obstacle collisions.
        let player_box = self.player.aabb(&self.config.player);
        let shielded = self.powerups.is_active(PowerUpKind::Shield);
        for obstacle in self.obstacles.obstacles() {
            if !obstacle.collision_enabled {
                continue;
            }
            if self.guide.as_ref().is_some_and(|g| g.exempts(obstacle)) {
                continue;
            }
            if swept_hit(
                &player_box,
                previous_center,
                &obstacle.aabb(),
                speed,
                &self.config.collision,
            ) {
                if shielded {
                    // Shield disables the consequence, not the geometry.
                    continue;
                }
                self.player.is_stumbling = true;
                events.push(GameEvent::ObstacleHit(obstacle.kind));
                break;
            }
        }

        // Collectable pickups. Aerial coins only count during flight.
        let has_magnet = self.powerups.is_active(PowerUpKind::Boost);
        let flying = self.powerups.is_active(PowerUpKind::Flight);
        let picked: Vec<EntityId> = self
            .collectables
            .collectables()
            .iter()
            .filter(|item| {
                item.collision_enabled
                    && (item.kind != CollectableKind::AerialCoin || flying)
                    && collectable_hit(
                        &player_box,
                        &item.aabb(),
                        speed,
                        has_magnet,
                        &self.config.collision,
                    )
            })
            .map(|item| item.id)
            .collect();
        for id in picked {
            let Some(kind) = self.collectables.collect(id, &mut self.hooks) else {
                continue;
            };
            self.collectables.record_pickup(kind);
            self.score += kind.score_value();
            events.push(GameEvent::Collected(kind));
            if let CollectableKind::Power(power) = kind {
                self.activate_power_up(power, &mut events);
            }
        }

        // Power-up expiry.
        for kind in self.powerups.tick(dt_ms) {
            self.apply_deactivation(kind);
            events.push(GameEvent::PowerUpExpired(kind));
        }

        // Retire entities behind the player.
        self.obstacles.despawn_passed(&mut self.hooks);
        self.collectables.despawn_passed(&mut self.hooks);

        self.distance += speed;
        self.tracker.record(self.player_id, self.player.position);

        TickReport { events }
    }

    /// Clear the whole run. Safe to call mid-flight; countdown scheduling
    /// means there are no pending callbacks to invalidate.
    pub fn reset(&mut self) {
        info!("session reset");
        self.obstacles.reset(&mut self.hooks);
        self.collectables.reset(&mut self.hooks);
        self.remove_guide();
        self.powerups.reset();
        self.player.reset(&self.config.player, self.config.lane_count);
        self.tracker.clear();
        self.speed = self.config.base_speed;
        self.score = 0;
        self.distance = 0.0;
        self.active = true;
        self.hooks.set_player_color(IndicatorColor::Default);
    }

    fn activate_power_up(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        let duration = self.config.powerups.duration_ms(kind);
        let fresh = self.powerups.activate(kind, duration);
        debug!(?kind, duration, fresh, "power-up activated");
        events.push(GameEvent::PowerUpActivated(kind));

        if fresh {
            match kind {
                PowerUpKind::Shield => {}
                PowerUpKind::Flight => self.player.begin_flight(),
                // The boost multiplier is derived from the active flag in
                // current_speed(), so there is nothing to store here.
                PowerUpKind::Boost => {}
                PowerUpKind::DoubleJump => self.player.can_double_jump = true,
                PowerUpKind::SafeLane => self.spawn_guide(),
            }
        }
        self.hooks.set_player_color(self.powerups.indicator_color());
    }

    fn apply_deactivation(&mut self, kind: PowerUpKind) {
        debug!(?kind, "power-up expired");
        match kind {
            PowerUpKind::Shield => {}
            PowerUpKind::Flight => {
                self.player.end_flight();
                self.collectables.purge_aerial(&mut self.hooks);
            }
            PowerUpKind::Boost => {}
            PowerUpKind::DoubleJump => {
                self.player.can_double_jump = false;
                self.player.has_double_jumped = false;
            }
            PowerUpKind::SafeLane => self.remove_guide(),
        }
        self.hooks.set_player_color(self.powerups.indicator_color());
    }

    fn spawn_guide(&mut self) {
        self.remove_guide();
        let lane = self.rng.lane(self.config.lane_count);
        let x = lane.center_x(self.config.lane_width, self.config.lane_count);
        let cfg = &self.config.powerups;
        let mut markers = Vec::with_capacity(cfg.guide_marker_count as usize);
        for i in 0..cfg.guide_marker_count {
            let z = -(cfg.guide_start_ahead + i as f32 * cfg.guide_marker_spacing);
            let handle = self
                .hooks
                .spawn_visual(VisualKind::GuideMarker, Vec3::new(x, 0.1, z));
            markers.push((handle, z));
        }
        debug!(lane = lane.0, markers = markers.len(), "safe-lane guide spawned");
        self.guide = Some(GuideState { lane, markers });
    }

    fn remove_guide(&mut self) {
        if let Some(guide) = self.guide.take() {
            for (handle, _) in guide.markers {
                self.hooks.remove_visual(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Collectable;
    use crate::testing::RecordingHooks;

    const DT: f32 = 1000.0 / 60.0;

    fn test_config() -> SessionConfig {
        SessionConfig {
            seed: 42,
            ..SessionConfig::default()
        }
    }

    fn new_session(config: SessionConfig) -> GameSession<RecordingHooks> {
        GameSession::new(config, RecordingHooks::new()).unwrap()
    }

    /// Plant an obstacle through the session's own hooks so handle
    /// bookkeeping stays consistent.
    fn plant_obstacle(
        session: &mut GameSession<RecordingHooks>,
        kind: ObstacleKind,
        lane: Lane,
        z: f32,
    ) {
        let position = Vec3::new(
            lane.center_x(session.config.lane_width, session.config.lane_count),
            kind.half_extents().y,
            z,
        );
        let visual = session
            .hooks
            .spawn_visual(VisualKind::Obstacle(kind), position);
        let id = session.ids.next();
        session.obstacles.insert(Obstacle {
            id,
            kind,
            lane,
            position,
            collision_enabled: true,
            visual,
        });
    }

    fn plant_collectable(
        session: &mut GameSession<RecordingHooks>,
        kind: CollectableKind,
        lane: Lane,
        position: Vec3,
    ) -> EntityId {
        let visual = session
            .hooks
            .spawn_visual(VisualKind::Collectable(kind), position);
        let id = session.ids.next();
        session.collectables.insert(Collectable {
            id,
            kind,
            lane,
            position,
            rotation: 0.0,
            collision_enabled: true,
            visual,
        });
        id
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SessionConfig {
            lane_count: 0,
            ..SessionConfig::default()
        };
        assert_eq!(
            GameSession::new(config, RecordingHooks::new()).err(),
            Some(ConfigError::NoLanes)
        );

        let config = SessionConfig {
            base_speed: 0.5,
            max_speed: 0.2,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::new(config, RecordingHooks::new()).err(),
            Some(ConfigError::MaxBelowBase { .. })
        ));
    }

    #[test]
    fn inactive_session_is_a_noop() {
        let mut session = new_session(test_config());
        session.set_active(false);
        for _ in 0..300 {
            let report = session.tick(TickInput::default(), DT);
            assert!(report.events.is_empty());
        }
        assert_eq!(session.distance(), 0.0);
        assert!(session.hooks.spawned.is_empty());
    }

    #[test]
    fn obstacle_in_path_hits_and_stumbles() {
        let mut session = new_session(test_config());
        plant_obstacle(&mut session, ObstacleKind::Barrier, Lane(1), -2.0);

        let mut hit = false;
        for _ in 0..60 {
            let report = session.tick(TickInput::default(), DT);
            if report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleHit(ObstacleKind::Barrier)))
            {
                hit = true;
                break;
            }
        }
        assert!(hit, "scrolling obstacle must reach the player");
        assert!(session.player().is_stumbling);
    }

    #[test]
    fn shield_suppresses_obstacle_consequence() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::Shield);
        plant_obstacle(&mut session, ObstacleKind::Barrier, Lane(1), -2.0);

        for _ in 0..120 {
            let report = session.tick(TickInput::default(), DT);
            assert!(!report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleHit(_))));
        }
        assert!(!session.player().is_stumbling);
    }

    #[test]
    fn collision_disabled_obstacle_never_hits() {
        let mut session = new_session(test_config());
        // A visual that never becomes ready keeps its obstacle out of the
        // collision set, even as it scrolls straight through the player.
        let position = Vec3::new(0.0, 1.2, -2.0);
        let visual = session
            .hooks
            .spawn_visual(VisualKind::Obstacle(ObstacleKind::Barrier), position);
        session.hooks.not_ready.insert(visual);
        let id = session.ids.next();
        session.obstacles.insert(Obstacle {
            id,
            kind: ObstacleKind::Barrier,
            lane: Lane(1),
            position,
            collision_enabled: false,
            visual,
        });

        for _ in 0..120 {
            let report = session.tick(TickInput::default(), DT);
            assert!(!report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleHit(_))));
        }
        assert!(!session.player().is_stumbling);
    }

    #[test]
    fn collecting_a_power_pickup_activates_it() {
        let mut session = new_session(test_config());
        let id = plant_collectable(
            &mut session,
            CollectableKind::Power(PowerUpKind::Shield),
            Lane(1),
            Vec3::new(0.0, 0.9, -1.0),
        );

        let mut activated = false;
        for _ in 0..60 {
            let report = session.tick(TickInput::default(), DT);
            if report
                .events
                .iter()
                .any(|e| *e == GameEvent::PowerUpActivated(PowerUpKind::Shield))
            {
                activated = true;
                break;
            }
        }
        assert!(activated);
        assert!(session.powerups.is_active(PowerUpKind::Shield));
        assert_eq!(session.hooks.last_color(), Some(IndicatorColor::Shield));
        // Picked exactly once.
        assert!(session.collectables.collect(id, &mut session.hooks).is_none());
    }

    #[test]
    fn boost_multiplies_speed_and_reverts_on_expiry() {
        let mut session = new_session(test_config());
        let unboosted = session.current_speed();
        session.grant_power_up(PowerUpKind::Boost);
        assert!((session.current_speed() - unboosted * 1.5).abs() < 1e-6);

        // Run past the boost duration; the multiplier must be gone.
        let mut elapsed = 0.0;
        while elapsed <= session.config.powerups.boost_ms + 100.0 {
            session.tick(TickInput::default(), DT);
            elapsed += DT;
        }
        assert!(!session.powerups.is_active(PowerUpKind::Boost));
        // Speed has ramped a little, but is far below the 1.5x mark.
        assert!(session.current_speed() < unboosted * 1.1);
    }

    #[test]
    fn flight_lifts_player_and_expiry_purges_aerial_coins() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::Flight);

        let mut elapsed = 0.0;
        while elapsed < 3000.0 {
            session.tick(TickInput::default(), DT);
            elapsed += DT;
        }
        assert!(session.player().is_flying);
        assert!(session.player().position.y > 2.0);
        let aerial_now = session
            .collectables
            .collectables()
            .iter()
            .filter(|c| c.kind == CollectableKind::AerialCoin)
            .count();
        assert!(aerial_now > 0, "flight should spawn aerial coins");

        while elapsed <= session.config.powerups.flight_ms + 100.0 {
            session.tick(TickInput::default(), DT);
            elapsed += DT;
        }
        assert!(!session.player().is_flying);
        assert!(session
            .collectables
            .collectables()
            .iter()
            .all(|c| c.kind != CollectableKind::AerialCoin));
    }

    #[test]
    fn double_jump_grant_and_revoke() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::DoubleJump);
        assert!(session.player().can_double_jump);

        let mut elapsed = 0.0;
        while elapsed <= session.config.powerups.double_jump_ms + 100.0 {
            session.tick(TickInput::default(), DT);
            elapsed += DT;
        }
        assert!(!session.player().can_double_jump);
        assert!(!session.player().has_double_jumped);
    }

    #[test]
    fn safe_lane_spawns_markers_and_exempts_lane_obstacles() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::SafeLane);

        let guide_lane = session.guide.as_ref().unwrap().lane;
        let markers = session.guide.as_ref().unwrap().markers.len();
        assert_eq!(markers, 8);

        // An obstacle inside the guided lane and z-range is exempt.
        plant_obstacle(&mut session, ObstacleKind::Barrier, guide_lane, -2.0);
        // Pull the obstacle's z inside the marker range artificially by
        // checking the exemption predicate directly.
        let guide = session.guide.as_ref().unwrap();
        let covered = Obstacle {
            position: Vec3::new(0.0, 1.2, -(session.config.powerups.guide_start_ahead + 3.0)),
            lane: guide_lane,
            ..session.obstacles.obstacles()[0].clone()
        };
        assert!(guide.exempts(&covered));
        let wrong_lane = Obstacle {
            lane: Lane((guide_lane.0 + 1) % session.config.lane_count),
            ..covered.clone()
        };
        assert!(!guide.exempts(&wrong_lane));

        // The player is nudged into the guide lane.
        for _ in 0..60 {
            session.tick(TickInput::default(), DT);
        }
        assert_eq!(session.player().lane, guide_lane);

        // Expiry removes every marker.
        let mut elapsed = 0.0;
        while elapsed <= session.config.powerups.safe_lane_ms + 100.0 {
            session.tick(TickInput::default(), DT);
            elapsed += DT;
        }
        assert!(session.guide.is_none());
    }

    #[test]
    fn reactivation_does_not_stack_duration() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::Shield);
        for _ in 0..60 {
            session.tick(TickInput::default(), DT);
        }
        session.grant_power_up(PowerUpKind::Shield);
        let remaining = session.powerups.remaining_ms(PowerUpKind::Shield);
        assert!(remaining <= session.config.powerups.shield_ms);
    }

    #[test]
    fn coin_pickup_scores_and_feeds_fairness() {
        let mut session = new_session(test_config());
        plant_collectable(
            &mut session,
            CollectableKind::Coin,
            Lane(1),
            Vec3::new(0.0, 0.9, -1.0),
        );

        let mut collected = false;
        for _ in 0..60 {
            let report = session.tick(TickInput::default(), DT);
            if report
                .events
                .iter()
                .any(|e| *e == GameEvent::Collected(CollectableKind::Coin))
            {
                collected = true;
                break;
            }
        }
        assert!(collected);
        assert_eq!(session.score(), CollectableKind::Coin.score_value());
        assert_eq!(session.collectables.fairness().regular_pickups(), 1);
    }

    #[test]
    fn long_run_bookkeeping_and_reset() {
        let mut session = new_session(test_config());
        for _ in 0..5000 {
            session.tick(TickInput::default(), DT);
        }
        // Entities were created and retired; nothing double-removed
        // (RecordingHooks panics on double removal).
        assert!(!session.hooks.spawned.is_empty());
        assert_eq!(
            session.hooks.spawned.len(),
            session.hooks.alive.len() + session.hooks.removed.len()
        );

        session.reset();
        assert!(session.hooks.alive.is_empty(), "reset must release all visuals");
        assert_eq!(session.score(), 0);
        assert_eq!(session.distance(), 0.0);
        assert_eq!(session.current_speed(), session.config.base_speed);
        assert!(session.active_power_ups().is_empty());
        assert_eq!(session.hooks.last_color(), Some(IndicatorColor::Default));

        // The session keeps running cleanly after a mid-flight reset.
        for _ in 0..600 {
            session.tick(TickInput::default(), DT);
        }
        assert!(session.distance() > 0.0);
    }

    #[test]
    fn hud_snapshot_reports_remaining_durations() {
        let mut session = new_session(test_config());
        session.grant_power_up(PowerUpKind::Shield);
        session.grant_power_up(PowerUpKind::Boost);
        let snapshot = session.active_power_ups();
        assert_eq!(snapshot.len(), 2);
        for entry in snapshot {
            assert!(entry.remaining_ms > 0.0);
        }
    }
}
