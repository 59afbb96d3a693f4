//! Player state and runner movement.
//!
//! The player owns its physics; the rest of the core only reads the bounding
//! volume and lane, and writes ability flags through power-up side effects.
//! Movement is lane-based: x slides toward the current lane's center, y is
//! gravity plus jumps (or fixed flight height), z stays at the origin while
//! the world scrolls past.

use glam::Vec3;
use lanerush_physics::Aabb;
use serde::{Deserialize, Serialize};

use crate::entities::Lane;

/// Movement tuning for the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Downward acceleration, units/s^2.
    pub gravity: f32,

    /// Initial upward velocity of a jump, units/s.
    pub jump_velocity: f32,

    /// Fixed hover height of the flight power-up (box center).
    pub flight_height: f32,

    /// How fast the player rises toward flight height, units/s.
    pub flight_lift_rate: f32,

    /// Lateral slide speed toward the target lane center, units/s.
    pub lane_slide_rate: f32,

    /// Collision half-extents of the player box.
    pub half_extents: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            jump_velocity: 9.0,
            flight_height: 4.0,
            flight_lift_rate: 6.0,
            lane_slide_rate: 12.0,
            half_extents: Vec3::new(0.4, 0.9, 0.25),
        }
    }
}

impl PlayerConfig {
    /// Resting center height: the box sits on the ground plane.
    #[inline]
    pub fn rest_y(&self) -> f32 {
        self.half_extents.y
    }
}

/// Mutable player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub lane: Lane,
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub has_double_jumped: bool,
    /// Granted by the double-jump power-up, cleared when it ends.
    pub can_double_jump: bool,
    pub is_stumbling: bool,
    /// Flight power-up: gravity suspended, hover at flight height.
    pub is_flying: bool,
}

impl PlayerState {
    /// Spawn in the center lane at rest.
    pub fn new(config: &PlayerConfig, lane_count: u8) -> Self {
        let lane = Lane(lane_count / 2);
        Self {
            lane,
            position: Vec3::new(0.0, config.rest_y(), 0.0),
            vertical_velocity: 0.0,
            is_jumping: false,
            has_double_jumped: false,
            can_double_jump: false,
            is_stumbling: false,
            is_flying: false,
        }
    }

    pub fn aabb(&self, config: &PlayerConfig) -> Aabb {
        Aabb::from_center_half_extents(self.position, config.half_extents)
    }

    /// Steer one lane left, clamped at the edge.
    pub fn steer_left(&mut self) {
        if self.lane.0 > 0 {
            self.lane = Lane(self.lane.0 - 1);
        }
    }

    /// Steer one lane right, clamped at the edge.
    pub fn steer_right(&mut self, lane_count: u8) {
        if self.lane.0 + 1 < lane_count {
            self.lane = Lane(self.lane.0 + 1);
        }
    }

    /// Attempt a jump. Returns whether one was executed. A second airborne
    /// jump is allowed only while `can_double_jump` is set and the double
    /// jump has not been used since last landing. No jumping during flight.
    pub fn jump(&mut self, config: &PlayerConfig) -> bool {
        if self.is_flying {
            return false;
        }
        if !self.is_jumping {
            self.vertical_velocity = config.jump_velocity;
            self.is_jumping = true;
            true
        } else if self.can_double_jump && !self.has_double_jumped {
            self.vertical_velocity = config.jump_velocity;
            self.has_double_jumped = true;
            true
        } else {
            false
        }
    }

    /// Enter flight: gravity off, rise toward flight height.
    pub fn begin_flight(&mut self) {
        self.is_flying = true;
        self.vertical_velocity = 0.0;
    }

    /// Leave flight: gravity resumes from the current height, no snapping.
    pub fn end_flight(&mut self) {
        self.is_flying = false;
        self.is_jumping = self.position.y > 0.0;
    }

    /// Advance one tick of player physics.
    pub fn update(&mut self, dt_s: f32, config: &PlayerConfig, lane_width: f32, lane_count: u8) {
        // Lateral slide toward the lane center, without overshoot.
        let target_x = self.lane.center_x(lane_width, lane_count);
        let dx = target_x - self.position.x;
        let max_step = config.lane_slide_rate * dt_s;
        self.position.x += dx.clamp(-max_step, max_step);

        if self.is_flying {
            // Rise (or descend) toward the hover height.
            let dy = config.flight_height - self.position.y;
            let step = config.flight_lift_rate * dt_s;
            self.position.y += dy.clamp(-step, step);
            return;
        }

        // Gravity integration.
        self.vertical_velocity -= config.gravity * dt_s;
        self.position.y += self.vertical_velocity * dt_s;

        let rest = config.rest_y();
        if self.position.y <= rest {
            self.position.y = rest;
            self.vertical_velocity = 0.0;
            self.is_jumping = false;
            self.has_double_jumped = false;
        }
    }

    /// Back to the initial state. Ability flags are cleared; power-up side
    /// effects re-apply them if still active.
    pub fn reset(&mut self, config: &PlayerConfig, lane_count: u8) {
        *self = Self::new(config, lane_count);
    }
}
