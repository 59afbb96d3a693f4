//! Power-up timers and the indicator color resolution.
//!
//! Each of the five kinds is an independent `Inactive -> Active -> Inactive`
//! machine driven by elapsed milliseconds, not frame counts, so durations are
//! stable across variable frame rates. Re-activating an active kind resets
//! its duration; there is no stacking or queueing.
//!
//! Activation and deactivation *side effects* (speed multiplier, flight,
//! ability flags, guide path) are applied by the session, which owns the
//! state they mutate. This module stays pure so every timing invariant is
//! directly testable.

use serde::{Deserialize, Serialize};

use crate::entities::PowerUpKind;
use crate::scene::IndicatorColor;

/// Timer state for one power-up kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PowerUpState {
    pub active: bool,
    pub remaining_ms: f32,
}

/// HUD snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: f32,
}

/// Color precedence when several power-ups overlap. Fixed order; the first
/// active kind wins.
const COLOR_PRIORITY: [PowerUpKind; 5] = [
    PowerUpKind::Shield,
    PowerUpKind::Flight,
    PowerUpKind::Boost,
    PowerUpKind::DoubleJump,
    PowerUpKind::SafeLane,
];

/// The five independent power-up timers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpMachine {
    states: [PowerUpState; 5],
}

const fn slot(kind: PowerUpKind) -> usize {
    match kind {
        PowerUpKind::Shield => 0,
        PowerUpKind::Flight => 1,
        PowerUpKind::Boost => 2,
        PowerUpKind::DoubleJump => 3,
        PowerUpKind::SafeLane => 4,
    }
}

impl PowerUpMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `kind` for `duration_ms`. If already active the duration is
    /// reset to the new value. Returns true when the kind was previously
    /// inactive (the caller applies activation side effects only then).
    pub fn activate(&mut self, kind: PowerUpKind, duration_ms: f32) -> bool {
        let state = &mut self.states[slot(kind)];
        let fresh = !state.active;
        state.active = true;
        state.remaining_ms = duration_ms;
        fresh
    }

    /// Force `kind` inactive. Returns whether it was active.
    pub fn deactivate(&mut self, kind: PowerUpKind) -> bool {
        let state = &mut self.states[slot(kind)];
        let was_active = state.active;
        state.active = false;
        state.remaining_ms = 0.0;
        was_active
    }

    /// Advance all timers by `dt_ms`. Kinds whose timer crossed zero this
    /// tick are deactivated and returned exactly once.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let state = &mut self.states[slot(kind)];
            if !state.active {
                continue;
            }
            state.remaining_ms -= dt_ms;
            if state.remaining_ms <= 0.0 {
                state.active = false;
                state.remaining_ms = 0.0;
                expired.push(kind);
            }
        }
        expired
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.states[slot(kind)].active
    }

    pub fn remaining_ms(&self, kind: PowerUpKind) -> f32 {
        self.states[slot(kind)].remaining_ms
    }

    /// Active kinds with remaining durations, for HUD rendering.
    pub fn snapshot(&self) -> Vec<ActivePowerUp> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|&kind| self.is_active(kind))
            .map(|kind| ActivePowerUp {
                kind,
                remaining_ms: self.remaining_ms(kind),
            })
            .collect()
    }

    /// Resolve the indicator color from the currently active set.
    pub fn indicator_color(&self) -> IndicatorColor {
        for kind in COLOR_PRIORITY {
            if self.is_active(kind) {
                return match kind {
                    PowerUpKind::Shield => IndicatorColor::Shield,
                    PowerUpKind::Flight => IndicatorColor::Flight,
                    PowerUpKind::Boost => IndicatorColor::Boost,
                    PowerUpKind::DoubleJump => IndicatorColor::DoubleJump,
                    PowerUpKind::SafeLane => IndicatorColor::SafeLane,
                };
            }
        }
        IndicatorColor::Default
    }

    /// All timers back to inactive, with no expiry reporting.
    pub fn reset(&mut self) {
        self.states = Default::default();
    }
}
