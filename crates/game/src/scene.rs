//! The seam between the simulation core and the rendering layer.
//!
//! The core never builds meshes or materials. It asks the host for a visual
//! per spawned entity, gets back an opaque handle, and later asks for the
//! handle's readiness or removal. An entity whose visual is not ready is
//! excluded from collision until readiness flips true; a failed asset load is
//! indistinguishable from "not yet ready" on purpose.

use serde::{Deserialize, Serialize};

use crate::entities::{CollectableKind, ObstacleKind};

/// Opaque handle to a host-owned visual representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// What kind of visual the host should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Obstacle(ObstacleKind),
    Collectable(CollectableKind),
    /// One marker of the safe-lane guide path.
    GuideMarker,
}

/// Display color of the player indicator, resolved from the set of active
/// power-ups by fixed priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Default,
    Shield,
    Flight,
    Boost,
    DoubleJump,
    SafeLane,
}

impl IndicatorColor {
    /// RGB in [0, 1] for the host's material layer.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            IndicatorColor::Default => [0.85, 0.85, 0.85],
            IndicatorColor::Shield => [0.25, 0.65, 1.0],
            IndicatorColor::Flight => [0.95, 0.8, 0.2],
            IndicatorColor::Boost => [1.0, 0.35, 0.2],
            IndicatorColor::DoubleJump => [0.4, 0.95, 0.45],
            IndicatorColor::SafeLane => [0.75, 0.4, 0.95],
        }
    }
}

/// Host-side callbacks the simulation drives.
///
/// All methods are infallible from the core's point of view: a host that
/// cannot build a visual yet simply reports the handle as not ready, and the
/// entity stays collision-disabled until it is.
pub trait WorldHooks {
    /// Create a visual for `kind` at `position`; returns an opaque handle.
    fn spawn_visual(&mut self, kind: VisualKind, position: glam::Vec3) -> VisualHandle;

    /// Release the visual behind `handle`.
    fn remove_visual(&mut self, handle: VisualHandle);

    /// Whether the visual's asset is loaded and displayable.
    fn visual_ready(&self, handle: VisualHandle) -> bool;

    /// Update the player's indicator color.
    fn set_player_color(&mut self, color: IndicatorColor);
}
