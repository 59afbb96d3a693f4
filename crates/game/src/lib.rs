//! Lanerush Game
//!
//! Simulation core of a lane-based endless runner: the player holds position
//! while the world scrolls past, steering between lanes, jumping obstacles
//! and collecting pickups at ever-increasing speed.
//!
//! The crate is renderer-agnostic. A host implements [`scene::WorldHooks`]
//! to own meshes, materials and assets; the core drives it through opaque
//! visual handles. [`session::GameSession::tick`] advances everything one
//! frame and returns the gameplay events of that frame:
//!
//! - [`player`]: lane steering, jumping, gravity, flight
//! - [`obstacles`]: adaptive and pattern-based obstacle placement
//! - [`collectables`]: coin/gem/power-up placement with a power-up fairness
//!   guarantee, plus the boost magnet
//! - [`powerups`]: the five timed power-up effects
//! - [`session`]: the per-tick coordinator tying it all together
//!
//! All randomness flows through a single seeded generator, so a session is
//! fully reproducible from its configuration.

pub mod collectables;
pub mod entities;
pub mod obstacles;
pub mod player;
pub mod powerups;
pub mod random;
pub mod scene;
pub mod session;

#[cfg(test)]
mod testing;

pub use entities::{
    Collectable, CollectableKind, EntityId, Lane, Obstacle, ObstacleKind, PowerUpKind,
};
pub use scene::{IndicatorColor, VisualHandle, VisualKind, WorldHooks};
pub use session::{
    ConfigError, GameEvent, GameSession, SessionConfig, TickInput, TickReport,
};
