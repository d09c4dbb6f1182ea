//! Deterministic simulation building blocks
//!
//! Everything here advances on the scene's logical tick clock. No wall
//! time, no platform dependencies; RNG is seeded per scene.

pub mod entity;
pub mod player;
pub mod spatial;
pub mod timer;

pub use entity::{EntityId, Exhaust, Laser, Meteor, MeteorSize, Shield, SpriteState, Star};
pub use player::{DeathState, Player, PlayerEffects};
pub use spatial::{ColliderHandle, ColliderKind, Shape, SpatialGrid};
pub use timer::{TickClock, Timer};
