//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters as a per-tick delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use geometry::{Padding, Rect, intersects, shrink_rect};
pub use player::{AnimState, Player};
pub use spawner::{SpawnArea, Spawner};
pub use state::{
    ActiveBuff, BuffKind, Entity, EntitySprite, GameEvent, GamePhase, GameState, ObstacleKind,
};
pub use tick::{PlayerAction, TickInput, tick};
