//! Obstacle, coin and buff spawning
//!
//! Obstacles arrive on a fixed timer; coins and buffs are rolled every tick
//! with a small probability. All randomness comes from the caller's seeded
//! RNG so a run is reproducible from its seed. Spawned entities carry id 0
//! until the session assigns one.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntitySprite, ObstacleKind};
use crate::consts::{BUFF_LIFT, BUFF_SIZE, COIN_LIFT_RANGE, COIN_MIN_LIFT, COIN_SIZE};
use crate::tuning::Tuning;

/// Where new entities appear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    /// Entities enter at the right edge of the field
    pub right_edge: f32,
    /// Top of the player sprite when standing
    pub ground_y: f32,
    /// The floor line obstacles stand on
    pub ground_bottom: f32,
}

/// Spawn scheduling state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spawner {
    /// Milliseconds since the last obstacle
    pub obstacle_timer_ms: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.obstacle_timer_ms = 0.0;
    }

    /// Accumulate frame time and return the obstacle due this tick, if any
    pub fn advance_obstacles<R: Rng>(
        &mut self,
        dt_ms: f32,
        tuning: &Tuning,
        area: &SpawnArea,
        rng: &mut R,
    ) -> Option<Entity> {
        self.obstacle_timer_ms += dt_ms;
        if self.obstacle_timer_ms <= tuning.obstacle_interval_ms {
            return None;
        }
        self.obstacle_timer_ms = 0.0;

        let kind = if rng.random_bool(0.5) {
            ObstacleKind::Rock
        } else {
            ObstacleKind::Crate
        };
        let size = tuning.obstacle_min_size + rng.random::<f32>() * tuning.obstacle_size_range;

        Some(Entity {
            id: 0,
            pos: Vec2::new(area.right_edge, area.ground_bottom - size),
            size: Vec2::splat(size),
            sprite: EntitySprite::Obstacle(kind),
        })
    }

    /// Per-tick coin roll at a random height above the ground
    pub fn roll_coin<R: Rng>(tuning: &Tuning, area: &SpawnArea, rng: &mut R) -> Option<Entity> {
        if !roll(rng, tuning.coin_chance) {
            return None;
        }
        let lift = COIN_MIN_LIFT + rng.random::<f32>() * COIN_LIFT_RANGE;
        Some(Entity {
            id: 0,
            pos: Vec2::new(area.right_edge, area.ground_y - lift),
            size: Vec2::splat(COIN_SIZE),
            sprite: EntitySprite::Coin,
        })
    }

    /// Per-tick buff roll at a fixed height above the ground
    pub fn roll_buff<R: Rng>(tuning: &Tuning, area: &SpawnArea, rng: &mut R) -> Option<Entity> {
        if !roll(rng, tuning.buff_chance) {
            return None;
        }
        Some(Entity {
            id: 0,
            pos: Vec2::new(area.right_edge, area.ground_y - BUFF_LIFT),
            size: Vec2::splat(BUFF_SIZE),
            sprite: EntitySprite::Buff,
        })
    }
}

/// `random::<f64>() < chance`, so a zero chance never fires
fn roll<R: Rng>(rng: &mut R, chance: f64) -> bool {
    rng.random::<f64>() < chance
}
