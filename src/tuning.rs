//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. `Default` mirrors
//! [`crate::consts`]; a host may override any subset from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning bundle
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be {expected} (got {value})")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Gameplay tuning (speeds, spawn rates, buff timings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scroll & score ===
    pub base_speed: f32,
    pub score_per_ms: f32,
    pub speed_growth: f32,
    pub entity_speed_factor: f32,
    pub layer_speeds: [f32; LAYER_COUNT],

    // === Lives ===
    pub starting_lives: u32,
    pub life_threshold_step: f32,

    // === Player ===
    pub gravity: f32,
    pub jump_impulse: f32,
    pub stagger_frames: u32,

    // === Spawning ===
    pub obstacle_interval_ms: f32,
    pub obstacle_min_size: f32,
    pub obstacle_size_range: f32,
    /// Per-tick coin spawn probability
    pub coin_chance: f64,
    pub coin_score: f32,
    /// Per-tick buff spawn probability
    pub buff_chance: f64,

    // === Buffs ===
    pub buff_duration_ms: f32,
    pub double_score_multiplier: f32,
    pub slow_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_GAME_SPEED,
            score_per_ms: SCORE_PER_MS,
            speed_growth: SPEED_GROWTH_FACTOR,
            entity_speed_factor: ENTITY_SPEED_FACTOR,
            layer_speeds: LAYER_SPEEDS,

            starting_lives: STARTING_LIVES,
            life_threshold_step: LIFE_THRESHOLD_STEP,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            stagger_frames: STAGGER_FRAMES,

            obstacle_interval_ms: OBSTACLE_INTERVAL_MS,
            obstacle_min_size: OBSTACLE_MIN_SIZE,
            obstacle_size_range: OBSTACLE_SIZE_RANGE,
            coin_chance: COIN_CHANCE,
            coin_score: COIN_SCORE,
            buff_chance: BUFF_CHANCE,

            buff_duration_ms: BUFF_DURATION_MS,
            double_score_multiplier: DOUBLE_SCORE_MULTIPLIER,
            slow_factor: SLOW_OBSTACLES_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning bundle; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning with random coin and buff spawns switched off
    pub fn without_pickups() -> Self {
        Self {
            coin_chance: 0.0,
            buff_chance: 0.0,
            ..Self::default()
        }
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("base_speed", self.base_speed)?;
        non_negative("score_per_ms", self.score_per_ms)?;
        non_negative("speed_growth", self.speed_growth)?;
        positive("life_threshold_step", self.life_threshold_step)?;
        positive("gravity", self.gravity)?;
        if self.jump_impulse >= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "jump_impulse",
                expected: "negative (screen y grows downward)",
                value: self.jump_impulse as f64,
            });
        }
        if self.stagger_frames == 0 {
            return Err(TuningError::OutOfRange {
                field: "stagger_frames",
                expected: "at least 1",
                value: 0.0,
            });
        }
        positive("obstacle_interval_ms", self.obstacle_interval_ms)?;
        positive("obstacle_min_size", self.obstacle_min_size)?;
        non_negative("obstacle_size_range", self.obstacle_size_range)?;
        probability("coin_chance", self.coin_chance)?;
        probability("buff_chance", self.buff_chance)?;
        non_negative("buff_duration_ms", self.buff_duration_ms)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "greater than zero",
            value: value as f64,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "zero or more",
            value: value as f64,
        })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "within [0, 1]",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_speed": 3.5, "coin_chance": 0.0 }"#).unwrap();
        assert_eq!(tuning.base_speed, 3.5);
        assert_eq!(tuning.coin_chance, 0.0);
        assert_eq!(tuning.obstacle_interval_ms, OBSTACLE_INTERVAL_MS);
        assert_eq!(tuning.layer_speeds, LAYER_SPEEDS);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "buff_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "buff_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_upward_gravity_jump() {
        let tuning = Tuning {
            jump_impulse: 4.0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }
}
