//! Shadow Runner - A parallax endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, session state)
//! - `render`: Draw-list composition (what to draw, never how)
//! - `platform`: Browser adapters (input mapping, assets, canvas)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (audio, debug overlay)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Default playfield size (overridden by the host canvas)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 700.0;

    /// Delta used on the first tick after a reset (~60 Hz)
    pub const FIRST_TICK_DELTA_MS: f32 = 16.0;

    /// Scroll and scoring
    pub const BASE_GAME_SPEED: f32 = 2.0;
    pub const SCORE_PER_MS: f32 = 0.01;
    pub const SPEED_GROWTH_FACTOR: f32 = 0.001;
    /// Entities move this many pixels per tick per unit of game speed
    pub const ENTITY_SPEED_FACTOR: f32 = 3.0;
    pub const DOUBLE_SCORE_MULTIPLIER: f32 = 2.0;
    pub const SLOW_OBSTACLES_FACTOR: f32 = 0.6;

    /// Lives
    pub const STARTING_LIVES: u32 = 2;
    pub const LIFE_THRESHOLD_STEP: f32 = 100.0;

    /// Player physics (per tick, screen y grows downward)
    pub const GRAVITY: f32 = 0.7;
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Gap between the player's feet and the bottom of the field
    pub const GROUND_MARGIN: f32 = 50.0;

    /// Player sprite sheet: 9 columns x 3 rows, drawn at 2x
    pub const SPRITE_COLUMNS: u32 = 9;
    pub const SPRITE_ROWS: u32 = 3;
    pub const SPRITE_SCALE: f32 = 2.0;
    pub const DEFAULT_FRAME_WIDTH: f32 = 64.0;
    pub const DEFAULT_FRAME_HEIGHT: f32 = 58.0;
    /// Ticks between animation frame advances
    pub const STAGGER_FRAMES: u32 = 6;

    /// Obstacles
    pub const OBSTACLE_INTERVAL_MS: f32 = 1600.0;
    pub const OBSTACLE_MIN_SIZE: f32 = 60.0;
    pub const OBSTACLE_SIZE_RANGE: f32 = 40.0;

    /// Coins
    pub const COIN_CHANCE: f64 = 0.002;
    pub const COIN_SIZE: f32 = 30.0;
    pub const COIN_MIN_LIFT: f32 = 100.0;
    pub const COIN_LIFT_RANGE: f32 = 80.0;
    pub const COIN_SCORE: f32 = 5.0;

    /// Buffs
    pub const BUFF_CHANCE: f64 = 0.0005;
    pub const BUFF_SIZE: f32 = 40.0;
    pub const BUFF_LIFT: f32 = 120.0;
    pub const BUFF_DURATION_MS: f32 = 10_000.0;

    /// Parallax background
    pub const LAYER_COUNT: usize = 5;
    pub const LAYER_SPEEDS: [f32; LAYER_COUNT] = [0.2, 0.4, 0.6, 0.8, 1.0];

    /// Start/Restart control
    pub const BUTTON_WIDTH: f32 = 200.0;
    pub const BUTTON_HEIGHT: f32 = 60.0;
}
