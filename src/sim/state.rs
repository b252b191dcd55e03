//! Session state and core simulation types
//!
//! One `GameState` owns everything a run touches: score and lives, the
//! player, the three entity collections, the active buff and the phase.
//! Phase changes go through [`GameState::transition`] only.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{OBSTACLE_HITBOX, PLAYER_HITBOX, Rect, shrink_rect};
use super::player::Player;
use super::spawner::{SpawnArea, Spawner};
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-start screen with a Start control
    Menu,
    /// Active simulation
    Running,
    /// Run ended, Restart control shown
    GameOver,
}

/// Temporary modifiers picked up from the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    /// Absorbs one obstacle hit
    Shield,
    /// Doubles score gain
    DoubleScore,
    /// Scales game speed down
    SlowObstacles,
}

impl BuffKind {
    pub const ALL: [BuffKind; 3] = [
        BuffKind::Shield,
        BuffKind::DoubleScore,
        BuffKind::SlowObstacles,
    ];

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            BuffKind::Shield => "shield",
            BuffKind::DoubleScore => "doubleScore",
            BuffKind::SlowObstacles => "slowObstacles",
        }
    }
}

/// The single buff currently in effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    /// Session clock time (ms) after which the buff lapses
    pub expires_at_ms: f64,
}

/// Obstacle artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Crate,
}

/// What an entity looks like (and which collection it belongs to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntitySprite {
    Obstacle(ObstacleKind),
    Coin,
    Buff,
}

/// A scrolling world entity (obstacle, coin or buff)
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub sprite: EntitySprite,
}

impl Entity {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Collision rectangle; only obstacles are inset
    pub fn hitbox(&self) -> Rect {
        match self.sprite {
            EntitySprite::Obstacle(_) => shrink_rect(self.rect(), OBSTACLE_HITBOX),
            EntitySprite::Coin | EntitySprite::Buff => self.rect(),
        }
    }

    /// Scrolled fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Things that happened during a tick, drained by the host (audio, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RunStarted,
    Jumped,
    ObstacleHit,
    ShieldConsumed,
    LifeLost,
    GameOver,
    CoinCollected,
    ExtraLife,
    BuffActivated(BuffKind),
    BuffExpired(BuffKind),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: f32,
    pub lives: u32,
    pub next_life_threshold: f32,
    /// Session clock: sum of tick deltas since the run started
    pub clock_ms: f64,
    /// Host timestamp of the previous tick (None right after a reset)
    pub last_timestamp: Option<f64>,
    pub player: Player,
    pub spawner: Spawner,
    /// Entity collections, each in spawn order
    pub obstacles: Vec<Entity>,
    pub coins: Vec<Entity>,
    pub buffs: Vec<Entity>,
    pub active_buff: Option<ActiveBuff>,
    /// Parallax layer scroll offsets, each in (-field width, 0]
    pub layer_offsets: [f32; LAYER_COUNT],
    /// Playfield size in pixels
    pub field: Vec2,
    /// Unscaled size of one sprite sheet cell
    pub frame_size: Vec2,
    /// Bounds of the visible Start/Restart control
    pub button: Option<Rect>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session on the menu screen with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a session with custom tuning, rejecting values the
    /// simulation cannot run with
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        let frame_size = Vec2::new(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.starting_lives,
            next_life_threshold: tuning.life_threshold_step,
            tuning,
            phase: GamePhase::Menu,
            score: 0.0,
            clock_ms: 0.0,
            last_timestamp: None,
            player: Player::new(0.0),
            spawner: Spawner::new(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            buffs: Vec::new(),
            active_buff: None,
            layer_offsets: [0.0; LAYER_COUNT],
            field,
            frame_size,
            button: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.player.reset(state.ground_y());
        state.button = Some(state.button_rect());
        state
    }

    // === Layout ===

    /// Resize the playfield (host canvas size)
    pub fn set_field_size(&mut self, width: f32, height: f32) {
        self.field = Vec2::new(width, height);
        self.relayout();
    }

    /// Sprite sheet cell size, known once the player image has loaded
    pub fn set_player_frame(&mut self, width: f32, height: f32) {
        self.frame_size = Vec2::new(width, height);
        self.relayout();
    }

    fn relayout(&mut self) {
        if self.phase != GamePhase::Running {
            self.player.reset(self.ground_y());
        }
        if self.button.is_some() {
            self.button = Some(self.button_rect());
        }
    }

    /// On-screen player size
    pub fn player_size(&self) -> Vec2 {
        self.frame_size * SPRITE_SCALE
    }

    /// Player sprite top when standing
    pub fn ground_y(&self) -> f32 {
        self.field.y - self.player_size().y - GROUND_MARGIN
    }

    /// Floor line (player feet, obstacle bases)
    pub fn ground_bottom(&self) -> f32 {
        self.ground_y() + self.player_size().y
    }

    /// Fixed horizontal position of the player sprite
    pub fn player_x(&self) -> f32 {
        (self.field.x - self.player_size().x) / 4.0
    }

    /// Where the player sprite is drawn this frame
    pub fn player_rect(&self) -> Rect {
        Rect::from_pos_size(Vec2::new(self.player_x(), self.player.y), self.player_size())
    }

    /// Player collision rectangle for the current pose
    pub fn player_hitbox(&self) -> Rect {
        shrink_rect(self.player_rect(), PLAYER_HITBOX)
    }

    pub fn spawn_area(&self) -> SpawnArea {
        SpawnArea {
            right_edge: self.field.x,
            ground_y: self.ground_y(),
            ground_bottom: self.ground_bottom(),
        }
    }

    /// Start/Restart control, centered below the middle of the field
    pub fn button_rect(&self) -> Rect {
        Rect::new(
            self.field.x / 2.0 - BUTTON_WIDTH / 2.0,
            self.field.y / 2.0 + 40.0,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    // === Phase ===

    /// The one place phases change. Returns false for transitions the
    /// state machine does not allow (they are ignored).
    pub fn transition(&mut self, to: GamePhase) -> bool {
        match (self.phase, to) {
            (GamePhase::Menu | GamePhase::GameOver, GamePhase::Running) => {
                self.reset_run();
                self.phase = GamePhase::Running;
                self.button = None;
                self.emit(GameEvent::RunStarted);
                log::info!("Run started (seed {})", self.seed);
                true
            }
            (GamePhase::Running, GamePhase::GameOver) => {
                self.phase = GamePhase::GameOver;
                self.button = Some(self.button_rect());
                self.emit(GameEvent::GameOver);
                log::info!("Game over - final score {}", self.score.floor());
                true
            }
            (from, to) => {
                log::debug!("Ignoring phase transition {:?} -> {:?}", from, to);
                false
            }
        }
    }

    /// Hit-test a click against the visible control; starts a run on a hit
    pub fn click(&mut self, point: Vec2) -> bool {
        match self.button {
            Some(button) if button.contains_point(point) => self.transition(GamePhase::Running),
            _ => false,
        }
    }

    /// Activate the visible control without a pointer (keyboard)
    pub fn press_button(&mut self) -> bool {
        self.button.is_some() && self.transition(GamePhase::Running)
    }

    fn reset_run(&mut self) {
        self.score = 0.0;
        self.lives = self.tuning.starting_lives;
        self.next_life_threshold = self.tuning.life_threshold_step;
        self.clock_ms = 0.0;
        self.last_timestamp = None;
        self.obstacles.clear();
        self.coins.clear();
        self.buffs.clear();
        self.active_buff = None;
        self.spawner.reset();
        self.layer_offsets = [0.0; LAYER_COUNT];
        let ground = self.ground_y();
        self.player.reset(ground);
    }

    // === Clock ===

    /// Milliseconds since the previous host timestamp (16ms right after a reset)
    pub fn frame_delta(&mut self, timestamp: f64) -> f32 {
        let delta = match self.last_timestamp {
            Some(prev) => ((timestamp - prev) as f32).max(0.0),
            None => FIRST_TICK_DELTA_MS,
        };
        self.last_timestamp = Some(timestamp);
        delta
    }

    /// Forget the previous timestamp so a long pause (hidden tab) is not
    /// replayed as one huge step
    pub fn resync_clock(&mut self) {
        self.last_timestamp = None;
    }

    // === Score, speed, lives ===

    /// Score gain for a delta, doubled under DoubleScore
    pub fn score_gain(&self, dt_ms: f32) -> f32 {
        let gain = dt_ms * self.tuning.score_per_ms;
        if self.has_buff(BuffKind::DoubleScore) {
            gain * self.tuning.double_score_multiplier
        } else {
            gain
        }
    }

    /// Scroll speed derived from the current score (never stored)
    pub fn game_speed(&self) -> f32 {
        let speed = self.tuning.base_speed + self.score * self.tuning.speed_growth;
        if self.has_buff(BuffKind::SlowObstacles) {
            speed * self.tuning.slow_factor
        } else {
            speed
        }
    }

    /// Grant one life if the score has reached the next threshold.
    ///
    /// At most one life per call; a score that skips several thresholds
    /// catches up over the following ticks.
    pub fn grant_lives(&mut self) -> bool {
        if self.score < self.next_life_threshold {
            return false;
        }
        self.lives += 1;
        self.next_life_threshold += self.tuning.life_threshold_step;
        self.emit(GameEvent::ExtraLife);
        log::info!(
            "Extra life! lives={} next at {}",
            self.lives,
            self.next_life_threshold
        );
        true
    }

    // === Buffs ===

    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.active_buff.is_some_and(|buff| buff.kind == kind)
    }

    /// Replace any active buff with `kind`, running from now
    pub fn activate_buff(&mut self, kind: BuffKind) {
        self.active_buff = Some(ActiveBuff {
            kind,
            expires_at_ms: self.clock_ms + self.tuning.buff_duration_ms as f64,
        });
        self.emit(GameEvent::BuffActivated(kind));
        log::info!("Buff activated: {}", kind.label());
    }

    /// Pick a buff uniformly and activate it
    pub fn activate_random_buff(&mut self) -> BuffKind {
        let kind = BuffKind::ALL[self.rng.random_range(0..BuffKind::ALL.len())];
        self.activate_buff(kind);
        kind
    }

    /// Clear the active buff once the clock has passed its expiry
    pub fn expire_buff(&mut self) -> Option<BuffKind> {
        let buff = self.active_buff?;
        if self.clock_ms > buff.expires_at_ms {
            self.active_buff = None;
            self.emit(GameEvent::BuffExpired(buff.kind));
            log::info!("Buff expired: {}", buff.kind.label());
            Some(buff.kind)
        } else {
            None
        }
    }

    /// Use up an active shield
    pub fn consume_shield(&mut self) -> bool {
        if self.has_buff(BuffKind::Shield) {
            self.active_buff = None;
            true
        } else {
            false
        }
    }

    // === Entities & events ===

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, in the order they happened
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
