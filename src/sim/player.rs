//! Player vertical physics and sprite animation
//!
//! The runner never moves horizontally; the world scrolls past it. Only the
//! vertical axis is integrated, with a ground plane supplied by the caller.

/// Animation pose (one row of the sprite sheet each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimState {
    #[default]
    Run,
    Jump,
    Slide,
}

impl AnimState {
    /// Sprite sheet row for this pose
    pub fn row(self) -> u32 {
        match self {
            AnimState::Run => 0,
            AnimState::Jump => 1,
            AnimState::Slide => 2,
        }
    }

    /// Number of animation frames in this pose's row
    pub fn frame_count(self) -> u32 {
        match self {
            AnimState::Run => 9,
            AnimState::Jump => 7,
            AnimState::Slide => 7,
        }
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top edge of the sprite (screen y)
    pub y: f32,
    /// Vertical velocity in pixels/tick (negative = up)
    pub vel_y: f32,
    pub anim: AnimState,
    /// Current column in the sprite sheet row
    pub frame: u32,
    /// Ticks since the run started, drives the animation stagger
    pub frame_counter: u32,
}

impl Player {
    pub fn new(ground_y: f32) -> Self {
        Self {
            y: ground_y,
            vel_y: 0.0,
            anim: AnimState::Run,
            frame: 0,
            frame_counter: 0,
        }
    }

    /// Put the player back on the ground in the running pose
    pub fn reset(&mut self, ground_y: f32) {
        *self = Self::new(ground_y);
    }

    /// Exactly on the ground plane (landing clamps, so equality is reliable)
    pub fn on_ground(&self, ground_y: f32) -> bool {
        self.y == ground_y
    }

    /// Start a jump. Ignored unless standing on the ground.
    pub fn jump(&mut self, ground_y: f32, impulse: f32) -> bool {
        if !self.on_ground(ground_y) {
            return false;
        }
        self.vel_y = impulse;
        self.set_anim(AnimState::Jump);
        true
    }

    /// Start sliding. Ignored in the air or when already sliding.
    pub fn start_slide(&mut self, ground_y: f32) -> bool {
        if self.anim == AnimState::Slide || !self.on_ground(ground_y) {
            return false;
        }
        self.set_anim(AnimState::Slide);
        true
    }

    /// Release the slide and go back to running
    pub fn end_slide(&mut self) -> bool {
        if self.anim != AnimState::Slide {
            return false;
        }
        self.set_anim(AnimState::Run);
        true
    }

    /// Apply gravity and land on the ground plane.
    ///
    /// Landing clears velocity and turns a jump back into a run; the frame
    /// index is kept since it always fits the run row.
    pub fn integrate(&mut self, ground_y: f32, gravity: f32) {
        self.vel_y += gravity;
        self.y += self.vel_y;

        if self.y >= ground_y {
            self.y = ground_y;
            self.vel_y = 0.0;
            if self.anim == AnimState::Jump {
                self.anim = AnimState::Run;
            }
        }
    }

    /// Advance the animation one frame every `stagger` ticks
    pub fn advance_animation(&mut self, stagger: u32) {
        if self.frame_counter.is_multiple_of(stagger.max(1)) {
            self.frame = (self.frame + 1) % self.anim.frame_count();
        }
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }

    fn set_anim(&mut self, anim: AnimState) {
        self.anim = anim;
        // Reset frame: rows have different lengths
        self.frame = 0;
    }
}
