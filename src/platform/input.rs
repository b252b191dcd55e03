//! Keyboard and pointer mapping
//!
//! Browser events arrive as key codes and client coordinates. This module
//! turns them into intents and field-space points without touching the DOM,
//! so it builds (and is tested) on every target.

use glam::Vec2;

use crate::sim::{GamePhase, PlayerAction, TickInput};

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIntent {
    Jump,
    SlidePressed,
    SlideReleased,
    /// Press the visible Start/Restart control
    ActivateControl,
    ToggleHitboxes,
    ToggleMute,
}

impl InputIntent {
    /// Intents that only mean something during a run
    pub fn is_gameplay(self) -> bool {
        self.action().is_some()
    }

    /// The player action a gameplay intent maps to
    pub fn action(self) -> Option<PlayerAction> {
        match self {
            InputIntent::Jump => Some(PlayerAction::Jump),
            InputIntent::SlidePressed => Some(PlayerAction::SlidePress),
            InputIntent::SlideReleased => Some(PlayerAction::SlideRelease),
            _ => None,
        }
    }
}

/// Map a `keydown` event's `code`
pub fn key_down(code: &str) -> Option<InputIntent> {
    match code {
        "ArrowUp" | "Space" | "KeyW" => Some(InputIntent::Jump),
        "ArrowDown" | "KeyS" => Some(InputIntent::SlidePressed),
        "Enter" | "NumpadEnter" => Some(InputIntent::ActivateControl),
        "KeyH" => Some(InputIntent::ToggleHitboxes),
        "KeyM" => Some(InputIntent::ToggleMute),
        _ => None,
    }
}

/// Map a `keyup` event's `code`
pub fn key_up(code: &str) -> Option<InputIntent> {
    match code {
        "ArrowDown" | "KeyS" => Some(InputIntent::SlideReleased),
        _ => None,
    }
}

/// Keys whose browser default (page scrolling) should be suppressed
pub fn captures_key(code: &str) -> bool {
    matches!(code, "ArrowUp" | "ArrowDown" | "Space")
}

/// Convert client coordinates into field coordinates.
///
/// `bounds` is the canvas bounding box (left, top, width, height) in CSS
/// pixels; `field` is the canvas backing size the game draws into.
pub fn client_to_field(client: Vec2, bounds: (f32, f32, f32, f32), field: Vec2) -> Vec2 {
    let (left, top, width, height) = bounds;
    let local = client - Vec2::new(left, top);
    if width <= 0.0 || height <= 0.0 {
        return local;
    }
    local * Vec2::new(field.x / width, field.y / height)
}

/// Gameplay intents gathered between two ticks, kept in arrival order
#[derive(Debug, Clone, Default)]
pub struct PendingInput {
    input: TickInput,
}

impl PendingInput {
    /// Queue a gameplay intent. Dropped unless a run is active.
    pub fn record(&mut self, intent: InputIntent, phase: GamePhase) -> bool {
        if phase != GamePhase::Running {
            return false;
        }
        match intent.action() {
            Some(action) => {
                self.input.push(action);
                true
            }
            None => false,
        }
    }

    /// Hand the queued intents to the next tick
    pub fn take(&mut self) -> TickInput {
        std::mem::take(&mut self.input)
    }

    pub fn clear(&mut self) {
        self.input = TickInput::default();
    }
}
