//! Player preferences
//!
//! Kept in memory for the lifetime of the page; nothing is persisted.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Silence music while the tab is hidden
    pub mute_on_blur: bool,

    // === Debug ===
    /// Outline the player and obstacle hitboxes
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            mute_on_blur: true,

            show_hitboxes: false,
        }
    }
}

impl Settings {
    /// Volume applied to one-shot effects
    pub fn effective_sfx_volume(&self) -> f32 {
        self.effective(self.sfx_volume)
    }

    /// Volume applied to the background track
    pub fn effective_music_volume(&self) -> f32 {
        self.effective(self.music_volume)
    }

    fn effective(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * channel).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn toggle_hitboxes(&mut self) -> bool {
        self.show_hitboxes = !self.show_hitboxes;
        log::info!("Hitbox overlay {}", if self.show_hitboxes { "on" } else { "off" });
        self.show_hitboxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_music_at_half_volume() {
        let settings = Settings::default();
        assert_eq!(settings.effective_music_volume(), 0.5);
        assert_eq!(settings.effective_sfx_volume(), 1.0);
        assert!(!settings.show_hitboxes);
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        assert!(settings.toggle_muted());
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert!(!settings.toggle_muted());
    }

    #[test]
    fn test_volume_is_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 1.0);
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{ "show_hitboxes": true }"#).unwrap();
        assert!(settings.show_hitboxes);
        assert_eq!(settings.music_volume, 0.5);
    }
}
