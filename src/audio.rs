//! Audio using the Web Audio API and media elements
//!
//! Jump and hit sounds plus the background track are audio files; pickup
//! and milestone cues are synthesized with oscillators.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

const JUMP_FILE: &str = "jump.wav";
const HIT_FILE: &str = "hit.wav";
const MUSIC_FILE: &str = "bgmusic.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Hit,
    /// Coin collected
    Coin,
    /// Buff picked up
    Buff,
    ExtraLife,
    GameOver,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    jump: Option<HtmlAudioElement>,
    hit: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    sfx_volume: f32,
    music_volume: f32,
    /// Music paused by gameplay (hit or game over), not by the player
    music_held: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - synthesized cues disabled");
        }

        let music = clip(MUSIC_FILE);
        if let Some(music) = &music {
            music.set_loop(true);
        }

        let mut audio = Self {
            ctx,
            jump: clip(JUMP_FILE),
            hit: clip(HIT_FILE),
            music,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_held: true,
        };
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        for clip in [&self.jump, &self.hit].into_iter().flatten() {
            clip.set_volume(self.sfx_volume as f64);
        }
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume as f64);
        }
    }

    /// Resume the audio context (browsers require a user gesture first)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// React to a simulation event
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::RunStarted => self.restart_music(),
            GameEvent::Jumped => self.play(SoundEffect::Jump),
            GameEvent::ObstacleHit => {
                self.play(SoundEffect::Hit);
                self.pause_music();
            }
            GameEvent::ShieldConsumed | GameEvent::LifeLost => self.resume_music(),
            GameEvent::GameOver => self.play(SoundEffect::GameOver),
            GameEvent::CoinCollected => self.play(SoundEffect::Coin),
            GameEvent::ExtraLife => self.play(SoundEffect::ExtraLife),
            GameEvent::BuffActivated(_) => self.play(SoundEffect::Buff),
            GameEvent::BuffExpired(_) => {}
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        match effect {
            SoundEffect::Jump => replay(self.jump.as_ref()),
            SoundEffect::Hit => replay(self.hit.as_ref()),
            _ => {
                let Some(ctx) = &self.ctx else { return };
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
                match effect {
                    SoundEffect::Coin => self.play_coin(ctx, vol),
                    SoundEffect::Buff => self.play_buff(ctx, vol),
                    SoundEffect::ExtraLife => self.play_extra_life(ctx, vol),
                    SoundEffect::GameOver => self.play_game_over(ctx, vol),
                    SoundEffect::Jump | SoundEffect::Hit => {}
                }
            }
        }
    }

    // === Music ===

    /// Start the track from the beginning
    pub fn restart_music(&mut self) {
        self.music_held = false;
        if let Some(music) = &self.music {
            music.set_current_time(0.0);
            let _ = music.play();
        }
    }

    pub fn pause_music(&mut self) {
        self.music_held = true;
        if let Some(music) = &self.music {
            let _ = music.pause();
        }
    }

    pub fn resume_music(&mut self) {
        self.music_held = false;
        if let Some(music) = &self.music {
            let _ = music.play();
        }
    }

    /// Tab hidden or shown. Gameplay pauses are kept across visibility changes.
    pub fn set_page_hidden(&self, hidden: bool) {
        let Some(music) = &self.music else { return };
        if hidden {
            let _ = music.pause();
        } else if !self.music_held {
            let _ = music.play();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short rising arpeggio
    fn arpeggio(
        &self,
        ctx: &AudioContext,
        vol: f32,
        notes: &[f32],
        step: f64,
        len: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * step;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }
    }

    /// Coin - bright double ding
    fn play_coin(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            vol * 0.25,
            &[988.0, 1319.0],
            0.06,
            0.15,
            OscillatorType::Square,
        );
    }

    /// Buff pickup - whoosh up
    fn play_buff(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Extra life - little fanfare
    fn play_extra_life(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            vol * 0.3,
            &[523.0, 659.0, 784.0, 1047.0],
            0.09,
            0.3,
            OscillatorType::Triangle,
        );
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            vol * 0.3,
            &[400.0, 350.0, 300.0, 200.0],
            0.2,
            0.3,
            OscillatorType::Sine,
        );
    }
}

fn clip(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(clip) => {
            clip.set_preload("auto");
            Some(clip)
        }
        Err(e) => {
            log::warn!("Could not create audio element for {src}: {e:?}");
            None
        }
    }
}

/// Rewind and play so rapid repeats are not swallowed
fn replay(clip: Option<&HtmlAudioElement>) {
    if let Some(clip) = clip {
        clip.set_current_time(0.0);
        let _ = clip.play();
    }
}
