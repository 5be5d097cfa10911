//! Audio system using Web Audio API
//!
//! Every cue is synthesized from oscillators, no sound files involved.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player caught fire
    GameOver,
    /// Final score made the leaderboard
    HighScore,
}

/// Looping background drone while a run is active
struct Music {
    oscillators: Vec<OscillatorNode>,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    music: Option<Music>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            music: None,
        }
    }

    /// Pick up changed volumes or mute state
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if self.music_volume <= 0.0 {
            self.stop_music();
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        if effect == SoundEffect::GameOver {
            self.stop_music();
        }
        self.resume();
        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Jump => play_jump(ctx, vol),
            SoundEffect::GameOver => play_game_over(ctx, vol),
            SoundEffect::HighScore => play_high_score(ctx, vol),
        }
    }

    /// Start the background drone if it is not already playing
    pub fn start_music(&mut self) {
        if self.music.is_some() || self.music_volume <= 0.0 {
            return;
        }
        self.resume();
        let Some(ctx) = &self.ctx else { return };

        let Ok(bus) = ctx.create_gain() else { return };
        bus.gain().set_value(self.music_volume * 0.08);
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        // Root and fifth, slightly detuned for a slow beat
        let mut oscillators = Vec::with_capacity(2);
        for (freq, detune) in [(110.0, 0.0), (164.8, 4.0)] {
            let Ok(osc) = ctx.create_oscillator() else {
                continue;
            };
            osc.set_type(OscillatorType::Triangle);
            osc.frequency().set_value(freq);
            osc.detune().set_value(detune);
            if osc.connect_with_audio_node(&bus).is_ok() && osc.start().is_ok() {
                oscillators.push(osc);
            }
        }
        self.music = Some(Music { oscillators });
    }

    pub fn stop_music(&mut self) {
        if let Some(music) = self.music.take() {
            for osc in music.oscillators {
                let _ = osc.stop();
            }
        }
    }
}

/// Create an oscillator routed through its own gain node
fn create_osc(
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

/// Short rising blip
fn play_jump(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.15, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
        .ok();
    osc.frequency().set_value_at_time(300.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(700.0, t + 0.12)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.18).ok();
}

/// Descending four-note fall, after a short pause
fn play_game_over(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
        let delay = 0.5 + i as f64 * 0.2;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }
}

/// Rising arpeggio
fn play_high_score(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
        let delay = i as f64 * 0.08;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}
