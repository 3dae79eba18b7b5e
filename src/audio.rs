//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, one per kind of game event. The
//! event-to-sound mapping is platform independent; playback only exists in
//! the browser.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player bullet launched
    Fire,
    /// Asteroid shattered
    AsteroidBreak,
    /// Two bullets annihilated mid-air
    Cancel,
    /// Boss cannon shot
    BossFire,
    /// Boss took a hit
    BossHit,
    /// Boss fight begins
    LevelClear,
    Win,
    Lose,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::PlayerFired => Self::Fire,
            GameEvent::AsteroidDestroyed { .. } => Self::AsteroidBreak,
            GameEvent::BulletsCancelled => Self::Cancel,
            GameEvent::BossFired => Self::BossFire,
            GameEvent::BossHit { .. } => Self::BossHit,
            GameEvent::LevelCleared => Self::LevelClear,
            GameEvent::Won => Self::Win,
            GameEvent::Lost(_) => Self::Lose,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
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
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume and mute changes
        pub fn apply(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Release the audio context
        pub fn close(&mut self) {
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
        }

        pub fn play_event(&self, event: &GameEvent) {
            self.play(SoundEffect::for_event(event));
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Fire => self.play_fire(ctx, vol),
                SoundEffect::AsteroidBreak => self.play_asteroid_break(ctx, vol),
                SoundEffect::Cancel => self.play_cancel(ctx, vol),
                SoundEffect::BossFire => self.play_boss_fire(ctx, vol),
                SoundEffect::BossHit => self.play_boss_hit(ctx, vol),
                SoundEffect::LevelClear => self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1),
                SoundEffect::Win => self.play_arpeggio(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08),
                SoundEffect::Lose => self.play_lose(ctx, vol),
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

        /// Short falling blip
        fn play_fire(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Rumbling crumble
        fn play_asteroid_break(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(35.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.35).ok();
            }

            // Grit on top
            if let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.1, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.frequency().set_value_at_time(600.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(1800.0, t + 0.04).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
        }

        /// Two-tone zap
        fn play_cancel(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 2000.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(2000.0, t).ok();
            osc.frequency().set_value_at_time(1200.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(2400.0, t + 0.08).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Low cannon thump
        fn play_boss_fire(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Metallic clang
        fn play_boss_hit(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(300.0, t + 0.05).ok();
                osc.frequency().set_value_at_time(200.0, t + 0.1).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }

        /// Rising run of notes
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], spacing: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }

        /// Sad descending
        fn play_lose(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LoseReason;
    use glam::Vec2;

    #[test]
    fn test_every_loss_sounds_the_same() {
        for reason in [
            LoseReason::TimeUp,
            LoseReason::OutOfAmmo,
            LoseReason::ShotDown,
            LoseReason::Rammed,
        ] {
            assert_eq!(SoundEffect::for_event(&GameEvent::Lost(reason)), SoundEffect::Lose);
        }
    }

    #[test]
    fn test_event_sounds() {
        assert_eq!(SoundEffect::for_event(&GameEvent::PlayerFired), SoundEffect::Fire);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::AsteroidDestroyed { pos: Vec2::ZERO }),
            SoundEffect::AsteroidBreak
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::BossHit { hp: 2 }), SoundEffect::BossHit);
        assert_eq!(SoundEffect::for_event(&GameEvent::Won), SoundEffect::Win);
    }
}
