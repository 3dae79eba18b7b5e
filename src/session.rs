//! Session controls
//!
//! A `Session` owns the single `GameState` and is the only thing that mutates
//! it. Frame ticks and keyboard events both arrive as `Command`s through
//! `handle`, so the browser's timer and its key callbacks never race.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::vertex::colors;
use crate::renderer::{Presenter, RenderError, draw_scene};
use crate::sim::{
    ConfigError, GameEvent, GameState, HudSnapshot, Outcome, Tuning, elapse, tick,
};

pub use crate::sim::Key;

/// How long a level banner stays up
pub const BANNER_MS: f64 = 2000.0;

/// Longest wall-clock gap turned into movement steps at once (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Everything that can drive a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    /// Animation frame at wall-clock `now_ms`
    Frame { now_ms: f64 },
}

pub struct Session<P: Presenter> {
    state: GameState,
    presenter: P,
    accumulator: f32,
    last_frame_ms: Option<f64>,
    /// A transient banner is up
    banner_shown: bool,
    /// When it comes down; set on the first frame after it appears
    banner_until: Option<f64>,
    /// Events produced since the last `drain_events`
    outbox: Vec<GameEvent>,
    shut_down: bool,
}

impl<P: Presenter> Session<P> {
    pub fn new(tuning: Tuning, presenter: P) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(tuning)?,
            presenter,
            accumulator: 0.0,
            last_frame_ms: None,
            banner_shown: false,
            banner_until: None,
            outbox: Vec::new(),
            shut_down: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn snapshot(&self) -> HudSnapshot {
        self.state.snapshot()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Begin a fresh run at level one
    pub fn start_level_one(&mut self) {
        if self.shut_down {
            return;
        }
        self.state.start_level_one();
        self.accumulator = 0.0;
        self.show_banner("LEVEL 1: CLEAR THE ASTEROIDS", colors::INFO);
    }

    /// Return to the menu
    pub fn restart(&mut self) {
        if self.shut_down {
            return;
        }
        self.state.reset();
        self.accumulator = 0.0;
        self.banner_shown = false;
        self.banner_until = None;
        self.presenter.hide_message();
        log::info!("Returned to menu");
    }

    /// Take the events produced since the last call (sounds, stats)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// The one entry point that mutates the game
    pub fn handle(&mut self, command: Command) -> Result<(), RenderError> {
        if self.shut_down {
            return Ok(());
        }
        match command {
            Command::KeyDown { key, repeat } => {
                self.state.input.set(key, true);
                if !repeat {
                    self.key_pressed(key);
                }
                self.collect_events(self.last_frame_ms.unwrap_or(0.0));
                Ok(())
            }
            Command::KeyUp { key } => {
                self.state.input.set(key, false);
                Ok(())
            }
            Command::Frame { now_ms } => self.frame(now_ms),
        }
    }

    /// Tear down; safe to call any number of times
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.state.input.release_all();
        self.presenter.hide_message();
        self.presenter.clear();
        log::info!("Session shut down");
    }

    fn key_pressed(&mut self, key: Key) {
        match key {
            Key::Fire => {
                self.state.fire();
            }
            Key::Confirm => match self.state.outcome {
                Outcome::Menu => self.start_level_one(),
                Outcome::Win | Outcome::Lose => self.restart(),
                _ => {}
            },
            _ => {}
        }
    }

    fn frame(&mut self, now_ms: f64) -> Result<(), RenderError> {
        let wall_dt = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).max(0.0),
            None => SIM_DT,
        };
        self.last_frame_ms = Some(now_ms);

        if self.state.outcome.is_playing() {
            let dt = wall_dt.min(MAX_FRAME_DT);
            // Wall-clock time that gets no movement steps
            let mut skipped = wall_dt - dt;

            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.collect_events(now_ms);
            }
            if substeps == MAX_SUBSTEPS {
                // Fell behind; drop the movement backlog instead of spiralling
                skipped += self.accumulator;
                self.accumulator = 0.0;
            }

            // The countdown and boss clock still follow the wall clock
            if skipped > 0.0 && elapse(&mut self.state, skipped) {
                log::debug!("Skipped {:.0}ms of movement", skipped * 1000.0);
            }
            self.collect_events(now_ms);
        }

        if self.banner_shown {
            match self.banner_until {
                None => self.banner_until = Some(now_ms + BANNER_MS),
                Some(until) if now_ms >= until => {
                    self.banner_shown = false;
                    self.banner_until = None;
                    self.presenter.hide_message();
                }
                Some(_) => {}
            }
        }

        draw_scene(&mut self.presenter, &self.state);
        self.presenter.present()
    }

    /// Route tick events to messages and the outbox
    fn collect_events(&mut self, now_ms: f64) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::LevelCleared => {
                    self.show_banner("LEVEL 2: DEFEAT THE BOSS", colors::INFO);
                    self.banner_until = Some(now_ms + BANNER_MS);
                }
                GameEvent::Won => self.show_final("YOU WIN!", colors::WIN),
                GameEvent::Lost(reason) => self.show_final(reason.message(), colors::LOSE),
                _ => {}
            }
            self.outbox.push(event);
        }
    }

    fn show_banner(&mut self, text: &str, color: [f32; 4]) {
        self.presenter.show_message(text, color);
        self.banner_shown = true;
        self.banner_until = None;
    }

    /// End-screen message, stays until restart
    fn show_final(&mut self, text: &str, color: [f32; 4]) {
        self.banner_shown = false;
        self.banner_until = None;
        self.presenter.show_message(text, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Boss, Entity, LoseReason};
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        presents: usize,
        ships: usize,
        message: Option<String>,
        message_color: Option<[f32; 4]>,
    }

    impl Presenter for Recorder {
        fn clear(&mut self) {
            self.frames += 1;
            self.ships = 0;
        }
        fn draw_player(&mut self, _: &Entity) {
            self.ships += 1;
        }
        fn draw_bullet(&mut self, _: &Entity) {}
        fn draw_asteroid(&mut self, _: &Entity) {}
        fn draw_boss(&mut self, _: &Boss) {}
        fn draw_boss_bullet(&mut self, _: &Entity) {}
        fn show_message(&mut self, text: &str, color: [f32; 4]) {
            self.message = Some(text.to_string());
            self.message_color = Some(color);
        }
        fn hide_message(&mut self) {
            self.message = None;
            self.message_color = None;
        }
        fn present(&mut self) -> Result<(), RenderError> {
            self.presents += 1;
            Ok(())
        }
    }

    fn session() -> Session<Recorder> {
        Session::new(Tuning::default().with_seed(99), Recorder::default()).unwrap()
    }

    fn press(session: &mut Session<Recorder>, key: Key) {
        session
            .handle(Command::KeyDown { key, repeat: false })
            .unwrap();
        session.handle(Command::KeyUp { key }).unwrap();
    }

    #[test]
    fn test_new_rejects_bad_tuning() {
        let tuning = Tuning {
            level_time_secs: -1.0,
            ..Default::default()
        };
        assert!(Session::new(tuning, Recorder::default()).is_err());
    }

    #[test]
    fn test_confirm_starts_and_restarts() {
        let mut s = session();
        assert_eq!(s.snapshot().outcome, Outcome::Menu);

        press(&mut s, Key::Confirm);
        assert_eq!(s.snapshot().outcome, Outcome::LevelOne);
        assert_eq!(
            s.presenter().message.as_deref(),
            Some("LEVEL 1: CLEAR THE ASTEROIDS")
        );

        // Confirm mid-level does nothing
        press(&mut s, Key::Confirm);
        assert_eq!(s.snapshot().outcome, Outcome::LevelOne);

        s.state.lose(LoseReason::TimeUp);
        press(&mut s, Key::Confirm);
        assert_eq!(s.snapshot().outcome, Outcome::Menu);
        assert!(s.presenter().message.is_none());
    }

    #[test]
    fn test_fire_ignores_key_repeat() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::KeyDown {
            key: Key::Fire,
            repeat: false,
        })
        .unwrap();
        for _ in 0..5 {
            s.handle(Command::KeyDown {
                key: Key::Fire,
                repeat: true,
            })
            .unwrap();
        }
        assert_eq!(s.snapshot().bullets_remaining, 9);
        assert_eq!(s.state().bullets.len(), 1);
        assert_eq!(s.drain_events(), vec![GameEvent::PlayerFired]);
    }

    #[test]
    fn test_held_keys_move_ship_on_frames() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::KeyDown {
            key: Key::Right,
            repeat: false,
        })
        .unwrap();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();
        let x = s.state().player.unwrap().pos.x;
        assert!(x > crate::consts::PLAYER_START_X);

        s.handle(Command::KeyUp { key: Key::Right }).unwrap();
        s.handle(Command::Frame { now_ms: 50.0 }).unwrap();
        assert_eq!(s.state().player.unwrap().pos.x, x);
    }

    #[test]
    fn test_frames_render_even_in_menu() {
        let mut s = session();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();
        s.handle(Command::Frame { now_ms: 16.0 }).unwrap();
        assert_eq!(s.presenter().presents, 2);
        assert_eq!(s.presenter().frames, 2);
        assert_eq!(s.presenter().ships, 0);
        assert_eq!(s.state().clock_ms, 0.0);
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::Frame { now_ms: 1000.0 }).unwrap();
        // 60ms of wall clock is three whole 60 Hz ticks
        s.handle(Command::Frame { now_ms: 1060.0 }).unwrap();
        let ticks = (s.state().clock_ms / (f64::from(SIM_DT) * 1000.0)).round();
        assert_eq!(ticks, 4.0);
    }

    #[test]
    fn test_countdown_follows_wall_clock_on_slow_frames() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();
        let start = s.state().time_remaining;

        // 80ms frames need more steps than one frame may run
        for i in 1..=125 {
            s.handle(Command::Frame { now_ms: i as f64 * 80.0 }).unwrap();
        }

        assert!((start - s.state().time_remaining - 10.0).abs() < 0.01);
        assert!((s.state().clock_ms - (10_000.0 + f64::from(SIM_DT) * 1000.0)).abs() < 1.0);
        assert_eq!(s.snapshot().outcome, Outcome::LevelOne);
    }

    #[test]
    fn test_long_stall_costs_time_but_not_movement() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::KeyDown {
            key: Key::Right,
            repeat: false,
        })
        .unwrap();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();
        let x = s.state().player.unwrap().pos.x;

        s.handle(Command::Frame { now_ms: 10_000.0 }).unwrap();
        assert_eq!(s.snapshot().time_remaining, 50);
        let moved = s.state().player.unwrap().pos.x - x;
        assert!(moved <= crate::consts::PLAYER_STEP * MAX_SUBSTEPS as f32);

        // A stall longer than the level ends it
        s.handle(Command::Frame { now_ms: 70_000.0 }).unwrap();
        assert_eq!(s.snapshot().outcome, Outcome::Lose);
        assert_eq!(s.presenter().message.as_deref(), Some("TIME'S UP!"));
    }

    #[test]
    fn test_level_clear_banner_expires() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();

        s.state.asteroids = vec![Entity::asteroid(Vec2::new(400.0, 150.0))];
        s.state.bullets = vec![Entity::player_bullet(Vec2::new(400.0, 180.0))];
        s.handle(Command::Frame { now_ms: 20.0 }).unwrap();

        assert_eq!(s.snapshot().outcome, Outcome::LevelTwo);
        assert_eq!(
            s.presenter().message.as_deref(),
            Some("LEVEL 2: DEFEAT THE BOSS")
        );
        assert!(s.drain_events().contains(&GameEvent::LevelCleared));

        s.handle(Command::Frame { now_ms: 20.0 + BANNER_MS }).unwrap();
        assert!(s.presenter().message.is_none());
    }

    #[test]
    fn test_loss_message_stays() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::Frame { now_ms: 0.0 }).unwrap();
        s.state.time_remaining = 0.001;
        s.handle(Command::Frame { now_ms: 20.0 }).unwrap();

        assert_eq!(s.snapshot().outcome, Outcome::Lose);
        assert_eq!(s.presenter().message.as_deref(), Some("TIME'S UP!"));
        assert_eq!(s.presenter().message_color, Some(colors::LOSE));

        s.handle(Command::Frame { now_ms: 60_000.0 }).unwrap();
        assert_eq!(s.presenter().message.as_deref(), Some("TIME'S UP!"));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut s = session();
        s.start_level_one();
        s.handle(Command::KeyDown {
            key: Key::Left,
            repeat: false,
        })
        .unwrap();

        s.shutdown();
        s.shutdown();
        assert!(s.is_shut_down());
        assert!(!s.state().input.is_held(Key::Left));

        let before = s.presenter().presents;
        s.handle(Command::Frame { now_ms: 100.0 }).unwrap();
        s.handle(Command::KeyDown {
            key: Key::Fire,
            repeat: false,
        })
        .unwrap();
        assert_eq!(s.presenter().presents, before);
        assert_eq!(s.snapshot().bullets_remaining, 10);
    }
}
