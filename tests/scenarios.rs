//! Whole-run scenarios driven through the public API

use asteroid_boss::consts::SIM_DT;
use asteroid_boss::renderer::{Presenter, RenderError};
use asteroid_boss::sim::{
    Boss, Entity, GameEvent, GameState, LoseReason, Outcome, Tuning, tick,
};
use asteroid_boss::{Command, Key, Session};
use glam::Vec2;

/// Fire straight up at the first remaining asteroid and wait for the bullet
fn shoot_first_asteroid(state: &mut GameState) {
    let target = state.asteroids[0].pos.x;
    state.player.as_mut().unwrap().pos.x = target;
    assert!(state.fire());
    for _ in 0..200 {
        tick(state, SIM_DT);
        if state.bullets.is_empty() || state.outcome != Outcome::LevelOne {
            return;
        }
    }
    panic!("bullet never resolved");
}

#[test]
fn clearing_the_field_starts_the_boss_fight() {
    let mut state = GameState::with_seed(42);
    state.start_level_one();
    assert_eq!(state.asteroids.len(), 5);

    let mut shots = 0;
    while state.outcome == Outcome::LevelOne {
        let before = state.asteroids.len();
        shoot_first_asteroid(&mut state);
        shots += 1;
        if state.outcome == Outcome::LevelOne {
            assert_eq!(state.asteroids.len(), before - 1);
        }
    }

    assert_eq!(shots, 5);
    assert_eq!(state.outcome, Outcome::LevelTwo);
    let events = state.drain_events();
    let destroyed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 5);
    assert!(events.contains(&GameEvent::LevelCleared));

    let boss = state.boss.as_ref().unwrap();
    assert_eq!((boss.hp, boss.max_hp), (4, 4));
    assert_eq!(state.bullets_remaining, 10);
    assert_eq!(state.time_remaining, 60.0);
    assert!(state.asteroids.is_empty());
}

#[test]
fn boss_fires_exactly_on_the_interval() {
    let mut state = GameState::with_seed(1);
    state.start_level_two();

    // 1/64 s is exact in binary, so 128 ticks land on 2000 ms
    let dt = 1.0 / 64.0;
    for _ in 0..127 {
        tick(&mut state, dt);
    }
    assert!(state.boss_bullets.is_empty());

    tick(&mut state, dt);
    assert_eq!(state.clock_ms, 2000.0);
    assert_eq!(state.boss_bullets.len(), 1);
    let boss = state.boss.as_ref().unwrap();
    assert_eq!(state.boss_bullets[0].pos, boss.body.pos + Vec2::new(0.0, 30.0));
    assert_eq!(boss.last_shot_ms, 2000.0);
}

#[test]
fn time_running_out_beats_a_clearing_shot() {
    let mut state = GameState::with_seed(2);
    state.start_level_one();
    state.asteroids = vec![Entity::asteroid(Vec2::new(400.0, 300.0))];
    // Overlaps the asteroid after one step
    state.bullets = vec![Entity::player_bullet(Vec2::new(400.0, 345.0))];
    state.time_remaining = SIM_DT * 0.5;

    tick(&mut state, SIM_DT);

    assert_eq!(state.outcome, Outcome::Lose);
    assert_eq!(state.asteroids.len(), 1);
    assert_eq!(state.drain_events(), vec![GameEvent::Lost(LoseReason::TimeUp)]);
}

#[test]
fn last_bullet_clearing_the_field_is_not_a_loss() {
    let mut state = GameState::with_seed(2);
    state.start_level_one();
    state.asteroids = vec![Entity::asteroid(Vec2::new(400.0, 300.0))];
    state.bullets = vec![Entity::player_bullet(Vec2::new(400.0, 345.0))];
    state.bullets_remaining = 0;

    tick(&mut state, SIM_DT);

    assert_eq!(state.outcome, Outcome::LevelTwo);
    assert_eq!(state.bullets_remaining, 10);
}

#[test]
fn final_hit_on_the_boss_wins() {
    let mut state = GameState::with_seed(3);
    state.start_level_two();
    state.boss.as_mut().unwrap().hp = 1;
    state.bullets = vec![Entity::new(Vec2::new(400.0, 150.0), Vec2::new(5.0, 15.0))
        .with_velocity(Vec2::new(0.0, -10.0))];

    tick(&mut state, SIM_DT);

    assert_eq!(state.outcome, Outcome::Win);
    assert!(state.boss.is_none());
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::BossHit { hp: 0 }));
    assert_eq!(events.last(), Some(&GameEvent::Won));

    // Nothing moves once the run is over
    let clock = state.clock_ms;
    tick(&mut state, SIM_DT);
    assert_eq!(state.clock_ms, clock);
}

#[test]
fn malformed_tuning_is_rejected() {
    assert!(Tuning::from_json(r#"{ "bullets_per_level": 0 }"#).is_err());
    assert!(Tuning::from_json("{").is_err());
    let tuning = Tuning::from_json(r#"{ "boss_max_hp": 2, "seed": 9 }"#).unwrap();
    assert_eq!(tuning.boss_max_hp, 2);
    assert_eq!(tuning.bullets_per_level, 10);
}

#[derive(Default)]
struct Screen {
    message: Option<String>,
    presented: usize,
}

impl Presenter for Screen {
    fn clear(&mut self) {}
    fn draw_player(&mut self, _: &Entity) {}
    fn draw_bullet(&mut self, _: &Entity) {}
    fn draw_asteroid(&mut self, _: &Entity) {}
    fn draw_boss(&mut self, _: &Boss) {}
    fn draw_boss_bullet(&mut self, _: &Entity) {}
    fn show_message(&mut self, text: &str, _: [f32; 4]) {
        self.message = Some(text.to_string());
    }
    fn hide_message(&mut self) {
        self.message = None;
    }
    fn present(&mut self) -> Result<(), RenderError> {
        self.presented += 1;
        Ok(())
    }
}

#[test]
fn idle_session_times_out_and_restarts_to_menu() {
    let mut session = Session::new(Tuning::default().with_seed(5), Screen::default()).unwrap();
    session
        .handle(Command::KeyDown { key: Key::Confirm, repeat: false })
        .unwrap();
    assert_eq!(session.state().outcome, Outcome::LevelOne);
    assert_eq!(
        session.presenter().message.as_deref(),
        Some("LEVEL 1: CLEAR THE ASTEROIDS")
    );

    // 100 ms frames; the countdown follows the wall clock
    let mut now = 0.0;
    while !session.state().outcome.is_over() {
        now += 100.0;
        session.handle(Command::Frame { now_ms: now }).unwrap();
        assert!(now < 120_000.0, "timer never ran out");
    }

    assert!(now <= 60_200.0, "countdown lagged the wall clock: {}ms", now);
    assert_eq!(session.state().outcome, Outcome::Lose);
    assert_eq!(session.presenter().message.as_deref(), Some("TIME'S UP!"));
    assert_eq!(session.snapshot().time_remaining, 0);
    let events = session.drain_events();
    assert_eq!(events.last(), Some(&GameEvent::Lost(LoseReason::TimeUp)));

    session
        .handle(Command::KeyDown { key: Key::Confirm, repeat: false })
        .unwrap();
    assert_eq!(session.state().outcome, Outcome::Menu);
    assert_eq!(session.presenter().message, None);

    session.shutdown();
    session.shutdown();
    let presented = session.presenter().presented;
    session.handle(Command::Frame { now_ms: now + 100.0 }).unwrap();
    assert_eq!(session.presenter().presented, presented);
}
