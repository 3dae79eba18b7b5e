//! Game state and core simulation types
//!
//! One `GameState` owns every live entity, the per-level budget and the input
//! flags. Level starts rebuild all entity collections in place.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tuning::{ConfigError, Tuning};
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Title screen, nothing live
    Menu,
    /// Asteroid field
    LevelOne,
    /// Boss fight
    LevelTwo,
    /// Boss destroyed
    Win,
    /// Run ended
    Lose,
}

impl Outcome {
    /// Whether the frame updater does anything in this phase
    pub fn is_playing(self) -> bool {
        matches!(self, Outcome::LevelOne | Outcome::LevelTwo)
    }

    pub fn is_over(self) -> bool {
        matches!(self, Outcome::Win | Outcome::Lose)
    }

    /// 1-based level number for the HUD
    pub fn level_number(self) -> Option<u32> {
        match self {
            Outcome::LevelOne => Some(1),
            Outcome::LevelTwo => Some(2),
            _ => None,
        }
    }
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoseReason {
    /// Countdown hit zero
    TimeUp,
    /// No bullets left and none in flight
    OutOfAmmo,
    /// Boss bullet hit the ship
    ShotDown,
    /// Ship touched the boss
    Rammed,
}

impl LoseReason {
    pub fn message(self) -> &'static str {
        match self {
            LoseReason::TimeUp => "TIME'S UP!",
            LoseReason::OutOfAmmo => "OUT OF AMMO!",
            LoseReason::ShotDown => "SHOT DOWN!",
            LoseReason::Rammed => "CRASHED INTO THE BOSS!",
        }
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerFired,
    AsteroidDestroyed { pos: Vec2 },
    /// A boss bullet and a player bullet cancelled each other
    BulletsCancelled,
    BossFired,
    BossHit { hp: u32 },
    /// Level one cleared, boss fight starting
    LevelCleared,
    Won,
    Lost(LoseReason),
}

/// A positioned, sized game object
///
/// `pos` is the center; the bounding box extends `size / 2` each way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-tick displacement (zero for things that don't drift)
    pub vel: Vec2,
}

impl Entity {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Apply one tick of linear motion
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    /// Player ship at the bottom-center spawn point
    pub fn player() -> Self {
        Self::new(
            Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }

    /// Player bullet fired from `origin` (the ship's center)
    pub fn player_bullet(origin: Vec2) -> Self {
        Self::new(
            origin - Vec2::new(0.0, BULLET_SPAWN_OFFSET),
            Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        )
        .with_velocity(Vec2::new(0.0, -BULLET_SPEED))
    }

    pub fn asteroid(pos: Vec2) -> Self {
        Self::new(pos, Vec2::splat(ASTEROID_SIZE))
    }

    /// Boss bullet fired from `origin` (the boss's center)
    pub fn boss_bullet(origin: Vec2) -> Self {
        Self::new(
            origin + Vec2::new(0.0, BOSS_BULLET_OFFSET),
            Vec2::new(BOSS_BULLET_WIDTH, BOSS_BULLET_HEIGHT),
        )
        .with_velocity(Vec2::new(0.0, BOSS_BULLET_SPEED))
    }
}

/// Horizontal travel direction of the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The level two boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub body: Entity,
    pub hp: u32,
    pub max_hp: u32,
    /// Sim clock (ms) of the last shot; level start counts as a shot
    pub last_shot_ms: f64,
    pub direction: Direction,
    /// Sim clock (ms) the movement pattern is measured from
    pub phase_start_ms: f64,
}

impl Boss {
    pub fn new(max_hp: u32, now_ms: f64) -> Self {
        Self {
            body: Entity::new(
                Vec2::new(BOSS_START_X, BOSS_START_Y),
                Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            ),
            hp: max_hp,
            max_hp,
            last_shot_ms: now_ms,
            direction: Direction::Right,
            phase_start_ms: now_ms,
        }
    }

    /// Moving during odd phase buckets, stationary during even ones
    pub fn is_moving(&self, now_ms: f64, phase_ms: f64) -> bool {
        let bucket = ((now_ms - self.phase_start_ms) / phase_ms).floor() as i64;
        bucket.rem_euclid(2) == 1
    }

    pub fn ready_to_fire(&self, now_ms: f64, interval_ms: f64) -> bool {
        now_ms - self.last_shot_ms >= interval_ms
    }
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Fire,
    /// Enter: start from the menu, restart from an end screen
    Confirm,
    Mute,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Fire),
            "Enter" => Some(Key::Confirm),
            "m" | "M" => Some(Key::Mute),
            _ => None,
        }
    }
}

/// Which keys are currently held
#[derive(Debug, Clone, Default)]
pub struct InputSet {
    held: HashMap<Key, bool>,
}

impl InputSet {
    pub fn set(&mut self, key: Key, down: bool) {
        self.held.insert(key, down);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

/// Read-only view for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub bullets_remaining: u32,
    /// Whole seconds, rounded up
    pub time_remaining: u32,
    pub outcome: Outcome,
    pub boss_hp: Option<u32>,
    pub boss_max_hp: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub outcome: Outcome,
    /// None while in the menu or after a wholesale reset
    pub player: Option<Entity>,
    pub bullets: Vec<Entity>,
    pub asteroids: Vec<Entity>,
    pub boss: Option<Boss>,
    pub boss_bullets: Vec<Entity>,
    pub bullets_remaining: u32,
    /// Seconds left on the level countdown
    pub time_remaining: f32,
    /// Simulation clock, advanced by each tick's delta
    pub clock_ms: f64,
    pub input: InputSet,
    /// Pending events for the session (cleared on drain)
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a state in the menu, rejecting malformed tuning
    ///
    /// Without a tuning seed the asteroid layout uses seed 0; callers that want
    /// variety pass one via `Tuning::with_seed`.
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::from_valid(tuning))
    }

    /// Default tuning with a fixed layout seed
    pub fn with_seed(seed: u64) -> Self {
        Self::from_valid(Tuning::default().with_seed(seed))
    }

    fn from_valid(tuning: Tuning) -> Self {
        let seed = tuning.seed.unwrap_or(0);
        Self {
            outcome: Outcome::Menu,
            player: None,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            boss: None,
            boss_bullets: Vec::new(),
            bullets_remaining: tuning.bullets_per_level,
            time_remaining: tuning.level_time_secs,
            clock_ms: 0.0,
            input: InputSet::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    fn clear_entities(&mut self) {
        self.player = None;
        self.bullets.clear();
        self.asteroids.clear();
        self.boss = None;
        self.boss_bullets.clear();
    }

    fn reset_budget(&mut self) {
        self.bullets_remaining = self.tuning.bullets_per_level;
        self.time_remaining = self.tuning.level_time_secs;
    }

    /// Spawn the asteroid field and a fresh ship
    pub fn start_level_one(&mut self) {
        self.clear_entities();
        self.player = Some(Entity::player());
        for _ in 0..self.tuning.asteroid_count {
            let x = self.rng.random_range(ASTEROID_MIN_X..ASTEROID_MAX_X);
            let y = self.rng.random_range(ASTEROID_MIN_Y..ASTEROID_MAX_Y);
            self.asteroids.push(Entity::asteroid(Vec2::new(x, y)));
        }
        self.reset_budget();
        self.outcome = Outcome::LevelOne;
        log::info!(
            "Level 1 started: {} asteroids, {} bullets, {:.0}s",
            self.asteroids.len(),
            self.bullets_remaining,
            self.time_remaining
        );
    }

    /// Spawn the boss and a fresh ship
    pub fn start_level_two(&mut self) {
        self.clear_entities();
        self.player = Some(Entity::player());
        self.boss = Some(Boss::new(self.tuning.boss_max_hp, self.clock_ms));
        self.reset_budget();
        self.outcome = Outcome::LevelTwo;
        log::info!(
            "Level 2 started: boss at {} hp, {} bullets, {:.0}s",
            self.tuning.boss_max_hp,
            self.bullets_remaining,
            self.time_remaining
        );
    }

    /// Back to the menu with nothing live
    pub fn reset(&mut self) {
        self.clear_entities();
        self.reset_budget();
        self.events.clear();
        self.outcome = Outcome::Menu;
    }

    /// Fire one bullet from the ship
    ///
    /// Returns false (and changes nothing) outside a level, without a ship, or
    /// with no bullets left.
    pub fn fire(&mut self) -> bool {
        if !self.outcome.is_playing() || self.bullets_remaining == 0 {
            return false;
        }
        let Some(player) = self.player else {
            return false;
        };
        self.bullets.push(Entity::player_bullet(player.pos));
        self.bullets_remaining -= 1;
        self.events.push(GameEvent::PlayerFired);
        true
    }

    /// Force the run to end as a loss
    pub fn lose(&mut self, reason: LoseReason) {
        self.outcome = Outcome::Lose;
        self.events.push(GameEvent::Lost(reason));
        log::info!("Run lost: {:?}", reason);
    }

    pub fn win(&mut self) {
        self.outcome = Outcome::Win;
        self.events.push(GameEvent::Won);
        log::info!("Boss defeated");
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            bullets_remaining: self.bullets_remaining,
            time_remaining: self.time_remaining.max(0.0).ceil() as u32,
            outcome: self.outcome,
            boss_hp: self.boss.as_ref().map(|b| b.hp),
            boss_max_hp: self.tuning.boss_max_hp,
        }
    }
}
