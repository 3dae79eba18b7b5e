//! Asteroid Boss - a two-level browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, level flow)
//! - `session`: Session controls, input routing and the fixed-step driver
//! - `renderer`: Render collaborator trait and the WebGPU implementation
//! - `settings`: Player preferences persisted in LocalStorage
//! - `audio`: Procedural sound effects (Web Audio on wasm)

pub mod audio;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Command, Key, Session};
pub use settings::Settings;

/// Game configuration constants
///
/// Screen space: origin top-left, y grows downward. Speeds are per tick.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, ~16ms)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = 550.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_STEP: f32 = 5.0;
    pub const PLAYER_LEFT_MARGIN: f32 = 20.0;
    pub const PLAYER_RIGHT_MARGIN: f32 = FIELD_WIDTH - 20.0;

    /// Player bullets travel up
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 10.0;
    /// Spawn distance above the ship's center
    pub const BULLET_SPAWN_OFFSET: f32 = 20.0;

    /// Asteroids spawn inside the upper third of the field
    pub const ASTEROID_SIZE: f32 = 40.0;
    pub const ASTEROID_MIN_X: f32 = 50.0;
    pub const ASTEROID_MAX_X: f32 = FIELD_WIDTH - 50.0;
    pub const ASTEROID_MIN_Y: f32 = 50.0;
    pub const ASTEROID_MAX_Y: f32 = FIELD_HEIGHT / 3.0;

    /// Boss
    pub const BOSS_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const BOSS_START_Y: f32 = 100.0;
    pub const BOSS_WIDTH: f32 = 120.0;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_SPEED: f32 = 2.0;
    pub const BOSS_LEFT_MARGIN: f32 = 60.0;
    pub const BOSS_RIGHT_MARGIN: f32 = FIELD_WIDTH - 60.0;
    /// Manhattan distance gate before the full ship-vs-boss box test
    pub const BOSS_RAM_GATE: f32 = 50.0;

    /// Boss bullets travel down, spawned below the boss's center
    pub const BOSS_BULLET_WIDTH: f32 = 10.0;
    pub const BOSS_BULLET_HEIGHT: f32 = 20.0;
    pub const BOSS_BULLET_SPEED: f32 = 5.0;
    pub const BOSS_BULLET_OFFSET: f32 = 30.0;

    /// Per-level budget defaults (see `sim::Tuning`)
    pub const LEVEL_TIME_SECS: f32 = 60.0;
    pub const BULLETS_PER_LEVEL: u32 = 10;
    pub const ASTEROID_COUNT: usize = 5;
    pub const BOSS_MAX_HP: u32 = 4;
    pub const BOSS_FIRE_INTERVAL_MS: f64 = 2000.0;
    pub const BOSS_PHASE_MS: f64 = 3000.0;
}
