//! Level budget and boss timing parameters
//!
//! Defaults reproduce the two hard-coded levels. Values coming from outside
//! (JSON, tests) are validated before a `GameState` accepts them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("level timer must be a positive number of seconds, got {0}")]
    NonPositiveTimer(f32),
    #[error("each level needs at least one bullet")]
    NoBullets,
    #[error("level one needs at least one asteroid")]
    NoAsteroids,
    #[error("boss needs at least one hit point")]
    NoBossHp,
    #[error("boss {name} must be a positive duration in ms, got {value}")]
    NonPositiveInterval { name: &'static str, value: f64 },
    #[error("invalid tuning JSON: {0}")]
    Json(String),
}

/// Per-session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Countdown per level, seconds
    pub level_time_secs: f32,
    /// Bullets granted at the start of each level
    pub bullets_per_level: u32,
    /// Asteroids spawned in level one
    pub asteroid_count: usize,
    /// Boss starting hit points
    pub boss_max_hp: u32,
    /// Minimum gap between boss shots
    pub boss_fire_interval_ms: f64,
    /// Length of each stationary/moving boss phase
    pub boss_phase_ms: f64,
    /// Asteroid layout seed (None = caller picks, usually the wall clock)
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_time_secs: LEVEL_TIME_SECS,
            bullets_per_level: BULLETS_PER_LEVEL,
            asteroid_count: ASTEROID_COUNT,
            boss_max_hp: BOSS_MAX_HP,
            boss_fire_interval_ms: BOSS_FIRE_INTERVAL_MS,
            boss_phase_ms: BOSS_PHASE_MS,
            seed: None,
        }
    }
}

impl Tuning {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.level_time_secs.is_finite() || self.level_time_secs <= 0.0 {
            return Err(ConfigError::NonPositiveTimer(self.level_time_secs));
        }
        if self.bullets_per_level == 0 {
            return Err(ConfigError::NoBullets);
        }
        if self.asteroid_count == 0 {
            return Err(ConfigError::NoAsteroids);
        }
        if self.boss_max_hp == 0 {
            return Err(ConfigError::NoBossHp);
        }
        for (name, value) in [
            ("fire interval", self.boss_fire_interval_ms),
            ("phase length", self.boss_phase_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveInterval { name, value });
            }
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
