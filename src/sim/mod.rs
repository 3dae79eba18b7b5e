//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `tick`'s `dt`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod tuning;

pub use collision::{boxes_overlap, collides, manhattan_distance, within_gate};
pub use state::{
    Boss, Direction, Entity, GameEvent, GameState, HudSnapshot, InputSet, Key, LoseReason, Outcome,
};
pub use tick::{elapse, tick};
pub use tuning::{ConfigError, Tuning};
