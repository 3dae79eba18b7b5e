//! Rendering
//!
//! The simulation never draws. After each frame the session hands the state to
//! a `Presenter`, which only receives positions and messages and never reports
//! anything back. The WebGPU presenter batches procedurally generated shapes
//! into one vertex buffer per frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use thiserror::Error;

use crate::sim::{Boss, Entity, GameState};

/// Fatal render setup failures; the game cannot start without a surface
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser window or document unavailable")]
    NoWindow,
    #[error("canvas element #{0} not found")]
    NoCanvas(String),
    #[error("failed to create drawing surface: {0}")]
    Surface(String),
    #[error("no compatible GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
}

/// Output sink for everything visible
pub trait Presenter {
    /// Start a new frame, forgetting everything drawn before
    fn clear(&mut self);
    fn draw_player(&mut self, ship: &Entity);
    fn draw_bullet(&mut self, bullet: &Entity);
    fn draw_asteroid(&mut self, rock: &Entity);
    fn draw_boss(&mut self, boss: &Boss);
    fn draw_boss_bullet(&mut self, bullet: &Entity);
    /// Show a transient message over the field
    fn show_message(&mut self, text: &str, color: [f32; 4]);
    fn hide_message(&mut self);
    /// Flush the frame to the screen
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Draw every live entity of `state`
pub fn draw_scene<P: Presenter + ?Sized>(presenter: &mut P, state: &GameState) {
    presenter.clear();
    for rock in &state.asteroids {
        presenter.draw_asteroid(rock);
    }
    if let Some(boss) = &state.boss {
        presenter.draw_boss(boss);
    }
    for bullet in &state.bullets {
        presenter.draw_bullet(bullet);
    }
    for shot in &state.boss_bullets {
        presenter.draw_boss_bullet(shot);
    }
    if let Some(ship) = &state.player {
        presenter.draw_player(ship);
    }
}

/// Accumulates one frame of triangles
#[derive(Debug, Default)]
pub struct FrameBatch {
    pub vertices: Vec<Vertex>,
}

impl FrameBatch {
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn player(&mut self, ship: &Entity) {
        self.vertices.extend(shapes::ship(ship));
    }

    pub fn bullet(&mut self, bullet: &Entity) {
        self.vertices.extend(shapes::bullet(bullet));
    }

    pub fn asteroid(&mut self, rock: &Entity) {
        self.vertices.extend(shapes::asteroid(rock));
    }

    pub fn boss(&mut self, boss: &Boss) {
        self.vertices.extend(shapes::boss(boss));
    }

    pub fn boss_bullet(&mut self, bullet: &Entity) {
        self.vertices.extend(shapes::boss_bullet(bullet));
    }
}
