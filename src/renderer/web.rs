//! Browser presenter: WebGPU canvas plus a DOM overlay for messages

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use super::pipeline::SurfaceRecovery;
use super::vertex::colors;
use super::{FrameBatch, Presenter, RenderError, RenderState};
use crate::sim::{Boss, Entity};

pub struct WebPresenter {
    render: RenderState,
    batch: FrameBatch,
    canvas: HtmlCanvasElement,
    message: Option<HtmlElement>,
}

impl WebPresenter {
    /// Bind to the canvas and message overlay and bring up WebGPU
    pub async fn attach(canvas_id: &str, message_id: &str) -> Result<Self, RenderError> {
        let window = web_sys::window().ok_or(RenderError::NoWindow)?;
        let document = window.document().ok_or(RenderError::NoWindow)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| RenderError::NoCanvas(canvas_id.to_string()))?;

        let message = document
            .get_element_by_id(message_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if message.is_none() {
            log::warn!("No #{} element, messages will only be logged", message_id);
        }

        let (width, height) = fit_canvas(&window, &canvas);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render = RenderState::new(surface, &adapter, width, height).await?;

        Ok(Self {
            render,
            batch: FrameBatch::default(),
            canvas,
            message,
        })
    }

    /// Match the backing store to the canvas's CSS size
    pub fn resize_to_canvas(&mut self) {
        if let Some(window) = web_sys::window() {
            let (width, height) = fit_canvas(&window, &self.canvas);
            if (width, height) != self.render.size {
                self.render.resize(width, height);
            }
        }
    }
}

/// Size the canvas backing store for the device pixel ratio
fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let dpr = window.device_pixel_ratio();
    let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
    let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
    // Assigning the size clears the canvas, even to the same value
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
    (width, height)
}

impl Presenter for WebPresenter {
    fn clear(&mut self) {
        self.batch.clear();
    }

    fn draw_player(&mut self, ship: &Entity) {
        self.batch.player(ship);
    }

    fn draw_bullet(&mut self, bullet: &Entity) {
        self.batch.bullet(bullet);
    }

    fn draw_asteroid(&mut self, rock: &Entity) {
        self.batch.asteroid(rock);
    }

    fn draw_boss(&mut self, boss: &Boss) {
        self.batch.boss(boss);
    }

    fn draw_boss_bullet(&mut self, bullet: &Entity) {
        self.batch.boss_bullet(bullet);
    }

    fn show_message(&mut self, text: &str, color: [f32; 4]) {
        log::info!("Message: {}", text);
        if let Some(el) = &self.message {
            el.set_text_content(Some(text));
            let _ = el.style().set_property("color", &colors::css(color));
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_message(&mut self) {
        if let Some(el) = &self.message {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if let Err(e) = self.render.render(&self.batch.vertices) {
            match SurfaceRecovery::for_error(&e) {
                SurfaceRecovery::Reconfigure => {
                    log::warn!("Surface {:?}, reconfiguring", e);
                    let (w, h) = self.render.size;
                    self.render.resize(w, h);
                }
                SurfaceRecovery::SkipFrame => log::error!("Frame dropped: {:?}", e),
            }
        }
        Ok(())
    }
}
