//! Asteroid Boss entry point
//!
//! The browser build wires DOM events and `requestAnimationFrame` into a
//! `Session`. The native build runs a headless autoplay demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Event, EventTarget, HtmlElement, KeyboardEvent};

    use asteroid_boss::audio::AudioManager;
    use asteroid_boss::renderer::web::WebPresenter;
    use asteroid_boss::sim::{Outcome, Tuning};
    use asteroid_boss::{Command, Key, Session, Settings};

    thread_local! {
        static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
    }

    /// Everything the frame loop and the listeners share
    struct Game {
        session: Session<WebPresenter>,
        settings: Settings,
        audio: AudioManager,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: Session<WebPresenter>, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                session,
                settings,
                audio,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample is the one about to be overwritten
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn play_events(&mut self) {
            for event in self.session.drain_events() {
                log::debug!("{:?}", event);
                self.audio.play_event(&event);
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            self.audio.apply(&self.settings);
            log::info!("Sound {}", if muted { "muted" } else { "on" });
        }

        fn toggle_fps(&mut self) {
            self.settings.show_fps = !self.settings.show_fps;
            self.settings.save();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.session.snapshot();

            set_text(document, "#hud-bullets .hud-value", &hud.bullets_remaining.to_string());
            set_text(document, "#hud-time .hud-value", &hud.time_remaining.to_string());
            let level = hud
                .outcome
                .level_number()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            set_text(document, "#hud-level .hud-value", &level);

            set_visible(document, "hud-boss", hud.boss_hp.is_some());
            if let Some(hp) = hud.boss_hp {
                set_text(document, "#hud-boss .hud-value", &format!("{}/{}", hp, hud.boss_max_hp));
                if let Some(fill) = element(document, "hud-boss-fill") {
                    let pct = hp as f32 / hud.boss_max_hp.max(1) as f32 * 100.0;
                    let _ = fill.style().set_property("width", &format!("{:.0}%", pct));
                }
            }

            set_visible(document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            }

            set_visible(document, "menu", hud.outcome == Outcome::Menu);
            set_visible(document, "game-over", hud.outcome.is_over());
        }
    }

    /// A registered DOM listener, kept so teardown can detach it
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    struct App {
        game: RefCell<Game>,
        listeners: RefCell<Vec<Listener>>,
        raf_id: Cell<Option<i32>>,
        stopped: Cell<bool>,
    }

    impl App {
        fn listen(
            self: &Rc<Self>,
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            if let Err(e) =
                target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            {
                log::warn!("Failed to listen for {}: {:?}", kind, e);
                return;
            }
            self.listeners.borrow_mut().push(Listener {
                target: target.clone(),
                kind,
                closure,
            });
        }

        fn key_down(&self, event: &KeyboardEvent) {
            let raw = event.key();
            // Keep arrows and space from scrolling the page
            if matches!(raw.as_str(), "ArrowLeft" | "ArrowRight" | " ") {
                event.prevent_default();
            }

            let Ok(mut game) = self.game.try_borrow_mut() else {
                return;
            };
            game.audio.resume();
            let repeat = event.repeat();

            match Key::from_dom(&raw) {
                Some(Key::Mute) => {
                    if !repeat {
                        game.toggle_mute();
                    }
                }
                Some(key) => {
                    if let Err(e) = game.session.handle(Command::KeyDown { key, repeat }) {
                        log::error!("Key handling failed: {}", e);
                    }
                    game.play_events();
                }
                None if !repeat && (raw == "f" || raw == "F") => game.toggle_fps(),
                None => {}
            }
        }

        fn key_up(&self, event: &KeyboardEvent) {
            let Some(key) = Key::from_dom(&event.key()) else {
                return;
            };
            if let Ok(mut game) = self.game.try_borrow_mut() {
                let _ = game.session.handle(Command::KeyUp { key });
            }
        }

        fn request_frame(self: &Rc<Self>) {
            if self.stopped.get() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let app = self.clone();
            let closure = Closure::once(move |time: f64| app.frame(time));
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(id) => self.raf_id.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            closure.forget();
        }

        fn frame(self: &Rc<Self>, time: f64) {
            self.raf_id.set(None);
            if self.stopped.get() {
                return;
            }

            let fatal = {
                let mut game = self.game.borrow_mut();
                game.track_fps(time);
                game.session.presenter_mut().resize_to_canvas();
                let result = game.session.handle(Command::Frame { now_ms: time });
                game.play_events();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    game.update_hud(&document);
                }
                result.err()
            };

            if let Some(e) = fatal {
                log::error!("Rendering stopped: {}", e);
                show_fatal(&format!("Rendering stopped: {}", e));
                self.teardown();
                return;
            }

            self.request_frame();
        }

        /// Stop the loop and detach every listener; safe to repeat
        fn teardown(&self) {
            if self.stopped.replace(true) {
                return;
            }

            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }

            for listener in self.listeners.borrow_mut().drain(..) {
                let _ = listener.target.remove_event_listener_with_callback(
                    listener.kind,
                    listener.closure.as_ref().unchecked_ref(),
                );
                // The listener running this teardown may be one of these
                listener.closure.forget();
            }

            if let Ok(mut game) = self.game.try_borrow_mut() {
                game.session.shutdown();
                game.audio.close();
            }
            log::info!("Asteroid Boss stopped");
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Startup or render failure the player needs to see
    fn show_fatal(text: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        set_visible(&document, "loading", false);
        if let Some(el) = element(&document, "message") {
            el.set_text_content(Some(text));
            let _ = el.style().set_property("color", "rgb(255, 77, 77)");
            let _ = el.set_attribute("class", "");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Asteroid Boss starting...");

        let presenter = match WebPresenter::attach("canvas", "message").await {
            Ok(presenter) => presenter,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                show_fatal(&format!("Cannot start: {}", e));
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::default().with_seed(seed);
        let session = match Session::new(tuning, presenter) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                show_fatal(&format!("Cannot start: {}", e));
                return;
            }
        };
        log::info!("Session created with seed: {}", seed);

        let app = Rc::new(App {
            game: RefCell::new(Game::new(session, Settings::load())),
            listeners: RefCell::new(Vec::new()),
            raf_id: Cell::new(None),
            stopped: Cell::new(false),
        });
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        let Some(window) = web_sys::window() else {
            return;
        };

        setup_input_handlers(&app, &window);
        if let Some(document) = window.document() {
            setup_buttons(&app, &document);
            set_visible(&document, "loading", false);
            set_visible(&document, "hud", true);
        }

        app.request_frame();

        log::info!("Asteroid Boss running!");
    }

    fn setup_input_handlers(app: &Rc<App>, window: &web_sys::Window) {
        let target: &EventTarget = window.as_ref();

        {
            let handler_app = app.clone();
            app.listen(target, "keydown", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    handler_app.key_down(event);
                }
            });
        }

        {
            let handler_app = app.clone();
            app.listen(target, "keyup", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    handler_app.key_up(event);
                }
            });
        }

        // Leaving the page ends the session
        {
            let handler_app = app.clone();
            app.listen(target, "pagehide", move |_event: Event| {
                handler_app.teardown();
            });
        }
    }

    fn setup_buttons(app: &Rc<App>, document: &Document) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let handler_app = app.clone();
            app.listen(btn.as_ref(), "click", move |_event: Event| {
                if let Ok(mut game) = handler_app.game.try_borrow_mut() {
                    game.audio.resume();
                    if game.session.state().outcome == Outcome::Menu {
                        game.session.start_level_one();
                    }
                }
            });
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let handler_app = app.clone();
            app.listen(btn.as_ref(), "click", move |_event: Event| {
                if let Ok(mut game) = handler_app.game.try_borrow_mut() {
                    game.session.restart();
                }
            });
        }
    }

    /// Tear down the running game, if any
    pub fn shutdown() {
        let app = APP.with(|slot| slot.borrow_mut().take());
        if let Some(app) = app {
            app.teardown();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Stop the game and release its listeners (callable from page scripts)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    wasm_game::shutdown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use asteroid_boss::consts::SIM_DT;
    use asteroid_boss::renderer::{Presenter, RenderError};
    use asteroid_boss::sim::{Boss, Entity, GameState, Outcome};
    use asteroid_boss::{Command, Key, Session};

    /// Presenter that only logs messages and counts frames
    #[derive(Default)]
    pub struct LogPresenter {
        pub frames: u64,
    }

    impl Presenter for LogPresenter {
        fn clear(&mut self) {}
        fn draw_player(&mut self, _: &Entity) {}
        fn draw_bullet(&mut self, _: &Entity) {}
        fn draw_asteroid(&mut self, _: &Entity) {}
        fn draw_boss(&mut self, _: &Boss) {}
        fn draw_boss_bullet(&mut self, _: &Entity) {}

        fn show_message(&mut self, text: &str, _: [f32; 4]) {
            log::info!("[frame {}] {}", self.frames, text);
        }

        fn hide_message(&mut self) {}

        fn present(&mut self) -> Result<(), RenderError> {
            self.frames += 1;
            Ok(())
        }
    }

    /// Steering decision for one frame
    fn steer(state: &GameState) -> (Option<Key>, bool) {
        let Some(ship) = &state.player else {
            return (None, false);
        };
        let target = match state.outcome {
            Outcome::LevelOne => state.asteroids.first().map(|a| a.pos.x),
            Outcome::LevelTwo => state.boss.as_ref().map(|b| b.body.pos.x),
            _ => None,
        };
        let Some(target) = target else {
            return (None, false);
        };

        let dx = target - ship.pos.x;
        let key = if dx < -5.0 {
            Some(Key::Left)
        } else if dx > 5.0 {
            Some(Key::Right)
        } else {
            None
        };
        let fire = key.is_none() && state.bullets.is_empty();
        (key, fire)
    }

    /// Play one run to completion and return how it ended
    pub fn run(session: &mut Session<LogPresenter>) -> Result<Outcome, RenderError> {
        const MAX_FRAMES: u32 = 60 * 120;
        let frame_ms = SIM_DT as f64 * 1000.0;

        session.handle(Command::KeyDown { key: Key::Confirm, repeat: false })?;

        let mut held: Option<Key> = None;
        let mut now_ms = 0.0;
        for _ in 0..MAX_FRAMES {
            let (want, fire) = steer(session.state());
            if want != held {
                if let Some(key) = held {
                    session.handle(Command::KeyUp { key })?;
                }
                if let Some(key) = want {
                    session.handle(Command::KeyDown { key, repeat: false })?;
                }
                held = want;
            }
            if fire {
                session.handle(Command::KeyDown { key: Key::Fire, repeat: false })?;
                session.handle(Command::KeyUp { key: Key::Fire })?;
            }

            now_ms += frame_ms;
            session.handle(Command::Frame { now_ms })?;
            for event in session.drain_events() {
                log::debug!("{:?}", event);
            }

            if session.state().outcome.is_over() {
                break;
            }
        }

        Ok(session.state().outcome)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use asteroid_boss::Session;
    use asteroid_boss::sim::Tuning;
    use std::process::ExitCode;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Asteroid Boss (native) starting headless autoplay...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Bad tuning file {}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => Tuning::default(),
    };

    let mut session = match Session::new(tuning, autoplay::LogPresenter::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match autoplay::run(&mut session) {
        Ok(outcome) => {
            let hud = session.snapshot();
            log::info!(
                "Finished as {:?} after {} frames ({} bullets, {}s left)",
                outcome,
                session.presenter().frames,
                hud.bullets_remaining,
                hud.time_remaining
            );
            session.shutdown();
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Autoplay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
