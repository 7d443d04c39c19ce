//! Skyhop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use skyhop::Settings;
    use skyhop::renderer::{RenderState, scene};
    use skyhop::sim::{GameEvent, GameState, Playfield, autopilot, update};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Autopilot flies instead of the player
        idle_mode: bool,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, settings: &Settings, seed: u64) -> Self {
            let playfield = canvas_playfield(&canvas);
            Self {
                state: GameState::new(playfield, settings.tuning.clone(), seed),
                render_state: None,
                canvas,
                idle_mode: false,
            }
        }

        /// One clock tick
        fn tick(&mut self, now: f64) {
            if self.idle_mode && autopilot::should_jump(&self.state) {
                self.state.jump();
            }
            update(&mut self.state, now);
            self.present();
        }

        /// Tap/click/space: flap while alive, nothing otherwise
        fn tap(&mut self) {
            if self.state.game_over {
                return;
            }
            self.state.jump();
            self.present();
        }

        /// Restart from the game-over overlay
        fn restart(&mut self) {
            if !self.state.game_over {
                return;
            }
            self.state.set_playfield(canvas_playfield(&self.canvas));
            self.state.restart();
            self.present();
        }

        /// Track canvas size changes
        fn resize(&mut self) {
            let (width, height) = sync_canvas_size(&self.canvas);
            let playfield = canvas_playfield(&self.canvas);
            self.state.set_playfield(playfield);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, playfield);
            }
            self.present();
        }

        /// Read the state after a mutation and show it
        fn present(&mut self) {
            for event in self.state.drain_events() {
                log_event(&event);
            }
            self.render();
            self.update_hud();
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene::build(&self.state.snapshot());
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let playfield = render_state.playfield;
                        render_state.resize(w, h, playfield);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Jumped => log::trace!("Jump"),
            GameEvent::Scored { score } => log::debug!("Score: {}", score),
            GameEvent::Crashed { cause } => log::info!("Game over: {:?}", cause),
            GameEvent::Restarted { seed } => log::info!("Restarted with seed: {}", seed),
        }
    }

    /// Playfield in CSS pixels, matching pointer coordinates
    fn canvas_playfield(canvas: &HtmlCanvasElement) -> Playfield {
        Playfield::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Size the backing store to physical pixels; returns the new size
    fn sync_canvas_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    /// Monotonic clock in seconds
    fn now_seconds() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Skyhop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = sync_canvas_size(&canvas);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), &settings, seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let playfield = canvas_playfield(&canvas);
                        match RenderState::new(surface, &adapter, width, height, playfield).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone())?;
        setup_restart_button(game.clone())?;
        setup_resize_handler(game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }
        game.borrow_mut().present();

        start_clock(game, settings.tick_rate_hz)?;

        log::info!("Skyhop running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer covers mouse, pen and touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.idle_mode = false;
                g.tap();
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        g.idle_mode = false;
                        g.tap();
                    }
                    "Enter" => g.restart(),
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Fixed-rate timer delivering monotonic timestamps to the simulation
    fn start_clock(game: Rc<RefCell<Game>>, tick_rate_hz: u32) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let period_ms = (1000 / tick_rate_hz.max(1)) as i32;
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().tick(now_seconds());
        });
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Skyhop failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyhop::Settings;
    use skyhop::sim::{GameEvent, GameState, autopilot, update};

    env_logger::init();
    log::info!("Skyhop (native) starting...");
    log::info!("Native mode runs headless on autopilot - run with `trunk serve` to play");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{} ({}), using defaults", e, path);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let mut state = GameState::new(settings.playfield, settings.tuning.clone(), seed);
    log::info!("Game initialized with seed: {}", seed);

    let period = settings.tick_period();
    let ticks = (settings.run_seconds / period).round() as u64;
    let mut best = 0;
    let mut runs = 1;

    for frame in 1..=ticks {
        if state.game_over {
            best = best.max(state.score);
            runs += 1;
            state.restart();
        }
        if autopilot::should_jump(&state) {
            state.jump();
        }
        update(&mut state, frame as f64 * period);

        for event in state.drain_events() {
            match event {
                GameEvent::Jumped => log::trace!("Jump"),
                GameEvent::Scored { score } => log::debug!("Score: {}", score),
                GameEvent::Crashed { cause } => {
                    log::info!("Run {} over ({:?}) with score {}", runs, cause, state.score)
                }
                GameEvent::Restarted { seed } => log::info!("Run {} seed: {}", runs, seed),
            }
        }
    }
    best = best.max(state.score);
    log::info!("{} run(s) in {:.1}s, best score {}", runs, settings.run_seconds, best);

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
