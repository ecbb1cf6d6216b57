//! Pear Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use pear_snake::consts::*;
    use pear_snake::palette::ColorTimer;
    use pear_snake::platform::{self, LocalStore};
    use pear_snake::renderer::{RenderState, Scene};
    use pear_snake::sim::{GameEvent, GameState, TickInput, tick};
    use pear_snake::{BestScore, Leaderboard, Records, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        scene: Scene,
        render_state: Option<RenderState>,
        store: LocalStore,
        records: Records,
        color_timer: ColorTimer,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Leaderboard list needs re-rendering
        board_dirty: bool,
    }

    impl Game {
        fn new(seed: u64, store: LocalStore) -> Self {
            let tuning = Tuning::load(&store);
            let settings = Settings::load(&store);
            let best = BestScore::load(&store);
            let records = Records::load(&store);
            let mut color_timer = ColorTimer::new(tuning.color_period_ms);
            color_timer.restart(platform::now_ms());

            Self {
                state: GameState::new(seed, tuning).with_best_score(best.0),
                settings,
                scene: Scene::new(),
                render_state: None,
                store,
                records,
                color_timer,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                board_dirty: true,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, now_ms: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.steer_to = None;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog instead of spiralling
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            let events: Vec<GameEvent> = self.state.drain_events().collect();
            for event in events {
                self.handle_event(event, now_ms);
            }

            if self.color_timer.poll(now_ms) {
                self.state.recolor(now_ms, self.settings.color_mode);
            }
        }

        fn handle_event(&mut self, event: GameEvent, now_ms: f64) {
            match event {
                GameEvent::FoodEaten { .. } => self.color_timer.restart(now_ms),
                GameEvent::HazardScheduled { delay_ticks } => {
                    log::debug!("Hazard due in {} ticks", delay_ticks)
                }
                GameEvent::HazardSpawned { total } => log::debug!("{} hazards on the field", total),
                GameEvent::GameOver { score, new_best } => {
                    self.color_timer.restart(now_ms);
                    let best = self.state.best_score;
                    let ask_name = self.settings.ask_name;
                    if self
                        .records
                        .game_over(&mut self.store, score, best, new_best, ask_name)
                    {
                        show_name_entry(self.records.prompt.pending());
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = self.scene.build(&self.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", self.state.score)));
            }
            if let Some(el) = document.get_element_by_id("best-score") {
                el.set_text_content(Some(&format!("Best: {}", self.state.best_score)));
            }

            if self.board_dirty {
                self.board_dirty = false;
                if let Err(e) = render_leaderboard(document, &self.records.leaderboard) {
                    log::warn!("Leaderboard render failed: {:?}", e);
                }
            }
        }

        /// Apply a settings hotkey; returns false for keys it does not know
        fn toggle_setting(&mut self, key: &str) -> bool {
            let settings = &mut self.settings;
            match key {
                "c" | "C" => {
                    settings.color_mode = settings.color_mode.toggled();
                    log::info!("Color mode: {}", settings.color_mode.as_str());
                }
                "g" | "G" => settings.grass = !settings.grass,
                "h" | "H" => settings.hex_segments = !settings.hex_segments,
                "p" | "P" => settings.pear_head = !settings.pear_head,
                "n" | "N" => settings.ask_name = !settings.ask_name,
                _ => return false,
            }
            if let Err(e) = self.settings.save(&mut self.store) {
                log::warn!("Could not save settings: {}", e);
            }
            true
        }

        /// Resolve the open name request
        fn finish_name_entry(&mut self, name: Option<String>) {
            match name {
                Some(name) => {
                    if self.records.submit_name(&mut self.store, &name).is_some() {
                        self.board_dirty = true;
                    }
                }
                None => self.records.skip_name(),
            }
            show_name_entry(None);
        }
    }

    /// Show the name form for `score`, or hide it
    fn show_name_entry(score: Option<u64>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(form) = document.get_element_by_id("name-entry") else {
            return;
        };
        match score {
            Some(score) => {
                if let Some(label) = document.get_element_by_id("name-score") {
                    label.set_text_content(Some(&score.to_string()));
                }
                let _ = form.set_attribute("class", "");
                if let Some(input) = name_input(&document) {
                    let _ = input.focus();
                }
            }
            None => {
                let _ = form.set_attribute("class", "hidden");
                if let Some(input) = name_input(&document) {
                    input.set_value("");
                }
            }
        }
    }

    fn name_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    fn render_leaderboard(document: &Document, board: &Leaderboard) -> Result<(), JsValue> {
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return Ok(());
        };
        list.set_inner_html("");
        for entry in board.entries() {
            let item = document.create_element("li")?;
            item.set_text_content(Some(&format!("{}: {}", entry.name, entry.score)));
            list.append_child(&item)?;
        }
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Pear Snake starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, LocalStore::open())));
        log::info!("Game initialized with seed: {}", seed);

        // Backing store at device resolution, game space stays in CSS pixels
        let (canvas_w, canvas_h) = {
            let g = game.borrow();
            (g.state.tuning.canvas_width, g.state.tuning.canvas_height)
        };
        let dpr = window.device_pixel_ratio();
        let width = (canvas_w as f64 * dpr) as u32;
        let height = (canvas_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width: {}px; height: {}px", canvas_w, canvas_h),
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, Vec2::new(canvas_w, canvas_h))
                .await
                .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_name_entry(&document, game.clone());

        request_animation_frame(game);

        log::info!("Pear Snake running!");
        Ok(())
    }

    /// Client coordinates to game canvas coordinates
    fn to_canvas(canvas: &HtmlCanvasElement, size: Vec2, client_x: f32, client_y: f32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 {
            size.x / rect.width() as f32
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            size.y / rect.height() as f32
        } else {
            1.0
        };
        Vec2::new(
            (client_x - rect.left() as f32) * scale_x,
            (client_y - rect.top() as f32) * scale_y,
        )
    }

    fn canvas_size(game: &Game) -> Vec2 {
        Vec2::new(game.state.tuning.canvas_width, game.state.tuning.canvas_height)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard - settings hotkeys, ignored while the name form is open
        if let Some(window) = web_sys::window() {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.records.prompt.is_open() {
                    return;
                }
                if g.toggle_setting(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse press - steer toward the pointer
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let size = canvas_size(&g);
                let target = to_canvas(
                    &canvas_clone,
                    size,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                g.input.steer_to = Some(target);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let size = canvas_size(&g);
                    let target = to_canvas(
                        &canvas_clone,
                        size,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    g.input.steer_to = Some(target);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_name_entry(document: &Document, game: Rc<RefCell<Game>>) {
        // Save button
        if let Some(btn) = document.get_element_by_id("name-save") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let name = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| name_input(&d))
                    .map(|input| input.value());
                game.borrow_mut().finish_name_entry(Some(name.unwrap_or_default()));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Skip button
        if let Some(btn) = document.get_element_by_id("name-skip") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().finish_name_entry(None);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter submits, Escape skips
        if let Some(input) = name_input(document) {
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => game
                        .borrow_mut()
                        .finish_name_entry(Some(input_clone.value())),
                    "Escape" => game.borrow_mut().finish_name_entry(None),
                    _ => {}
                }
            });
            let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, platform::now_ms());
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pear Snake (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    headless::run(20_000);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: an autopilot chases the food so the whole loop (scoring,
/// hazards, game over, score records) can be watched from the terminal
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pear_snake::consts::SIM_DT;
    use pear_snake::palette::ColorTimer;
    use pear_snake::platform::{self, MemoryStore};
    use pear_snake::sim::{GameEvent, GameState, TickInput, tick};
    use pear_snake::{BestScore, ColorMode, Records, Tuning};

    /// Re-aim every this many ticks
    const STEER_EVERY: u64 = 30;

    pub fn run(ticks: u64) {
        let mut store = MemoryStore::default();
        let seed = platform::now_ms() as u64;
        let mut state = GameState::new(seed, Tuning::load(&store))
            .with_best_score(BestScore::load(&store).0);
        let mut records = Records::load(&store);
        let mut color_timer = ColorTimer::new(state.tuning.color_period_ms);
        color_timer.restart(0.0);

        log::info!("Seed {}", seed);

        for _ in 0..ticks {
            let input = if state.time_ticks % STEER_EVERY == 0 {
                TickInput {
                    steer_to: Some(state.food.square().center()),
                }
            } else {
                TickInput::default()
            };
            tick(&mut state, &input);

            // Simulated clock, one tick per fixed step
            let now_ms = state.time_ticks as f64 * SIM_DT as f64 * 1000.0;
            if color_timer.poll(now_ms) {
                state.recolor(now_ms, ColorMode::Rainbow);
            }

            let events: Vec<GameEvent> = state.drain_events().collect();
            for event in events {
                match event {
                    GameEvent::FoodEaten { score } => {
                        color_timer.restart(now_ms);
                        log::debug!("Ate food, score {}", score)
                    }
                    GameEvent::HazardScheduled { delay_ticks } => {
                        log::info!("Hazard scheduled in {} ticks", delay_ticks)
                    }
                    GameEvent::HazardSpawned { total } => log::info!("{} hazards", total),
                    GameEvent::GameOver { score, new_best } => {
                        color_timer.restart(now_ms);
                        let best = state.best_score;
                        if records.game_over(&mut store, score, best, new_best, true) {
                            let name = format!("bot-{}", state.games_played);
                            records.submit_name(&mut store, &name);
                        }
                    }
                }
            }
        }

        println!(
            "\n{} ticks, {} games, best {}",
            state.time_ticks, state.games_played, state.best_score
        );
        for (rank, entry) in records.leaderboard.entries().iter().enumerate() {
            println!("  {}. {:<12} {}", rank + 1, entry.name, entry.score);
        }
    }
}
