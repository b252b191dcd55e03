//! Shadow Runner entry point
//!
//! Wires the browser page to the simulation and runs the frame loop. On
//! native targets it plays a headless seeded run and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use shadow_runner::Settings;
    use shadow_runner::audio::AudioManager;
    use shadow_runner::platform::assets::AssetStore;
    use shadow_runner::platform::browser;
    use shadow_runner::platform::canvas::CanvasRenderer;
    use shadow_runner::platform::input::{self, InputIntent, PendingInput};
    use shadow_runner::platform::PlatformError;
    use shadow_runner::render::compose_frame;
    use shadow_runner::sim::{GamePhase, GameState, tick};

    const CANVAS_ID: &str = "canvas1";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        assets: AssetStore,
        renderer: CanvasRenderer,
        audio: AudioManager,
        pending: PendingInput,
        /// A frame callback is scheduled
        loop_running: bool,
    }

    impl Game {
        fn draw(&self) {
            let frame = compose_frame(&self.state, self.settings.show_hitboxes);
            self.renderer.execute(&frame, &self.assets);
        }

        /// Forward queued simulation events to audio
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                log::debug!("Event: {event:?}");
                self.audio.handle_event(event);
            }
        }

        /// A run just started from a click or key press
        fn on_run_started(&mut self) {
            self.audio.resume();
            self.pending.clear();
            self.dispatch_events();
        }

        fn step(&mut self, timestamp: f64) {
            let dt = self.state.frame_delta(timestamp);
            let input = self.pending.take();
            tick(&mut self.state, &input, dt);
            self.draw();
            self.dispatch_events();
        }
    }

    pub async fn run() -> Result<(), PlatformError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from(format!("Logger already set: {e}")));
        }

        log::info!("Shadow Runner starting...");

        let canvas = browser::canvas(CANVAS_ID)?;
        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed);
        state.set_field_size(canvas.width() as f32, canvas.height() as f32);

        let assets = AssetStore::load_all().await;
        match assets.player_frame_size() {
            Some((w, h)) => state.set_player_frame(w, h),
            None => log::warn!("Player sheet missing - using default frame size"),
        }

        let settings = Settings::default();
        let game = Rc::new(RefCell::new(Game {
            state,
            audio: AudioManager::new(&settings),
            settings,
            assets,
            renderer: CanvasRenderer::new(&canvas)?,
            pending: PendingInput::default(),
            loop_running: false,
        }));

        game.borrow().draw();

        setup_input_handlers(&canvas, game.clone())?;
        setup_auto_pause(game)?;

        log::info!("Shadow Runner ready (seed {seed})");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), PlatformError> {
        // Click on the Start/Restart control
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = target.get_bounding_client_rect();
                let point = input::client_to_field(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    (
                        rect.left() as f32,
                        rect.top() as f32,
                        rect.width() as f32,
                        rect.height() as f32,
                    ),
                    Vec2::new(target.width() as f32, target.height() as f32),
                );
                let started = {
                    let mut g = game.borrow_mut();
                    let started = g.state.click(point);
                    if started {
                        g.on_run_started();
                    }
                    started
                };
                if started {
                    start_loop(game.clone());
                }
            });
            canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(browser::js_error)?;
            closure.forget();
        }

        let window = browser::window()?;

        // Key presses
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if input::captures_key(&code) {
                    event.prevent_default();
                }
                let Some(intent) = input::key_down(&code) else {
                    return;
                };
                let mut g = game.borrow_mut();
                match intent {
                    InputIntent::ActivateControl => {
                        if g.state.press_button() {
                            g.on_run_started();
                            drop(g);
                            start_loop(game.clone());
                        }
                    }
                    InputIntent::ToggleHitboxes => {
                        g.settings.toggle_hitboxes();
                        if g.state.phase != GamePhase::Running {
                            g.draw();
                        }
                    }
                    InputIntent::ToggleMute => {
                        g.settings.toggle_muted();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                    }
                    gameplay => {
                        let phase = g.state.phase;
                        g.pending.record(gameplay, phase);
                    }
                }
            });
            window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(browser::js_error)?;
            closure.forget();
        }

        // Key releases (slide end)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if input::captures_key(&code) {
                    event.prevent_default();
                }
                if let Some(intent) = input::key_up(&code) {
                    let mut g = game.borrow_mut();
                    let phase = g.state.phase;
                    g.pending.record(intent, phase);
                }
            });
            window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(browser::js_error)?;
            closure.forget();
        }

        Ok(())
    }

    /// Schedule frames until the run ends
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
        }
        request_frame(game);
    }

    fn request_frame(game: Rc<RefCell<Game>>) {
        let retry = game.clone();
        if let Err(e) = browser::request_animation_frame(move |time| game_loop(game, time)) {
            log::error!("Could not schedule frame: {e}");
            retry.borrow_mut().loop_running = false;
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.step(time);
            let running = g.state.phase == GamePhase::Running;
            if !running {
                g.loop_running = false;
            }
            running
        };

        if keep_going {
            request_frame(game);
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), PlatformError> {
        let window = browser::window()?;
        let document = browser::document()?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                g.audio.set_page_hidden(hidden);
                g.state.resync_clock();
                if hidden {
                    log::info!("Tab hidden");
                }
            });
            document
                .add_event_listener_with_callback(
                    "visibilitychange",
                    closure.as_ref().unchecked_ref(),
                )
                .map_err(browser::js_error)?;
            closure.forget();
        }

        // Window blur and focus (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let g = game.borrow();
                if g.settings.mute_on_blur {
                    g.audio.set_page_hidden(true);
                }
            });
            window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())
                .map_err(browser::js_error)?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let g = game.borrow();
                if g.settings.mute_on_blur {
                    g.audio.set_page_hidden(false);
                }
            });
            window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())
                .map_err(browser::js_error)?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Shadow Runner failed to start: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Shadow Runner (native) headless run, seed {seed}");
    log::info!("Use `trunk serve` for the playable web version");

    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use shadow_runner::sim::{GameEvent, GamePhase, GameState, PlayerAction, TickInput, tick};

    const DT_MS: f32 = 16.0;
    /// Ten minutes of play at 60 Hz
    const MAX_TICKS: u32 = 37_500;
    /// Jump when an obstacle's left edge is this close to the player
    const JUMP_LOOKAHEAD: f32 = 140.0;

    pub fn run(seed: u64) {
        let mut state = GameState::new(seed);
        state.transition(GamePhase::Running);

        let mut ticks = 0;
        while state.phase == GamePhase::Running && ticks < MAX_TICKS {
            let mut input = TickInput::default();
            if should_jump(&state) {
                input.push(PlayerAction::Jump);
            }
            tick(&mut state, &input, DT_MS);
            ticks += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::Jumped | GameEvent::RunStarted => {}
                    other => log::info!("t={:>7.0}ms {other:?}", state.clock_ms),
                }
            }
        }

        log::info!(
            "Finished after {ticks} ticks: phase {:?}, score {}, lives {}",
            state.phase,
            state.score.floor(),
            state.lives
        );
    }

    fn should_jump(state: &GameState) -> bool {
        let player = state.player_hitbox();
        state.obstacles.iter().any(|obstacle| {
            let gap = obstacle.hitbox().x - (player.x + player.width);
            (0.0..JUMP_LOOKAHEAD).contains(&gap)
        })
    }
}
