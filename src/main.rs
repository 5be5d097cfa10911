//! Ember Dash entry point
//!
//! In the browser this wires the canvas, input, HUD and leaderboard around
//! the simulation. Natively it plays a few seeded runs on autopilot and
//! prints the resulting table.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use ember_dash::audio::{AudioManager, SoundEffect};
    use ember_dash::leaderboard::{
        Leaderboard, LeaderboardEntry, RestStore, StoreConfig, render_lines,
    };
    use ember_dash::renderer::{RenderState, build_scene, vertex::colors};
    use ember_dash::settings::Settings;
    use ember_dash::sim::{GameEvent, GameState, TickInput, Viewport, start_run, tick};

    type Board = Rc<Leaderboard<RestStore>>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        settings: Settings,
        audio: AudioManager,
        /// Space / ArrowUp currently down
        space_held: bool,
        up_held: bool,
        /// Touch seen since the last successful jump
        touch_pending: bool,
        /// Score waiting on the name modal
        pending_score: Option<u64>,
        /// A requestAnimationFrame callback is scheduled
        loop_running: bool,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(seed, viewport),
                render_state: None,
                settings,
                audio,
                space_held: false,
                up_held: false,
                touch_pending: false,
                pending_score: None,
                loop_running: false,
            }
        }

        fn input(&self) -> TickInput {
            TickInput {
                jump: self.space_held || self.up_held || self.touch_pending,
            }
        }

        /// Begin a fresh run (first start and every restart)
        fn start(&mut self) {
            self.state.reseed(js_sys::Date::now() as u64);
            start_run(&mut self.state);
            self.touch_pending = false;
            self.pending_score = None;
            self.audio.start_music();

            set_hidden("start-screen", true);
            set_hidden("game-over-screen", true);
            set_hidden("highscore-modal", true);
            set_hidden("score", false);
            if let Some(el) = element("leaderboard-container") {
                el.set_inner_html("");
            }
        }

        /// One display frame: tick, draw, HUD. Returns the events produced.
        fn frame(&mut self) -> Vec<GameEvent> {
            let input = self.input();
            tick(&mut self.state, &input);

            let events = self.state.drain_events();
            for event in &events {
                match event {
                    GameEvent::Jumped => {
                        self.touch_pending = false;
                        self.audio.play(SoundEffect::Jump);
                    }
                    GameEvent::Collided => self.audio.play(SoundEffect::GameOver),
                    GameEvent::RunEnded { .. } => {}
                }
            }

            self.render();
            if let Some(el) = element("score") {
                el.set_text_content(Some(&format!("Score: {}", self.state.display_score())));
            }
            events
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let vertices = build_scene(&self.state, &self.settings);
            let clear = if self.state.day_phase().is_night() {
                colors::SKY_NIGHT
            } else {
                colors::SKY_DAY
            };
            match render_state.render(&vertices, &self.state.viewport, clear) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.toggle_mute();
            self.settings.save();
            self.audio.apply_settings(&self.settings);
            if !self.settings.muted && self.state.is_animating() {
                self.audio.start_music();
            }
            if let Some(el) = element("mute-btn") {
                el.set_text_content(Some(if self.settings.muted { "Unmute" } else { "Mute" }));
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        document()?.get_element_by_id(id)
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = element(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Fill the leaderboard panel
    fn show_leaderboard(entries: &[LeaderboardEntry]) {
        let (Some(document), Some(container)) = (document(), element("leaderboard-container"))
        else {
            return;
        };
        container.set_inner_html("");

        for (i, line) in render_lines(entries).into_iter().enumerate() {
            let tag = if i == 0 && !entries.is_empty() { "h3" } else { "p" };
            if let Ok(el) = document.create_element(tag) {
                el.set_text_content(Some(&line));
                let _ = container.append_child(&el);
            }
        }
    }

    fn refresh_leaderboard(board: Board) {
        if !board.is_enabled() {
            return;
        }
        if let Some(el) = element("leaderboard-container") {
            el.set_inner_html("<p>Loading scores...</p>");
        }
        wasm_bindgen_futures::spawn_local(async move {
            let entries = board.fetch_top().await;
            show_leaderboard(&entries);
        });
    }

    /// CSS size of the canvas, and its backing store sized for the display
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let css_w = canvas.client_width().max(1);
        let css_h = canvas.client_height().max(1);
        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::new(css_w as f32, css_h as f32), width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Ember Dash starting...");
        if let Err(e) = start().await {
            log::error!("Startup failed: {e}");
        }
    }

    async fn start() -> Result<(), String> {
        let document = document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "#canvas is not a canvas")?;

        let (viewport, width, height) = fit_canvas(&canvas);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport, Settings::load())));
        let board: Board = Rc::new(Leaderboard::from_config(
            StoreConfig::from_env(),
            RestStore::new,
        ));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {e}"))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("Failed to create device: {e}"))?;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.render();
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone(), board.clone());
        setup_resize(canvas, game);
        refresh_leaderboard(board);

        log::info!("Ember Dash ready (seed {seed})");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.space_held = true;
                    }
                    "ArrowUp" => {
                        event.prevent_default();
                        g.up_held = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => g.space_held = false,
                    "ArrowUp" => g.up_held = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (jump on next grounded tick)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.is_animating() {
                    g.touch_pending = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(btn) = element(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, board: Board) {
        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            let board = board.clone();
            on_click(id, move |_| {
                start_and_loop(&game, &board);
            });
        }

        {
            let game = game.clone();
            on_click("mute-btn", move |_| game.borrow_mut().toggle_mute());
        }

        // Name modal submit; the score comes from the run that just ended
        on_click("submit-score-btn", move |_| {
            let Some(score) = game.borrow_mut().pending_score.take() else {
                return;
            };
            let name = element("player-name")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            set_hidden("highscore-modal", true);

            let board = board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                board.submit(&name, score).await;
                let entries = board.fetch_top().await;
                show_leaderboard(&entries);
            });
        });
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (viewport, width, height) = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.state.resize(viewport.width, viewport.height);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
            // The loop is not running to pick this up
            if !g.loop_running {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start_and_loop(game: &Rc<RefCell<Game>>, board: &Board) {
        let schedule = {
            let mut g = game.borrow_mut();
            g.start();
            !std::mem::replace(&mut g.loop_running, true)
        };
        if schedule {
            request_animation_frame(game.clone(), board.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, board: Board) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, board);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, board: Board) {
        let (events, animating) = {
            let mut g = game.borrow_mut();
            let events = g.frame();
            let animating = g.state.is_animating();
            if !animating {
                g.loop_running = false;
            }
            (events, animating)
        };

        for event in events {
            if let GameEvent::RunEnded { score } = event {
                on_run_ended(&game, &board, score);
            }
        }

        if animating {
            request_animation_frame(game, board);
        }
    }

    /// Show the game-over screen and run the high score check
    fn on_run_ended(game: &Rc<RefCell<Game>>, board: &Board, score: u64) {
        set_hidden("score", true);
        set_hidden("game-over-screen", false);
        if let Some(el) = element("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }

        if !board.is_enabled() {
            return;
        }

        let game = game.clone();
        let board = board.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if board.is_high_score(score).await {
                if restarted(&game) {
                    return;
                }
                log::info!("High score {score}, asking for a name");
                {
                    let mut g = game.borrow_mut();
                    g.pending_score = Some(score);
                    g.audio.play(SoundEffect::HighScore);
                }
                set_hidden("highscore-modal", false);
            } else {
                let entries = board.fetch_top().await;
                if restarted(&game) {
                    return;
                }
                show_leaderboard(&entries);
            }
        });
    }

    /// A new run started while a leaderboard request was in flight. The new
    /// run owns the screen, so the stale result is dropped.
    fn restarted(game: &Rc<RefCell<Game>>) -> bool {
        game.borrow().state.is_animating()
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ember_dash::consts::*;
    use ember_dash::leaderboard::{Leaderboard, MemoryStore, render_lines};
    use pollster::block_on;
    use ember_dash::sim::{
        GameEvent, GamePhase, GameState, TickInput, Viewport, start_run, tick, trigger_game_over,
    };

    /// Hard stop for a run the autopilot never loses
    const MAX_RUN_TICKS: u64 = 20_000;

    /// Jump when the nearest obstacle ahead is within a few ticks of reach
    fn autopilot(state: &GameState) -> TickInput {
        let front = state.player.x + state.player.width;
        let reach = state.game_speed * 9.0;
        let jump = state.obstacles.iter().any(|o| {
            let gap = o.x - front;
            (0.0..=reach).contains(&gap)
        });
        TickInput { jump }
    }

    /// Play one run to the end and return the final score
    fn play(seed: u64) -> u64 {
        let mut state = GameState::new(seed, Viewport::new(800.0, BASE_GAME_HEIGHT));
        start_run(&mut state);

        while state.phase == GamePhase::Running {
            let input = autopilot(&state);
            tick(&mut state, &input);
            if state.frame_count >= MAX_RUN_TICKS {
                log::info!("Seed {seed} survived {MAX_RUN_TICKS} ticks, ending run");
                trigger_game_over(&mut state);
            }
        }
        while state.is_animating() {
            tick(&mut state, &TickInput::default());
        }

        state
            .drain_events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::RunEnded { score } => Some(score),
                _ => None,
            })
            .unwrap_or_else(|| state.display_score())
    }

    pub fn run(first_seed: u64, runs: u64) {
        let board = Leaderboard::new(MemoryStore::new());

        for seed in first_seed..first_seed + runs {
            let score = play(seed);
            let high = block_on(board.is_high_score(score));
            log::info!("Seed {seed}: score {score}{}", if high { " (high score)" } else { "" });
            if high {
                block_on(board.submit(&format!("bot-{seed}"), score));
            }
        }

        for line in render_lines(&block_on(board.fetch_top())) {
            println!("{line}");
        }
    }
}

/// Play seeded autopilot runs and print the resulting leaderboard
#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "ember-dash", about = "Headless Ember Dash autopilot runs")]
struct Args {
    /// Seed of the first run; later runs use the following seeds
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of runs to play
    #[arg(long, default_value_t = 8)]
    runs: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!(
        "Ember Dash (native) running {} autopilot runs from seed {}",
        args.runs,
        args.seed
    );
    log::info!("The playable build targets the browser - run with `trunk serve`");
    headless::run(args.seed, args.runs);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["ember-dash"]).unwrap();
        assert_eq!(args.seed, 1);
        assert_eq!(args.runs, 8);
    }

    #[test]
    fn test_seed_flag_keeps_default_runs() {
        let args = Args::try_parse_from(["ember-dash", "--seed", "5"]).unwrap();
        assert_eq!(args.seed, 5);
        assert_eq!(args.runs, 8);

        let args = Args::try_parse_from(["ember-dash", "--runs", "3", "--seed", "40"]).unwrap();
        assert_eq!((args.seed, args.runs), (40, 3));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["ember-dash", "--runs", "abc"]).is_err());
        assert!(Args::try_parse_from(["ember-dash", "--seed", "-2"]).is_err());
        assert!(Args::try_parse_from(["ember-dash", "5"]).is_err());
    }
}
