//! Oval Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use oval_rush::sim::{FrameSnapshot, GameEvent};
    use oval_rush::{GameLoop, Key};

    // Bridge to the page's renderer (scene graph, meshes, camera)
    #[wasm_bindgen(inline_js = "
        export function draw_frame(json) {
            const r = window.ovalRushRenderer;
            if (r && r.draw) {
                r.draw(JSON.parse(json));
            }
        }

        export function draw_track(json) {
            const r = window.ovalRushRenderer;
            if (r && r.buildTrack) {
                r.buildTrack(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_frame(json: &str);
        fn draw_track(json: &str);
    }

    /// Game instance shared between event handlers and the frame callback
    struct Game {
        game_loop: GameLoop,
        /// An animation frame request is outstanding
        frame_pending: bool,
    }

    impl Game {
        fn draw(&self, snapshot: &FrameSnapshot) {
            match serde_json::to_string(snapshot) {
                Ok(json) => draw_frame(&json),
                Err(e) => log::warn!("Could not serialize frame: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            for event in self.game_loop.drain_events() {
                match event {
                    GameEvent::ScoreChanged { score } => set_score(score),
                    GameEvent::Collision { vehicle_id } => {
                        log::info!("Hit vehicle #{}", vehicle_id);
                    }
                    GameEvent::TrafficSpawned { .. } | GameEvent::Stopped => {}
                }
            }
        }
    }

    fn set_score(score: u32) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id("score")) {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Oval Rush starting...");

        let seed = js_sys::Date::now() as u64;
        let game_loop = GameLoop::new(seed);
        log::info!("Game initialized with seed: {}", seed);

        send_track(&game_loop, MAP_WIDTH, MAP_HEIGHT);

        let game = Rc::new(RefCell::new(Game {
            game_loop,
            frame_pending: false,
        }));
        {
            let mut g = game.borrow_mut();
            let snapshot = g.game_loop.reset();
            g.draw(&snapshot);
            g.update_hud();
        }

        setup_input_handlers(game);
    }

    /// Ground plane size in world units (camera width, twice the camera height)
    const MAP_WIDTH: f32 = 960.0;
    const MAP_HEIGHT: f32 = 1080.0;

    /// Hand the static track layout to the renderer once
    fn send_track(game_loop: &GameLoop, map_width: f32, map_height: f32) {
        let layout = game_loop.state.track.layout(map_width, map_height, 48);
        match serde_json::to_string(&layout) {
            Ok(json) => draw_track(&json),
            Err(e) => log::warn!("Could not serialize track layout: {}", e),
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; input disabled");
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_dom(&event.key());
                let needs_frame = {
                    let mut g = game.borrow_mut();
                    g.game_loop.key_down(key);
                    if key == Key::Reset {
                        let snapshot = g.game_loop.snapshot();
                        g.draw(&snapshot);
                        g.update_hud();
                    }
                    g.game_loop.is_running() && !g.frame_pending
                };
                if needs_frame {
                    request_animation_frame(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().game_loop.key_up(Key::from_dom(&event.key()));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        game.borrow_mut().frame_pending = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.frame_pending = false;

            if let Some(snapshot) = g.game_loop.frame(time) {
                g.draw(&snapshot);
            }
            g.update_hud();
            g.game_loop.is_running()
        };

        // Stop scheduling frames once the run ends
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use oval_rush::Tuning;

    env_logger::init();
    log::info!("Oval Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot - use a wasm build to play");

    // Usage: oval-rush [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| match s.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Ignoring seed {:?}: {}", s, e);
                None
            }
        })
        .unwrap_or_else(clock_seed);
    let tuning = args
        .next()
        .map(|path| Tuning::load(std::path::Path::new(&path)))
        .unwrap_or_default();

    let outcome = headless::run(seed, tuning, headless::MAX_FRAMES);
    println!(
        "seed {}: score {} after {:.1}s, {} vehicles, {}",
        seed,
        outcome.score,
        outcome.elapsed_ms / 1000.0,
        outcome.traffic,
        if outcome.crashed { "crashed" } else { "survived" }
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drives the controller with a fixed 60 Hz clock and a simple pedal policy
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use oval_rush::sim::{GameEvent, GamePhase};
    use oval_rush::{GameLoop, Key, Tuning};

    /// Two simulated minutes
    pub const MAX_FRAMES: u32 = 60 * 120;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct Outcome {
        pub score: u32,
        pub traffic: usize,
        pub elapsed_ms: f64,
        pub crashed: bool,
    }

    pub fn run(seed: u64, tuning: Tuning, max_frames: u32) -> Outcome {
        let mut game = GameLoop::with_tuning(seed, tuning);
        game.key_down(Key::ArrowUp);

        let mut time = 0.0;
        for frame in 0..max_frames {
            // Alternate between flooring it and braking every two seconds
            if frame % 240 == 120 {
                game.key_up(Key::ArrowUp);
                game.key_down(Key::ArrowDown);
            } else if frame % 240 == 0 {
                game.key_up(Key::ArrowDown);
                game.key_down(Key::ArrowUp);
            }

            game.frame(time);
            for event in game.drain_events() {
                match event {
                    GameEvent::ScoreChanged { score } => log::debug!("score {}", score),
                    GameEvent::TrafficSpawned { id, kind, .. } => {
                        log::info!("{:?} #{} joined", kind, id)
                    }
                    GameEvent::Collision { vehicle_id } => log::info!("hit #{}", vehicle_id),
                    GameEvent::Stopped => {}
                }
            }
            if !game.is_running() {
                break;
            }
            time += FRAME_MS;
        }

        Outcome {
            score: game.state.score,
            traffic: game.state.traffic.len(),
            elapsed_ms: time,
            crashed: game.phase() == GamePhase::Crashed,
        }
    }
}
