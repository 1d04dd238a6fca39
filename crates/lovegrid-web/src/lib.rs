pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a grid app.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper that ignores calls before init / after shutdown
/// - All wasm-bindgen exports (lifecycle, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use lovegrid_engine::*;
///
/// mod game;
/// use game::MyGrid;
///
/// lovegrid_web::export_game!(MyGrid, "my-grid");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The app struct type that implements `lovegrid_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in lifecycle log messages
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: call ignored, not initialized", $game_name);
                        None
                    }
                }
            })
        }

        /// Create the app. `seed` of 0 asks for a random seed.
        #[wasm_bindgen]
        pub fn game_init(seed: u32) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let seed = if seed == 0 {
                (js_sys::Math::random() * u32::MAX as f64) as u64 + 1
            } else {
                seed as u64
            };

            let game = <$game_type>::new();
            let mut runner = $crate::GameRunner::new(game, seed);
            runner.init();

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $game_name);
        }

        /// Tear the app down; every scheduled task goes with it.
        #[wasm_bindgen]
        pub fn game_shutdown() {
            with_runner(|r| r.shutdown());
            RUNNER.with(|cell| {
                cell.borrow_mut().take();
            });
            log::info!("{}: shut down", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_touch_end() {
            with_runner(|r| r.push_input(InputEvent::TouchEnd));
        }

        #[wasm_bindgen]
        pub fn game_viewport(width: f32, height: f32, offset_x: f32, offset_y: f32) {
            with_runner(|r| {
                r.push_input(InputEvent::Viewport { width, height, offset_x, offset_y })
            });
        }

        #[wasm_bindgen]
        pub fn game_cell_metrics(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::CellMetrics { width, height }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_data(name: &str, json: &str) {
            with_runner(|r| r.load_data(name, json));
        }

        #[wasm_bindgen]
        pub fn game_set_location(origin: &str, path: &str, search: &str) {
            with_runner(|r| r.set_location(origin, path, search));
        }

        #[wasm_bindgen]
        pub fn game_query(key: &str) -> Option<String> {
            with_runner(|r| r.query(key)).flatten()
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_patches_ptr() -> *const f32 {
            with_runner(|r| r.patches_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_patch_count() -> u32 {
            with_runner(|r| r.patch_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_patches() -> u32 {
            with_runner(|r| r.max_patches()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }
    };
}
