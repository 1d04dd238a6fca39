use lovegrid_engine::bridge::protocol::HEADER_FLOATS;
use lovegrid_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue, Location,
    ProtocolLayout,
};

/// Generic runner that wires a `Game` to the host-driven frame loop.
///
/// Each concrete app creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly. See `export_game!`.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    /// Frame data has been handed to the host and may be discarded.
    published: bool,
    frame: u32,
    header: [f32; HEADER_FLOATS],
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G, seed: u64) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::new(&config, seed);

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            timestep,
            layout,
            config,
            initialized: false,
            published: false,
            frame: 0,
            header: [0.0; HEADER_FLOATS],
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Discard last frame's patches and events once the host has had them.
    fn begin_frame(&mut self) {
        if self.published {
            self.ctx.clear_frame_data();
            self.published = false;
        }
    }

    /// Run one frame: feed queued input to the game, advance fixed steps.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        self.begin_frame();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            // Input belongs to the first step only; catch-up steps see an empty queue
            if step == 0 {
                self.input.drain();
            }
        }

        self.frame = self.frame.wrapping_add(1);
        self.header = self.layout.header(
            self.frame,
            self.ctx.patches.patch_count(),
            self.ctx.events.len() as u32,
        );
        self.published = true;
    }

    /// Hand a named JSON resource to the game.
    pub fn load_data(&mut self, name: &str, json: &str) {
        self.begin_frame();
        self.game.load_data(&mut self.ctx, name, json);
    }

    /// Report the page location to the game.
    pub fn set_location(&mut self, origin: &str, path: &str, search: &str) {
        self.begin_frame();
        let location = Location {
            origin: origin.to_string(),
            path: path.to_string(),
            search: search.to_string(),
        };
        self.game.set_location(&mut self.ctx, &location);
    }

    pub fn query(&self, key: &str) -> Option<String> {
        self.game.query(key)
    }

    /// Let the game cancel its scheduled work before the runner is dropped.
    pub fn shutdown(&mut self) {
        self.game.shutdown(&mut self.ctx);
        self.input.drain();
        self.initialized = false;
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn patches_ptr(&self) -> *const f32 {
        self.ctx.patches.patches_ptr()
    }

    pub fn patch_count(&self) -> u32 {
        self.ctx.patches.patch_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    // ---- Capacity accessors (read by the host via wasm_bindgen exports) ----

    pub fn max_patches(&self) -> u32 {
        self.layout.max_patches as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }
}
