use crate::api::types::GameEvent;
use crate::input::queue::InputQueue;
use crate::renderer::patch::PatchBuffer;
use crate::systems::rng::Rng;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum number of cell patches per frame (default: 4096).
    pub max_patches: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_patches: 4096,
            max_events: 32,
        }
    }
}

/// Page location as reported by the host (`window.location` pieces).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Scheme + host, e.g. `https://example.com`.
    pub origin: String,
    /// Path, e.g. `/spicy/v/12`.
    pub path: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
}

/// The core contract every grid app must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `input` holds the events that arrived since the
    /// previous step, in arrival order; it is empty on catch-up steps.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// A named JSON resource arrived from the host.
    fn load_data(&mut self, _ctx: &mut EngineContext, _name: &str, _json: &str) {}

    /// The host reported (or changed) the page location.
    fn set_location(&mut self, _ctx: &mut EngineContext, _location: &Location) {}

    /// String-valued read access for the host (serialized UI state, static text).
    fn query(&self, _key: &str) -> Option<String> {
        None
    }

    /// The host is tearing the app down. Cancel anything still scheduled.
    fn shutdown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub patches: PatchBuffer,
    pub events: Vec<GameEvent>,
    pub rng: Rng,
    dt: f32,
    max_events: usize,
}

impl EngineContext {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            patches: PatchBuffer::with_capacity(config.max_patches),
            events: Vec::with_capacity(config.max_events),
            rng: Rng::new(seed),
            dt: config.fixed_dt,
            max_events: config.max_events,
        }
    }

    /// Seconds covered by one `Game::update` call.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Emit a game event to be forwarded to the host.
    /// Identical events within one frame are sent once.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.contains(&event) {
            return;
        }
        if self.events.len() >= self.max_events {
            log::warn!("game event buffer full, dropping {:?}", event);
            return;
        }
        self.events.push(event);
    }

    /// Clear per-frame transient data (patches, events).
    pub fn clear_frame_data(&mut self) {
        self.patches.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default(), 42)
    }
}
