pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, Location};
pub use api::types::{Cell, GameEvent};
pub use crate::core::time::{FixedTimestep, DeferredQueue, TaskId};
pub use renderer::patch::{CellPatch, PatchBuffer, PatchSource};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::rng::Rng;

// Extensions: decoupled optional systems
pub use extensions::{Easing, lerp, ease, Fade, FadeState};
