// extensions/mod.rs
//
// Optional extension modules for lovegrid.
// Decoupled from the grid itself; apps opt in by owning these systems.

pub mod easing;
pub mod fade;

pub use easing::{Easing, lerp, ease};
pub use fade::{Fade, FadeState};
