pub mod patch;

pub use patch::{CellPatch, PatchBuffer, PatchSource};
