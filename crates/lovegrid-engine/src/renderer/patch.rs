use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::api::types::Cell;

/// Which trigger produced a patch. Lets the host style pointer and
/// twinkle reveals differently; the engine itself never reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PatchSource {
    /// Direct pointer/touch reveal or hide.
    Pointer = 0,
    /// Ambient twinkle fade.
    Twinkle = 1,
    /// Forced hide because the cell became reserved.
    Reserved = 2,
}

/// Per-cell opacity change written to the shared buffer for the JS host.
/// Must match the host protocol: 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CellPatch {
    pub row: f32,
    pub col: f32,
    /// Opacity (0.0 = hidden, 1.0 = fully shown).
    pub alpha: f32,
    /// `PatchSource` discriminant.
    pub source: f32,
}

impl CellPatch {
    pub const FLOATS: usize = 4;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(cell: Cell, alpha: f32, source: PatchSource) -> Self {
        Self {
            row: cell.row as f32,
            col: cell.col as f32,
            alpha,
            source: source as u8 as f32,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row as u32, self.col as u32)
    }
}

/// Frame-local list of cell patches.
///
/// A cell written twice in one frame keeps a single slot holding the last
/// write, so the host touches each changed cell at most once per frame.
pub struct PatchBuffer {
    patches: Vec<CellPatch>,
    slots: HashMap<Cell, usize>,
    capacity: usize,
}

impl PatchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            patches: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.patches.clear();
        self.slots.clear();
    }

    /// Record a new opacity for a cell. Returns false when the buffer is full
    /// and the cell has no slot yet; the host will see it on a later write.
    pub fn set(&mut self, cell: Cell, alpha: f32, source: PatchSource) -> bool {
        let patch = CellPatch::new(cell, alpha, source);
        if let Some(&idx) = self.slots.get(&cell) {
            self.patches[idx] = patch;
            return true;
        }
        if self.patches.len() >= self.capacity {
            log::warn!("patch buffer full ({}), dropping {:?}", self.capacity, cell);
            return false;
        }
        self.slots.insert(cell, self.patches.len());
        self.patches.push(patch);
        true
    }

    /// Convenience for instant show/hide.
    pub fn set_visible(&mut self, cell: Cell, visible: bool, source: PatchSource) -> bool {
        self.set(cell, if visible { 1.0 } else { 0.0 }, source)
    }

    pub fn get(&self, cell: Cell) -> Option<&CellPatch> {
        self.slots.get(&cell).map(|&idx| &self.patches[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellPatch> {
        self.patches.iter()
    }

    pub fn patch_count(&self) -> u32 {
        self.patches.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw pointer to patch data for shared-memory reads.
    pub fn patches_ptr(&self) -> *const f32 {
        self.patches.as_ptr() as *const f32
    }
}

impl Default for PatchBuffer {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}
