use std::collections::HashSet;

use lovegrid_engine::Cell;

/// The two live cell sets of a session.
///
/// `reserved` is the message/button footprint and is only ever replaced
/// wholesale. `revealed` is the pointer-driven set. The store keeps
/// `revealed ∩ reserved = ∅` after every operation.
#[derive(Debug, Default)]
pub struct VisibilityStore {
    reserved: HashSet<Cell>,
    revealed: HashSet<Cell>,
}

impl VisibilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reserved(&self, cell: Cell) -> bool {
        self.reserved.contains(&cell)
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.revealed.contains(&cell)
    }

    /// Set a cell's pointer-revealed state. Returns true only when the state
    /// actually changed; callers emit visual updates on true alone.
    /// Reserved cells can never be revealed.
    pub fn set_revealed(&mut self, cell: Cell, revealed: bool) -> bool {
        if revealed {
            !self.reserved.contains(&cell) && self.revealed.insert(cell)
        } else {
            self.revealed.remove(&cell)
        }
    }

    /// Swap in a new reserved set. Returns the previously revealed cells that
    /// the new set covers; they are no longer revealed and must be hidden.
    pub fn replace_reserved(&mut self, reserved: HashSet<Cell>) -> Vec<Cell> {
        let mut evicted: Vec<Cell> = self.revealed.intersection(&reserved).copied().collect();
        evicted.sort();
        for cell in &evicted {
            self.revealed.remove(cell);
        }
        self.reserved = reserved;
        evicted
    }

    /// Forget every revealed cell. Returns them so they can be hidden.
    pub fn clear_revealed(&mut self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.revealed.drain().collect();
        cells.sort();
        cells
    }

    pub fn reserved(&self) -> &HashSet<Cell> {
        &self.reserved
    }

    pub fn revealed(&self) -> &HashSet<Cell> {
        &self.revealed
    }
}
