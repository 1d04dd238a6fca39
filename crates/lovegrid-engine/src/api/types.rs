use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

/// Address of one glyph cell in the grid.
/// Not an object, just a coordinate: row-major, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Whether this cell lies inside a `rows` × `cols` grid.
    pub fn in_bounds(self, rows: u32, cols: u32) -> bool {
        self.row < rows && self.col < cols
    }

    /// Pixel centre of this cell when every cell is `size` pixels.
    pub fn center(self, size: Vec2) -> Vec2 {
        Vec2::new(
            (self.col as f32 + 0.5) * size.x,
            (self.row as f32 + 0.5) * size.y,
        )
    }
}

/// A game event communicated from Rust to the JS host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    /// Event with only a kind and a single payload value.
    pub fn with_value(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_bounds() {
        assert!(Cell::new(0, 0).in_bounds(60, 160));
        assert!(Cell::new(59, 159).in_bounds(60, 160));
        assert!(!Cell::new(60, 0).in_bounds(60, 160));
        assert!(!Cell::new(0, 160).in_bounds(60, 160));
    }

    #[test]
    fn cell_center() {
        let center = Cell::new(2, 9).center(Vec2::new(10.0, 20.0));
        assert_eq!(center, Vec2::new(95.0, 50.0));
    }

    #[test]
    fn cells_order_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 5), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 5), Cell::new(1, 0)]);
    }

    #[test]
    fn game_event_is_4_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
    }
}
