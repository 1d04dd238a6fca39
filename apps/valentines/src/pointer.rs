use std::collections::HashSet;

use glam::Vec2;
use lovegrid_engine::Cell;

use crate::layout::{CellMetrics, Viewport};
use crate::visibility::VisibilityStore;

/// Cells whose state changed after one pointer update. Only these need a
/// visual update; every other cell is left untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevealDiff {
    pub shown: Vec<Cell>,
    pub hidden: Vec<Cell>,
}

impl RevealDiff {
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

fn clamp_index(v: f32, max: u32) -> u32 {
    v.max(0.0).min(max as f32) as u32
}

/// Non-reserved cells whose centre lies within `radius` of grid-local `pos`.
///
/// Only the bounding box of the circle is scanned, never the whole lattice.
pub fn cells_within(
    pos: Vec2,
    radius: f32,
    metrics: &CellMetrics,
    rows: u32,
    cols: u32,
    store: &VisibilityStore,
) -> HashSet<Cell> {
    let mut cells = HashSet::new();
    if rows == 0 || cols == 0 || !metrics.is_measured() {
        return cells;
    }
    let size = Vec2::new(metrics.width, metrics.height);

    let col_lo = clamp_index(((pos.x - radius) / metrics.width).floor(), cols - 1);
    let col_hi = clamp_index(((pos.x + radius) / metrics.width).ceil(), cols - 1);
    let row_lo = clamp_index(((pos.y - radius) / metrics.height).floor(), rows - 1);
    let row_hi = clamp_index(((pos.y + radius) / metrics.height).ceil(), rows - 1);

    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let cell = Cell::new(row, col);
            if store.is_reserved(cell) {
                continue;
            }
            if cell.center(size).distance(pos) <= radius {
                cells.insert(cell);
            }
        }
    }
    cells
}

/// Reveals the glyphs around a single pointer or touch contact.
#[derive(Debug, Clone)]
pub struct PointerReveal {
    radius: f32,
}

impl PointerReveal {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Client coordinates to grid-local pixels.
    pub fn to_grid_local(client: Vec2, viewport: &Viewport) -> Vec2 {
        client - Vec2::new(viewport.offset_x, viewport.offset_y)
    }

    /// Recompute the revealed set for a pointer at client position `client`
    /// and apply the difference to `store`.
    pub fn pointer_moved(
        &self,
        client: Vec2,
        viewport: &Viewport,
        metrics: &CellMetrics,
        rows: u32,
        cols: u32,
        store: &mut VisibilityStore,
    ) -> RevealDiff {
        let pos = Self::to_grid_local(client, viewport);
        let next = cells_within(pos, self.radius, metrics, rows, cols, store);

        let mut hidden: Vec<Cell> = store.revealed().difference(&next).copied().collect();
        let mut shown: Vec<Cell> = next.difference(store.revealed()).copied().collect();
        hidden.sort();
        shown.sort();

        for &cell in &hidden {
            store.set_revealed(cell, false);
        }
        for &cell in &shown {
            store.set_revealed(cell, true);
        }
        RevealDiff { shown, hidden }
    }

    /// Touch contact lifted: nothing stays hovered.
    pub fn touch_ended(&self, store: &mut VisibilityStore) -> RevealDiff {
        RevealDiff {
            shown: Vec::new(),
            hidden: store.clear_revealed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: u32 = 60;
    const COLS: u32 = 160;

    fn metrics() -> CellMetrics {
        CellMetrics { width: 10.0, height: 20.0 }
    }

    fn origin() -> Viewport {
        Viewport { width: 1600.0, height: 1200.0, offset_x: 0.0, offset_y: 0.0 }
    }

    /// Brute force over the whole lattice, for comparison.
    fn expected_within(pos: Vec2, radius: f32, store: &VisibilityStore) -> HashSet<Cell> {
        let size = Vec2::new(metrics().width, metrics().height);
        let mut cells = HashSet::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                let cell = Cell::new(row, col);
                if cell.center(size).distance(pos) <= radius && !store.is_reserved(cell) {
                    cells.insert(cell);
                }
            }
        }
        cells
    }

    #[test]
    fn reveals_exactly_cells_within_radius() {
        let store = VisibilityStore::new();
        let pos = Vec2::new(100.0, 50.0);
        let got = cells_within(pos, 12.0, &metrics(), ROWS, COLS, &store);
        assert_eq!(got, expected_within(pos, 12.0, &store));
        let expected: HashSet<Cell> = [Cell::new(2, 9), Cell::new(2, 10)].into_iter().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn reserved_cells_excluded_even_within_radius() {
        let mut store = VisibilityStore::new();
        store.replace_reserved([Cell::new(2, 10)].into_iter().collect());
        let pos = Vec2::new(100.0, 50.0);
        let got = cells_within(pos, 12.0, &metrics(), ROWS, COLS, &store);
        assert_eq!(got, [Cell::new(2, 9)].into_iter().collect());
        assert_eq!(got, expected_within(pos, 12.0, &store));
    }

    #[test]
    fn matches_brute_force_across_positions() {
        let store = VisibilityStore::new();
        for &(x, y) in &[(0.0, 0.0), (5.0, 10.0), (1599.0, 1199.0), (733.3, 411.7), (-30.0, 40.0)] {
            let pos = Vec2::new(x, y);
            assert_eq!(
                cells_within(pos, 25.0, &metrics(), ROWS, COLS, &store),
                expected_within(pos, 25.0, &store),
                "at {:?}",
                pos
            );
        }
    }

    #[test]
    fn far_outside_grid_reveals_nothing() {
        let store = VisibilityStore::new();
        let got = cells_within(Vec2::new(-500.0, -500.0), 12.0, &metrics(), ROWS, COLS, &store);
        assert!(got.is_empty());
    }

    #[test]
    fn unmeasured_metrics_reveal_nothing() {
        let store = VisibilityStore::new();
        let zero = CellMetrics { width: 0.0, height: 0.0 };
        assert!(cells_within(Vec2::new(10.0, 10.0), 12.0, &zero, ROWS, COLS, &store).is_empty());
    }

    #[test]
    fn move_diffs_against_previous_set() {
        let reveal = PointerReveal::new(12.0);
        let mut store = VisibilityStore::new();

        let first = reveal.pointer_moved(Vec2::new(100.0, 50.0), &origin(), &metrics(), ROWS, COLS, &mut store);
        assert_eq!(first.shown, vec![Cell::new(2, 9), Cell::new(2, 10)]);
        assert!(first.hidden.is_empty());

        // One cell to the right: column 9 leaves, column 11 enters, column 10 untouched
        let second = reveal.pointer_moved(Vec2::new(110.0, 50.0), &origin(), &metrics(), ROWS, COLS, &mut store);
        assert_eq!(second.shown, vec![Cell::new(2, 11)]);
        assert_eq!(second.hidden, vec![Cell::new(2, 9)]);
    }

    #[test]
    fn same_position_twice_is_a_no_op() {
        let reveal = PointerReveal::new(12.0);
        let mut store = VisibilityStore::new();
        reveal.pointer_moved(Vec2::new(100.0, 50.0), &origin(), &metrics(), ROWS, COLS, &mut store);
        let before = store.revealed().clone();
        let again = reveal.pointer_moved(Vec2::new(100.0, 50.0), &origin(), &metrics(), ROWS, COLS, &mut store);
        assert!(again.is_empty());
        assert_eq!(store.revealed(), &before);
    }

    #[test]
    fn grid_offset_is_subtracted() {
        let reveal = PointerReveal::new(12.0);
        let mut store = VisibilityStore::new();
        let shifted = Viewport { offset_x: 40.0, offset_y: 100.0, ..origin() };
        let diff = reveal.pointer_moved(Vec2::new(140.0, 150.0), &shifted, &metrics(), ROWS, COLS, &mut store);
        assert_eq!(diff.shown, vec![Cell::new(2, 9), Cell::new(2, 10)]);
    }

    #[test]
    fn touch_end_clears_everything() {
        let reveal = PointerReveal::new(12.0);
        let mut store = VisibilityStore::new();
        reveal.pointer_moved(Vec2::new(100.0, 50.0), &origin(), &metrics(), ROWS, COLS, &mut store);
        let diff = reveal.touch_ended(&mut store);
        assert_eq!(diff.hidden.len(), 2);
        assert!(store.revealed().is_empty());
    }
}
