//! Static glyph lattice and the heart positions inside it.
//!
//! Built once from configuration and shared by reference; nothing here
//! changes after construction.

use lovegrid_engine::Cell;

/// R×C grid of glyph characters, row-major.
///
/// Row `r` is the pattern shifted by `r`, so the glyphs run diagonally:
/// `lattice[r][c] = pattern[(c + r) % len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    rows: u32,
    cols: u32,
    chars: Vec<char>,
}

impl Lattice {
    pub fn build(rows: u32, cols: u32, pattern: &str) -> Self {
        let glyph: Vec<char> = pattern.chars().collect();
        let mut chars = Vec::with_capacity(rows as usize * cols as usize);
        for r in 0..rows {
            for c in 0..cols {
                let ch = if glyph.is_empty() {
                    ' '
                } else {
                    glyph[(c as usize + r as usize) % glyph.len()]
                };
                chars.push(ch);
            }
        }
        Self { rows, cols, chars }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn get(&self, row: u32, col: u32) -> Option<char> {
        if row < self.rows && col < self.cols {
            Some(self.chars[row as usize * self.cols as usize + col as usize])
        } else {
            None
        }
    }

    pub fn row_text(&self, row: u32) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row as usize * self.cols as usize;
        self.chars[start..start + self.cols as usize].iter().collect()
    }

    /// All rows joined with `\n`, for the host to render once.
    pub fn to_text(&self) -> String {
        (0..self.rows)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Start of one complete glyph instance: `(row, col)` through `col + len - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeartPos {
    pub row: u32,
    pub col: u32,
}

impl HeartPos {
    /// The cells making up this glyph instance.
    pub fn cells(self, len: u32) -> impl Iterator<Item = Cell> {
        (self.col..self.col + len).map(move |c| Cell::new(self.row, c))
    }
}

/// Every position where `pattern` appears in full, scanning each row left
/// to right, rows top to bottom. A match must fit inside its row.
pub fn find_heart_positions(lattice: &Lattice, pattern: &str) -> Vec<HeartPos> {
    let glyph: Vec<char> = pattern.chars().collect();
    let len = glyph.len() as u32;
    if len == 0 || len > lattice.cols() {
        return Vec::new();
    }

    let mut hearts = Vec::new();
    for row in 0..lattice.rows() {
        for col in 0..=(lattice.cols() - len) {
            let matches = glyph
                .iter()
                .enumerate()
                .all(|(i, &ch)| lattice.get(row, col + i as u32) == Some(ch));
            if matches {
                hearts.push(HeartPos { row, col });
            }
        }
    }
    hearts
}

/// Lattice plus its precomputed heart positions.
#[derive(Debug, Clone)]
pub struct GridModel {
    lattice: Lattice,
    glyph_len: u32,
    hearts: Vec<HeartPos>,
}

impl GridModel {
    pub fn build(rows: u32, cols: u32, pattern: &str) -> Self {
        let lattice = Lattice::build(rows, cols, pattern);
        let hearts = find_heart_positions(&lattice, pattern);
        log::debug!("lattice {}x{}: {} heart positions", rows, cols, hearts.len());
        Self {
            lattice,
            glyph_len: pattern.chars().count() as u32,
            hearts,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn hearts(&self) -> &[HeartPos] {
        &self.hearts
    }

    /// Cells per glyph instance (2 for `<3`).
    pub fn glyph_len(&self) -> u32 {
        self.glyph_len
    }

    pub fn rows(&self) -> u32 {
        self.lattice.rows()
    }

    pub fn cols(&self) -> u32 {
        self.lattice.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_is_deterministic() {
        let a = Lattice::build(60, 160, "<3");
        let b = Lattice::build(60, 160, "<3");
        for r in 0..60 {
            for c in 0..160 {
                assert_eq!(a.get(r, c), b.get(r, c));
            }
        }
    }

    #[test]
    fn rows_shift_diagonally() {
        let lattice = Lattice::build(3, 6, "<3");
        assert_eq!(lattice.row_text(0), "<3<3<3");
        assert_eq!(lattice.row_text(1), "3<3<3<");
        assert_eq!(lattice.row_text(2), "<3<3<3");
        assert_eq!(lattice.to_text(), "<3<3<3\n3<3<3<\n<3<3<3");
    }

    #[test]
    fn out_of_range_get_is_none() {
        let lattice = Lattice::build(2, 2, "<3");
        assert_eq!(lattice.get(2, 0), None);
        assert_eq!(lattice.get(0, 2), None);
        assert_eq!(lattice.row_text(5), "");
    }

    #[test]
    fn row_zero_hearts_on_even_columns() {
        let model = GridModel::build(60, 160, "<3");
        let row0: Vec<u32> = model.hearts().iter().filter(|h| h.row == 0).map(|h| h.col).collect();
        let expected: Vec<u32> = (0..160).step_by(2).collect();
        assert_eq!(row0, expected);
    }

    #[test]
    fn last_column_never_starts_a_pair() {
        let model = GridModel::build(60, 160, "<3");
        // Row 1 has '<' at column 159, but its '3' would fall off the row
        assert_eq!(model.lattice().get(1, 159), Some('<'));
        assert!(model.hearts().iter().all(|h| h.col != 159));
        let row1: Vec<u32> = model.hearts().iter().filter(|h| h.row == 1).map(|h| h.col).collect();
        assert_eq!(row1.first(), Some(&1));
        assert_eq!(row1.last(), Some(&157));
    }

    #[test]
    fn pairs_are_adjacent_and_within_a_row() {
        let model = GridModel::build(60, 160, "<3");
        for heart in model.hearts() {
            let cells: Vec<Cell> = heart.cells(model.glyph_len()).collect();
            assert_eq!(cells.len(), 2);
            assert_eq!(cells[0].row, cells[1].row);
            assert_eq!(cells[1].col, cells[0].col + 1);
            assert!(cells[1].col < 160);
            assert_eq!(model.lattice().get(cells[0].row, cells[0].col), Some('<'));
            assert_eq!(model.lattice().get(cells[1].row, cells[1].col), Some('3'));
        }
        // 80 per even row, 79 per odd row
        assert_eq!(model.hearts().len(), 30 * 80 + 30 * 79);
    }

    #[test]
    fn empty_pattern_has_no_hearts() {
        let model = GridModel::build(4, 4, "");
        assert!(model.hearts().is_empty());
        assert_eq!(model.lattice().get(0, 0), Some(' '));
    }
}
