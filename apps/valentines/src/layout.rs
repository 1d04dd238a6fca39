//! Where the message and buttons sit in grid coordinates, and which cells
//! they cover.

use std::collections::HashSet;

use lovegrid_engine::Cell;
use serde::Serialize;

use crate::config::GridConfig;

/// Rendered size of one glyph cell, measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl CellMetrics {
    /// Zero or negative sizes mean the host has not laid out the grid yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Visible area and where the grid container sits inside it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Greedy word wrap to `width` characters.
///
/// Words are never split: one longer than `width` gets a line of its own.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += word_len;
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}

/// Wrap width for the current viewport: fixed when wide, derived from the
/// visible column count when narrow.
pub fn wrap_width(viewport: &Viewport, metrics: &CellMetrics, config: &GridConfig) -> usize {
    let layout = &config.layout;
    if !config.is_narrow(viewport.width) {
        return layout.wide_wrap_chars;
    }
    let visible_cols = (viewport.width / metrics.width).floor().max(0.0) as usize;
    visible_cols
        .saturating_sub(2 * layout.narrow_margin_cols)
        .max(layout.min_wrap_chars)
}

/// One wrapped message line and its first cell. Coordinates may fall
/// outside the lattice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    NewMessage,
    Share,
}

/// Button footprint: `width` cells starting at (`row`, `col`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedButton {
    pub kind: ButtonKind,
    pub row: i64,
    pub col: i64,
    pub width: u32,
}

/// Resolved positions for one message on one viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub center_row: i64,
    pub center_col: i64,
    pub start_row: i64,
    /// Pixel offset of `start_row` from the top of the grid.
    pub top_px: f32,
    pub lines: Vec<PlacedLine>,
    pub button_row: i64,
    pub buttons: Vec<PlacedButton>,
    /// Buttons stacked vertically (narrow viewport).
    pub stacked: bool,
    #[serde(skip)]
    pub reserved: HashSet<Cell>,
}

fn start_col(center: i64, len: usize) -> i64 {
    (center as f64 - len as f64 / 2.0).floor() as i64
}

fn reserve_span(reserved: &mut HashSet<Cell>, row: i64, col: i64, width: u32, rows: u32, cols: u32) {
    if row < 0 || row >= rows as i64 {
        return;
    }
    for c in col..col + width as i64 {
        if c >= 0 && c < cols as i64 {
            reserved.insert(Cell::new(row as u32, c as u32));
        }
    }
}

/// Place `lines` and the two buttons for this viewport.
///
/// Every line is centered on its own (ragged edges are expected). Cells
/// outside `[0, rows) × [0, cols)` are left out of the reserved set rather
/// than clamped.
pub fn compute_layout(
    lines: &[String],
    metrics: &CellMetrics,
    viewport: &Viewport,
    config: &GridConfig,
) -> Layout {
    let layout_cfg = &config.layout;
    let (rows, cols) = (config.rows, config.cols);

    let visible_cols = viewport.width / metrics.width;
    let visible_rows = viewport.height / metrics.height;
    let center_col = (visible_cols / 2.0).floor() as i64;
    let center_row = (visible_rows / 2.0).floor() as i64;

    let start_row = (center_row as f64 - lines.len() as f64 / 2.0).floor() as i64;
    let mut reserved = HashSet::new();

    let placed: Vec<PlacedLine> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let len = text.chars().count();
            let line = PlacedLine {
                text: text.clone(),
                row: start_row + i as i64,
                col: start_col(center_col, len),
            };
            reserve_span(&mut reserved, line.row, line.col, len as u32, rows, cols);
            line
        })
        .collect();

    let stacked = config.is_narrow(viewport.width);
    let offset = if stacked {
        layout_cfg.narrow_button_offset_rows
    } else {
        layout_cfg.wide_button_offset_rows
    };
    let button_row = visible_rows.floor() as i64 - offset as i64;

    let pad = 2 * layout_cfg.button_padding_cols;
    let new_width = layout_cfg.new_label.chars().count() as u32 + pad;
    // The share button swaps to its confirmation label; reserve room for either
    let share_width = layout_cfg
        .share_label
        .chars()
        .count()
        .max(layout_cfg.copied_label.chars().count()) as u32
        + pad;

    let buttons = if stacked {
        vec![
            PlacedButton {
                kind: ButtonKind::NewMessage,
                row: button_row,
                col: start_col(center_col, new_width as usize),
                width: new_width,
            },
            PlacedButton {
                kind: ButtonKind::Share,
                row: button_row + layout_cfg.stack_gap_rows as i64,
                col: start_col(center_col, share_width as usize),
                width: share_width,
            },
        ]
    } else {
        let total = new_width + layout_cfg.button_gap_cols + share_width;
        let first = start_col(center_col, total as usize);
        vec![
            PlacedButton {
                kind: ButtonKind::NewMessage,
                row: button_row,
                col: first,
                width: new_width,
            },
            PlacedButton {
                kind: ButtonKind::Share,
                row: button_row,
                col: first + (new_width + layout_cfg.button_gap_cols) as i64,
                width: share_width,
            },
        ]
    };

    for button in &buttons {
        reserve_span(&mut reserved, button.row, button.col, button.width, rows, cols);
    }

    Layout {
        center_row,
        center_col,
        start_row,
        top_px: start_row as f32 * metrics.height,
        lines: placed,
        button_row,
        buttons,
        stacked,
        reserved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CellMetrics {
        CellMetrics { width: 10.0, height: 20.0 }
    }

    fn wide() -> Viewport {
        Viewport { width: 1000.0, height: 600.0, ..Viewport::default() }
    }

    fn narrow() -> Viewport {
        Viewport { width: 400.0, height: 800.0, ..Viewport::default() }
    }

    #[test]
    fn wrap_is_greedy() {
        let lines = wrap_lines("you are the gradient to my descent", 12);
        assert_eq!(lines, vec!["you are the", "gradient to", "my descent"]);
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        let lines = wrap_lines("a backpropagation b", 5);
        assert_eq!(lines, vec!["a", "backpropagation", "b"]);
    }

    #[test]
    fn wrap_empty_text() {
        assert!(wrap_lines("   ", 10).is_empty());
    }

    #[test]
    fn wrap_width_depends_on_breakpoint() {
        let config = GridConfig::default();
        assert_eq!(wrap_width(&wide(), &metrics(), &config), 40);
        // 40 visible columns minus 3 on each side
        assert_eq!(wrap_width(&narrow(), &metrics(), &config), 34);
        let tiny = Viewport { width: 100.0, ..narrow() };
        assert_eq!(wrap_width(&tiny, &metrics(), &config), 12);
    }

    #[test]
    fn lines_center_independently() {
        let config = GridConfig::default();
        let lines = vec!["abcd".to_string(), "abcdefg".to_string()];
        let layout = compute_layout(&lines, &metrics(), &wide(), &config);
        // 100 visible columns, 30 visible rows
        assert_eq!(layout.center_col, 50);
        assert_eq!(layout.center_row, 15);
        assert_eq!(layout.start_row, 14);
        assert_eq!(layout.top_px, 280.0);
        assert_eq!(layout.lines[0].col, 48);
        assert_eq!(layout.lines[1].col, 46); // floor(50 - 3.5)
        assert_eq!(layout.lines[1].row, 15);
        assert!(layout.reserved.contains(&Cell::new(14, 48)));
        assert!(layout.reserved.contains(&Cell::new(14, 51)));
        assert!(!layout.reserved.contains(&Cell::new(14, 52)));
        assert!(layout.reserved.contains(&Cell::new(15, 52)));
    }

    #[test]
    fn wide_buttons_side_by_side() {
        let config = GridConfig::default();
        let layout = compute_layout(&[], &metrics(), &wide(), &config);
        assert!(!layout.stacked);
        assert_eq!(layout.button_row, 30 - 4);
        let [new, share] = [layout.buttons[0], layout.buttons[1]];
        assert_eq!(new.row, share.row);
        // "new valentine" + 2 padding, "copied!" + 2 padding
        assert_eq!(new.width, 15);
        assert_eq!(share.width, 9);
        assert_eq!(share.col, new.col + 15 + 2);
        assert_eq!(new.col, 50 - 13);
    }

    #[test]
    fn narrow_buttons_stack_higher() {
        let config = GridConfig::default();
        let layout = compute_layout(&[], &metrics(), &narrow(), &config);
        assert!(layout.stacked);
        assert_eq!(layout.button_row, 40 - 7);
        assert_eq!(layout.buttons[1].row, layout.buttons[0].row + 2);
        assert_eq!(layout.buttons[0].col, 20 - 8); // floor(20 - 7.5)
        assert_eq!(layout.buttons[1].col, 20 - 5); // floor(20 - 4.5)
    }

    #[test]
    fn off_grid_cells_are_dropped_not_clamped() {
        let config = GridConfig { rows: 10, cols: 20, ..GridConfig::default() };
        let lines = vec!["x".repeat(30)];
        let layout = compute_layout(&lines, &metrics(), &wide(), &config);
        // Line would start at column 35 on row 14, entirely outside 10x20
        assert_eq!(layout.lines[0].col, 35);
        assert!(layout.reserved.is_empty());
        assert!(layout.reserved.iter().all(|c| c.in_bounds(10, 20)));
    }

    #[test]
    fn partially_visible_line_keeps_in_bounds_cells() {
        let config = GridConfig { rows: 60, cols: 50, ..GridConfig::default() };
        let lines = vec!["y".repeat(10)];
        let layout = compute_layout(&lines, &metrics(), &wide(), &config);
        // Columns 45..55, only 45..50 exist
        let on_line: Vec<_> = layout.reserved.iter().filter(|c| c.row == 14).collect();
        assert_eq!(on_line.len(), 5);
    }
}
