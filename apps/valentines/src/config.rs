use std::fmt;

use serde::Deserialize;

/// Largest lattice accepted from a config override.
pub const MAX_CELLS: usize = 1 << 20;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyGrid,
    TooLarge { rows: u32, cols: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "malformed config: {}", e),
            ConfigError::EmptyGrid => write!(f, "grid needs at least one row and one column"),
            ConfigError::TooLarge { rows, cols } => {
                write!(f, "{}x{} grid exceeds {} cells", rows, cols, MAX_CELLS)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Tunables for the grid, its overlay and the twinkle effect.
///
/// Every field has a default matching the shipped site, so a host-supplied
/// `"config"` resource only needs the fields it wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Lattice rows.
    pub rows: u32,
    /// Lattice columns.
    pub cols: u32,
    /// Repeating glyph tiled across the lattice.
    pub pattern: String,
    /// Pointer reveal radius in pixels.
    pub reveal_radius: f32,
    /// Viewport widths below this are laid out for narrow screens.
    pub breakpoint_px: f32,
    pub layout: LayoutConfig,
    pub twinkle: TwinkleConfig,
    /// Seconds the "copied" confirmation stays up after a share.
    pub share_confirm_secs: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 60,
            cols: 160,
            pattern: "<3".to_string(),
            reveal_radius: 12.0,
            breakpoint_px: 768.0,
            layout: LayoutConfig::default(),
            twinkle: TwinkleConfig::default(),
            share_confirm_secs: 2.0,
        }
    }
}

impl GridConfig {
    /// Parse a config override from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject grids that are empty or too large to allocate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        match (self.rows as usize).checked_mul(self.cols as usize) {
            Some(cells) if cells <= MAX_CELLS => Ok(()),
            _ => Err(ConfigError::TooLarge { rows: self.rows, cols: self.cols }),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn is_narrow(&self, viewport_width: f32) -> bool {
        viewport_width < self.breakpoint_px
    }
}

/// Message and button placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wrap width (characters) on wide viewports.
    pub wide_wrap_chars: usize,
    /// Columns kept clear on each side of the message on narrow viewports.
    pub narrow_margin_cols: usize,
    /// Narrow wrap width never drops below this.
    pub min_wrap_chars: usize,
    /// Rows between the bottom of the viewport and the button row.
    pub wide_button_offset_rows: u32,
    pub narrow_button_offset_rows: u32,
    /// Columns between the two buttons when side by side.
    pub button_gap_cols: u32,
    /// Rows between stacked buttons.
    pub stack_gap_rows: u32,
    /// Extra reserved columns on each side of a button label (border + padding).
    pub button_padding_cols: u32,
    pub new_label: String,
    pub share_label: String,
    pub copied_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wide_wrap_chars: 40,
            narrow_margin_cols: 3,
            min_wrap_chars: 12,
            wide_button_offset_rows: 4,
            narrow_button_offset_rows: 7,
            button_gap_cols: 2,
            stack_gap_rows: 2,
            button_padding_cols: 1,
            new_label: "new valentine".to_string(),
            share_label: "share".to_string(),
            copied_label: "copied!".to_string(),
        }
    }
}

/// Ambient twinkle timing and density.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TwinkleConfig {
    pub fade_in_secs: f32,
    pub hold_secs: f32,
    pub fade_out_secs: f32,
    /// Fraction of visible heart pairs twinkling at once on wide viewports.
    pub wide_density: f32,
    /// Higher on narrow viewports, which show fewer glyphs.
    pub narrow_density: f32,
}

impl Default for TwinkleConfig {
    fn default() -> Self {
        Self {
            fade_in_secs: 0.8,
            hold_secs: 1.2,
            fade_out_secs: 0.8,
            wide_density: 0.015,
            narrow_density: 0.04,
        }
    }
}

impl TwinkleConfig {
    pub fn cycle_secs(&self) -> f32 {
        self.fade_in_secs + self.hold_secs + self.fade_out_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site() {
        let config = GridConfig::default();
        assert_eq!((config.rows, config.cols), (60, 160));
        assert_eq!(config.pattern, "<3");
        assert_eq!(config.reveal_radius, 12.0);
        assert_eq!(config.breakpoint_px, 768.0);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config = GridConfig::from_json(r#"{ "rows": 10, "twinkle": { "hold_secs": 3.0 } }"#).unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 160);
        assert_eq!(config.twinkle.hold_secs, 3.0);
        assert_eq!(config.twinkle.fade_in_secs, 0.8);
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(matches!(
            GridConfig::from_json(r#"{ "rows": "many" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = GridConfig::from_json(r#"{ "rows": 70000, "cols": 70000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { rows: 70000, cols: 70000 }));
        assert!(GridConfig::from_json(r#"{ "rows": 1024, "cols": 1024 }"#).is_ok());
        assert!(GridConfig::from_json(r#"{ "rows": 1024, "cols": 1025 }"#).is_err());
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(GridConfig::from_json(r#"{ "rows": 0 }"#), Err(ConfigError::EmptyGrid)));
        assert!(matches!(GridConfig::from_json(r#"{ "cols": 0 }"#), Err(ConfigError::EmptyGrid)));
    }

    #[test]
    fn breakpoint_is_exclusive() {
        let config = GridConfig::default();
        assert!(config.is_narrow(767.0));
        assert!(!config.is_narrow(768.0));
    }
}
