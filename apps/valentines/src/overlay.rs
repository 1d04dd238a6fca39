//! Host-facing overlay state. The host renders the message text and the two
//! buttons from this; nothing here touches the cell sets.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::layout::{ButtonKind, CellMetrics, Layout, PlacedLine};
use crate::messages::Message;

/// Countdown for the "copied" label after a successful share.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareConfirm {
    remaining: f32,
}

impl ShareConfirm {
    pub fn activate(&mut self, secs: f32) {
        self.remaining = secs.max(0.0);
    }

    /// Advance the countdown. Returns true on the step it runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub kind: ButtonKind,
    pub label: String,
    pub row: i64,
    pub col: i64,
    pub width: u32,
    pub left_px: f32,
    pub top_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayState {
    pub loading: bool,
    pub message: Option<Message>,
    pub lines: Vec<PlacedLine>,
    pub top_px: f32,
    pub buttons: Vec<ButtonView>,
    pub stacked: bool,
    pub copied: bool,
    pub share_url: Option<String>,
}

impl OverlayState {
    /// Nothing to show until the message collection arrives.
    pub fn loading() -> Self {
        Self {
            loading: true,
            message: None,
            lines: Vec::new(),
            top_px: 0.0,
            buttons: Vec::new(),
            stacked: false,
            copied: false,
            share_url: None,
        }
    }

    /// Overlay for `message`. Without a layout (metrics not measured yet)
    /// only the message itself is reported.
    pub fn build(
        message: &Message,
        layout: Option<(&Layout, &CellMetrics)>,
        labels: &LayoutConfig,
        copied: bool,
        share_url: Option<String>,
    ) -> Self {
        let mut state = Self {
            loading: false,
            message: Some(message.clone()),
            copied,
            share_url,
            ..Self::loading()
        };
        let Some((layout, metrics)) = layout else {
            return state;
        };

        state.lines = layout.lines.clone();
        state.top_px = layout.top_px;
        state.stacked = layout.stacked;
        state.buttons = layout
            .buttons
            .iter()
            .map(|b| ButtonView {
                kind: b.kind,
                label: match b.kind {
                    ButtonKind::NewMessage => labels.new_label.clone(),
                    ButtonKind::Share if copied => labels.copied_label.clone(),
                    ButtonKind::Share => labels.share_label.clone(),
                },
                row: b.row,
                col: b.col,
                width: b.width,
                left_px: b.col as f32 * metrics.width,
                top_px: b.row as f32 * metrics.height,
            })
            .collect();
        state
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::layout::{compute_layout, Viewport};

    fn message() -> Message {
        Message { id: 4, text: "attention is all i need".to_string() }
    }

    #[test]
    fn confirm_counts_down_once() {
        let mut confirm = ShareConfirm::default();
        assert!(!confirm.tick(0.5));
        confirm.activate(1.0);
        assert!(confirm.is_active());
        assert!(!confirm.tick(0.6));
        assert!(confirm.tick(0.6));
        assert!(!confirm.is_active());
        assert!(!confirm.tick(0.6));
    }

    #[test]
    fn loading_state_serializes() {
        let json = OverlayState::loading().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["loading"], true);
        assert!(value["message"].is_null());
    }

    #[test]
    fn share_label_swaps_when_copied() {
        let config = GridConfig::default();
        let metrics = CellMetrics { width: 10.0, height: 20.0 };
        let viewport = Viewport { width: 1000.0, height: 600.0, ..Viewport::default() };
        let layout = compute_layout(&["attention is all i need".to_string()], &metrics, &viewport, &config);

        let idle = OverlayState::build(&message(), Some((&layout, &metrics)), &config.layout, false, None);
        assert_eq!(idle.buttons[1].label, "share");
        assert_eq!(idle.buttons[0].left_px, idle.buttons[0].col as f32 * 10.0);

        let copied = OverlayState::build(&message(), Some((&layout, &metrics)), &config.layout, true, None);
        assert_eq!(copied.buttons[1].label, "copied!");
        assert_eq!(copied.buttons[0].label, "new valentine");
    }

    #[test]
    fn no_layout_reports_message_only() {
        let config = GridConfig::default();
        let state = OverlayState::build(&message(), None, &config.layout, false, None);
        assert!(!state.loading);
        assert!(state.lines.is_empty());
        assert!(state.buttons.is_empty());
        let json = state.to_json().unwrap();
        assert!(json.contains("attention is all i need"));
    }
}
