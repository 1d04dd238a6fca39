/// Shared buffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Patches: max_patches × 4 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_PATCHES: usize = 2;
pub const HEADER_PATCH_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per cell patch: row, col, alpha, source (fixed wire format).
pub const PATCH_FLOATS: usize = 4;

/// Floats per game event: kind, a, b, c (fixed wire format).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum cell patches per frame.
    pub max_patches: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    /// Size of patch data section in floats.
    pub patch_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where patch data begins.
    pub patch_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_patches: usize, max_events: usize) -> Self {
        let patch_data_floats = max_patches * PATCH_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let patch_data_offset = HEADER_FLOATS;
        let event_data_offset = patch_data_offset + patch_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_patches,
            max_events,
            patch_data_floats,
            event_data_floats,
            patch_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_patches, config.max_events)
    }

    /// Header values for a frame, indexed by the `HEADER_*` constants.
    pub fn header(&self, frame: u32, patch_count: u32, event_count: u32) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = frame as f32;
        header[HEADER_MAX_PATCHES] = self.max_patches as f32;
        header[HEADER_PATCH_COUNT] = patch_count.min(self.max_patches as u32) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count.min(self.max_events as u32) as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header
    }
}
