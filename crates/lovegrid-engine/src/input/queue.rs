/// Input event types the engine understands.
/// Generic: no message or glyph semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A mouse cursor or touch contact moved to client coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A mouse button was released at client coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// The single tracked touch contact was lifted.
    TouchEnd,
    /// The viewport changed size, or the grid container moved.
    /// `offset_x/offset_y` is the grid container's position in client space.
    Viewport { width: f32, height: f32, offset_x: f32, offset_y: f32 },
    /// The host measured the rendered size of one glyph cell in pixels.
    CellMetrics { width: f32, height: f32 },
    /// A custom event from the UI layer (overlay buttons, clipboard results).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame,
/// strictly in arrival order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        // Consecutive moves collapse: only the latest pointer position matters.
        if let (Some(InputEvent::PointerMove { x: px, y: py }), InputEvent::PointerMove { x, y }) =
            (self.events.last_mut(), event)
        {
            *px = x;
            *py = y;
            return;
        }
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::CellMetrics { width: 10.0, height: 20.0 });
        q.push(InputEvent::TouchEnd);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn consecutive_moves_collapse() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 1.0, y: 1.0 });
        q.push(InputEvent::PointerMove { x: 2.0, y: 3.0 });
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain()[0], InputEvent::PointerMove { x: 2.0, y: 3.0 });
    }

    #[test]
    fn moves_around_other_events_keep_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 1.0, y: 1.0 });
        q.push(InputEvent::Viewport { width: 800.0, height: 600.0, offset_x: 0.0, offset_y: 0.0 });
        q.push(InputEvent::PointerMove { x: 5.0, y: 5.0 });
        let events = q.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], InputEvent::Viewport { .. }));
        assert_eq!(events[2], InputEvent::PointerMove { x: 5.0, y: 5.0 });
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        let events = q.drain();
        match events[0] {
            InputEvent::Custom { kind, a, b, c } => {
                assert_eq!(kind, 7);
                assert_eq!(a, 1.5);
                assert_eq!(b, 2.5);
                assert_eq!(c, 3.5);
            }
            _ => panic!("Expected Custom event"),
        }
    }
}
