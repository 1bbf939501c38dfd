//=========================================================================
// Input Buffer
//
// Collects key events between two redraws so they cross to the core
// thread as one ordered batch.
//
// Notes:
// The buffer exists only for the current frame and is emptied by
// `drain()` at each redraw. Storage is kept across frames.
//=========================================================================

//=== Internal Modules ====================================================

use crate::core::input::event::InputEvent;

//=== InputBuffer Struct ==================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Event Handling ---------------------------------------------------

    /// Appends a key event. Order is preserved and nothing is coalesced.
    /// The held-key set applies a same-frame press and release before the
    /// next tick, so such a key is never sampled as held.
    pub(crate) fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub(crate) fn extend(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.events.extend(events);
    }

    //--- Drain ------------------------------------------------------------

    /// Returns this frame's events and empties the buffer, or `None` when
    /// nothing was buffered.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;

    #[test]
    fn drain_of_empty_buffer_is_none() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn quick_press_and_release_keep_order() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::KeyDown(KeyCode::KeyS));
        buffer.push(InputEvent::KeyUp(KeyCode::KeyS));

        assert_eq!(
            buffer.drain(),
            Some(vec![InputEvent::KeyDown(KeyCode::KeyS), InputEvent::KeyUp(KeyCode::KeyS)])
        );
    }

    #[test]
    fn drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.extend([InputEvent::KeyDown(KeyCode::KeyA), InputEvent::KeyDown(KeyCode::KeyB)]);
        assert_eq!(buffer.len(), 2);

        buffer.drain();

        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    //--- Memory Retention -------------------------------------------------

    #[test]
    fn drain_does_not_deallocate() {
        let mut buffer = InputBuffer::new();
        for _ in 0..256 {
            buffer.push(InputEvent::KeyDown(KeyCode::KeyA));
        }
        let capacity_before = buffer.events.capacity();

        buffer.drain();

        assert_eq!(buffer.events.capacity(), capacity_before);
    }
}
