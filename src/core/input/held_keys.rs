//=========================================================================
// Held Keys
//=========================================================================
//
// Set of physically held keys.
//
// Architecture:
//   InputEvent → apply() → HashSet<KeyCode> → is_held() (sampled per frame)
//
// Events are applied as they arrive; interpretation only happens when an
// input layer samples the set on the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};

//=== HeldKeys ============================================================

/// Keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<KeyCode>,
}

impl HeldKeys {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    /// Applies one event. Returns `true` if the held set changed.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(key) => self.keys.insert(*key),
            InputEvent::KeyUp(key) => self.keys.remove(key),
            InputEvent::Unidentified => false,
        }
    }

    /// Applies a batch of events in order.
    pub fn apply_all(&mut self, events: &[InputEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Releases every key (e.g. on focus loss).
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Returns `true` while `key` is held.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over the held keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
