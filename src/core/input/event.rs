//=========================================================================
// Input Event Types
//
// Defines the engine-side representation of keyboard events.
//
// The platform layer (winit) converts its key events into these types
// before handing them to the core thread, so nothing past the channel
// depends on the windowing backend.
//
// Responsibilities:
// - Represent physical keys in a stable, portable way
// - Map lane-row characters onto physical keys (`KeyCode::from_char`)
// - Provide equality and hashing for held-key sets
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    HeldKeys (applied as events arrive)
//         ↓
//    InputLayer (sampled once per frame → gestures)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
///
/// Coverage:
/// - Alphanumeric keys (A-Z, 0-9)
/// - Arrow keys
/// - Common special keys (Space, Enter, Escape, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys the platform reports but this enum does not cover.
    Unidentified
}

//--- Implementation ------------------------------------------------------

impl KeyCode {
    const LETTERS: [KeyCode; 26] = [
        Self::KeyA, Self::KeyB, Self::KeyC, Self::KeyD, Self::KeyE, Self::KeyF,
        Self::KeyG, Self::KeyH, Self::KeyI, Self::KeyJ, Self::KeyK, Self::KeyL,
        Self::KeyM, Self::KeyN, Self::KeyO, Self::KeyP, Self::KeyQ, Self::KeyR,
        Self::KeyS, Self::KeyT, Self::KeyU, Self::KeyV, Self::KeyW, Self::KeyX,
        Self::KeyY, Self::KeyZ,
    ];

    const DIGITS: [KeyCode; 10] = [
        Self::Digit0, Self::Digit1, Self::Digit2, Self::Digit3, Self::Digit4,
        Self::Digit5, Self::Digit6, Self::Digit7, Self::Digit8, Self::Digit9,
    ];

    /// Maps a character to the key that produces it on a QWERTY layout.
    ///
    /// Letters are matched case-insensitively. Returns `None` for
    /// characters without a dedicated key.
    ///
    /// ```rust
    /// use ringbeat::core::input::KeyCode;
    ///
    /// assert_eq!(KeyCode::from_char('w'), Some(KeyCode::KeyW));
    /// assert_eq!(KeyCode::from_char('W'), Some(KeyCode::KeyW));
    /// assert_eq!(KeyCode::from_char('?'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            letter @ 'A'..='Z' => Some(Self::LETTERS[(letter as u8 - b'A') as usize]),
            digit @ '0'..='9' => Some(Self::DIGITS[(digit as u8 - b'0') as usize]),
            ' ' => Some(Self::Space),
            _ => None,
        }
    }
}

//=== InputEvent ==========================================================

/// Low-level keyboard event from the platform layer.
///
/// Key repeat is filtered out by the platform; a held key produces one
/// `KeyDown` and one `KeyUp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown(KeyCode),

    /// Key released.
    KeyUp(KeyCode),

    /// Unrecognized or unsupported event, ignored by the input layers.
    Unidentified
}

impl InputEvent {
    /// The key this event is about, if any.
    pub fn key(&self) -> Option<KeyCode> {
        match self {
            Self::KeyDown(key) | Self::KeyUp(key) => Some(*key),
            Self::Unidentified => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    //--- Test Helpers -----------------------------------------------------

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    //=====================================================================
    // from_char Tests
    //=====================================================================

    /// Both lane rows map onto distinct letter keys.
    #[test]
    fn from_char_covers_lane_rows() {
        let keys: Vec<_> = "WERTYUIOSDFGHJKL".chars().filter_map(KeyCode::from_char).collect();
        assert_eq!(keys.len(), 16);
        assert_eq!(keys[0], KeyCode::KeyW);
        assert_eq!(keys[15], KeyCode::KeyL);
    }

    #[test]
    fn from_char_is_case_insensitive() {
        for c in 'a'..='z' {
            assert_eq!(KeyCode::from_char(c), KeyCode::from_char(c.to_ascii_uppercase()));
        }
    }

    #[test]
    fn from_char_maps_digits_and_space() {
        assert_eq!(KeyCode::from_char('0'), Some(KeyCode::Digit0));
        assert_eq!(KeyCode::from_char('9'), Some(KeyCode::Digit9));
        assert_eq!(KeyCode::from_char(' '), Some(KeyCode::Space));
    }

    #[test]
    fn from_char_rejects_unmapped_characters() {
        assert_eq!(KeyCode::from_char(';'), None);
        assert_eq!(KeyCode::from_char('é'), None);
    }

    //=====================================================================
    // InputEvent Tests
    //=====================================================================

    #[test]
    fn equality_different_discriminant() {
        assert_ne!(InputEvent::KeyDown(KeyCode::KeyA), InputEvent::KeyUp(KeyCode::KeyA));
    }

    #[test]
    fn hash_different_keys() {
        let a = InputEvent::KeyDown(KeyCode::KeyA);
        let b = InputEvent::KeyDown(KeyCode::KeyB);
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn key_accessor() {
        assert_eq!(InputEvent::KeyUp(KeyCode::KeyS).key(), Some(KeyCode::KeyS));
        assert_eq!(InputEvent::Unidentified.key(), None);
    }
}
