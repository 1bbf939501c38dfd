//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit keyboard events into engine InputEvents.
//
// Architecture:
//   Winit KeyEvent → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Tracks which keys it has reported down: OS key repeats and duplicate
// presses are filtered, and losing focus releases everything still down.
// Unmapped keys (F13-F24, numpad, media keys) are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    pressed: HashSet<KeyCode>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            pressed: HashSet::new(),
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit key event (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&mut self, key_event: &KeyEvent) -> Option<InputEvent> {
        self.process_key(key_event.physical_key, key_event.state, key_event.repeat)
    }

    /// Releases every key still reported down, in key order.
    pub(crate) fn release_all(&mut self) -> Vec<InputEvent> {
        let mut keys: Vec<KeyCode> = self.pressed.drain().collect();
        keys.sort();
        keys.into_iter().map(InputEvent::KeyUp).collect()
    }

    pub(crate) fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_key(
        &mut self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<InputEvent> {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key, KeyCode::Unidentified) || repeat {
            return None;
        }

        match state {
            ElementState::Pressed => self.pressed.insert(key).then_some(InputEvent::KeyDown(key)),
            ElementState::Released => self.pressed.remove(&key).then_some(InputEvent::KeyUp(key)),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Everything else returns
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    fn press(processor: &mut InputProcessor, code: WinitKeyCode) -> Option<InputEvent> {
        processor.process_key(PhysicalKey::Code(code), ElementState::Pressed, false)
    }

    fn release(processor: &mut InputProcessor, code: WinitKeyCode) -> Option<InputEvent> {
        processor.process_key(PhysicalKey::Code(code), ElementState::Released, false)
    }

    #[test]
    fn press_and_release_map_to_key_events() {
        let mut processor = InputProcessor::new();

        assert_eq!(press(&mut processor, WinitKeyCode::KeyS), Some(InputEvent::KeyDown(KeyCode::KeyS)));
        assert_eq!(release(&mut processor, WinitKeyCode::KeyS), Some(InputEvent::KeyUp(KeyCode::KeyS)));
        assert_eq!(processor.pressed_count(), 0);
    }

    #[test]
    fn os_repeats_are_filtered() {
        let mut processor = InputProcessor::new();
        press(&mut processor, WinitKeyCode::KeyD);

        let repeat = processor.process_key(
            PhysicalKey::Code(WinitKeyCode::KeyD),
            ElementState::Pressed,
            true,
        );

        assert_eq!(repeat, None);
        assert_eq!(processor.pressed_count(), 1);
    }

    #[test]
    fn duplicate_press_is_reported_once() {
        let mut processor = InputProcessor::new();

        assert!(press(&mut processor, WinitKeyCode::KeyF).is_some());
        assert_eq!(press(&mut processor, WinitKeyCode::KeyF), None);
    }

    #[test]
    fn release_without_press_is_dropped() {
        let mut processor = InputProcessor::new();

        assert_eq!(release(&mut processor, WinitKeyCode::KeyG), None);
    }

    #[test]
    fn unmapped_and_unidentified_keys_are_dropped() {
        let mut processor = InputProcessor::new();

        assert_eq!(press(&mut processor, WinitKeyCode::F13), None);
        let native = processor.process_key(
            PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            ElementState::Pressed,
            false,
        );
        assert_eq!(native, None);
        assert_eq!(processor.pressed_count(), 0);
    }

    #[test]
    fn release_all_lifts_every_pressed_key() {
        let mut processor = InputProcessor::new();
        press(&mut processor, WinitKeyCode::KeyK);
        press(&mut processor, WinitKeyCode::KeyJ);

        let released = processor.release_all();

        assert_eq!(
            released,
            vec![InputEvent::KeyUp(KeyCode::KeyJ), InputEvent::KeyUp(KeyCode::KeyK)]
        );
        assert_eq!(processor.pressed_count(), 0);
        assert!(processor.release_all().is_empty());
    }

    #[test]
    fn keycode_conversion_alphabetic() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
    }

    #[test]
    fn keycode_conversion_special() {
        assert_eq!(KeyCode::from(WinitKeyCode::Space), KeyCode::Space);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowLeft), KeyCode::ArrowLeft);
    }
}
