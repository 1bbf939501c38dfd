//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages and errors crossing the platform/core thread boundary.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform thread to the core thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformEvent {
    /// Key events gathered during one redraw, in arrival order.
    Inputs(Vec<InputEvent>),

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn platform_error_names_the_failing_stage() {
        let creation = PlatformError::EventLoopCreation("no display".into());
        let execution = PlatformError::EventLoopExecution("lost surface".into());

        assert_eq!(creation.to_string(), "Event loop creation failed: no display");
        assert_eq!(execution.to_string(), "Event loop error: lost surface");
    }

    #[test]
    fn input_batches_keep_event_order() {
        let event = PlatformEvent::Inputs(vec![
            InputEvent::KeyDown(KeyCode::KeyS),
            InputEvent::KeyUp(KeyCode::KeyS),
        ]);

        match event {
            PlatformEvent::Inputs(batch) => {
                assert_eq!(batch[0], InputEvent::KeyDown(KeyCode::KeyS));
                assert_eq!(batch[1], InputEvent::KeyUp(KeyCode::KeyS));
            }
            other => panic!("Expected Inputs, got {:?}", other),
        }
    }
}
