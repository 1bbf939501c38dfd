//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via a channel.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector      │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  GameScene           │
//  │   ├─ Converts Winit keys │    │   ├─ handle_input    │
//  │   └─ Filters repeats     │    │   └─ animate         │
//  │   ↓                      │    │                      │
//  │  InputBuffer             │    └──────────────────────┘
//  │   ↓                      │             ↑
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Frame Boundary: RedrawRequested
//   → All buffered key events sent as one ordered batch
//   → Core interprets them at its own fixed TPS
//   → Empty buffers are not sent
//
// If the core thread is gone, flushes log a warning and drop the batch so
// the window can still be closed normally.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window manager and key event aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// batched key events to the core thread.
///
/// # Lifecycle
///
/// 1. `Platform::new(sender, title)`
/// 2. `platform.run()` starts the event loop
/// 3. Winit calls the `ApplicationHandler` methods
/// 4. Closing the window sends `WindowClosed` and exits the loop
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    title: String,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(event_sender: Sender<PlatformEvent>, title: impl Into<String>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.into(),
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop on the calling thread until the window
    /// closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered key events to the core thread as one batch.
    fn flush_input_buffer(&mut self) {
        let Some(batch) = self.buffer.drain() else {
            return;
        };
        let count = batch.len();

        trace!(target: "platform::input", "Flushing {} key events", count);

        if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
            warn!(
                target: "platform::input",
                "Channel disconnected, dropping {} key events",
                count
            );
        }
    }

    fn notify_closed(&self) {
        if self.event_sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Core thread already stopped");
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.notify_closed();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform::input", "Key event ignored");
                }
            }

            WindowEvent::Focused(false) => {
                let released = self.input_processor.release_all();
                if !released.is_empty() {
                    debug!(target: "platform::input", "Focus lost, releasing {} keys", released.len());
                    self.buffer.extend(released);
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{InputEvent, KeyCode};
    use crossbeam_channel::unbounded;

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = Platform::new(tx, "ringbeat");

        assert!(platform.window().is_none(), "Window should be created lazily");
        assert_eq!(platform.title, "ringbeat");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, "test");

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events_in_order() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, "test");

        platform.buffer.push(InputEvent::KeyDown(KeyCode::KeyS));
        platform.buffer.push(InputEvent::KeyUp(KeyCode::KeyS));
        platform.flush_input_buffer();

        assert_eq!(
            rx.try_recv().ok(),
            Some(PlatformEvent::Inputs(vec![
                InputEvent::KeyDown(KeyCode::KeyS),
                InputEvent::KeyUp(KeyCode::KeyS),
            ]))
        );
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, "test");

        platform.buffer.push(InputEvent::KeyDown(KeyCode::Space));
        drop(rx);

        platform.flush_input_buffer();
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn multiple_flushes_send_once() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, "test");

        platform.buffer.push(InputEvent::KeyDown(KeyCode::KeyA));
        platform.flush_input_buffer();
        platform.flush_input_buffer();

        assert!(rx.try_recv().is_ok(), "First flush should send");
        assert!(rx.try_recv().is_err(), "Second flush should not send");
    }

    #[test]
    fn notify_closed_sends_window_closed() {
        let (tx, rx) = unbounded();
        let platform = Platform::new(tx, "test");

        platform.notify_closed();

        assert_eq!(rx.try_recv().ok(), Some(PlatformEvent::WindowClosed));
    }
}
