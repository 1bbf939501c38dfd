//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing platform thread and the core thread.
//
// Components:
// - `interface`: Event types and error definitions
// - `event_collector`: Core-side per-tick collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub use interface::PlatformError;
pub(crate) use interface::PlatformEvent;
