//=========================================================================
// Ringbeat Library Root
//
// Rhythm game core: a generic node tree, a two-layer keyboard gesture
// interpreter, and the game scene built on both.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the reusable tree and input layers (`core`)
// - Expose the game objects (`game`)
// - Keep the windowing backend (`platform`) private
//
// Typical usage:
// ```no_run
// use ringbeat::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run(|| load_scene());
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the Winit integration and is not part of the public
// API. `engine` wires it to the core thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder};
