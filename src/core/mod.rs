//=========================================================================
// Core
//
// Backend-independent building blocks shared by the game and the engine.
//
// Components:
// - `tree`: Generic node tree with lifecycle, name index and signals
// - `input`: Keyboard gesture interpreter (slides and taps per layer)
// - `platform_bridge`: Platform → core thread contract
//
//=========================================================================

pub mod input;
pub(crate) mod platform_bridge;
pub mod tree;
