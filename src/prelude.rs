//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ringbeat::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Node tree
pub use crate::core::tree::{Behavior, Node, NodeKey, NodeRef, NodeTree, SceneObject, TreeEvent};

// Input
pub use crate::core::input::{CursorControl, Gesture, Input, InputEvent, KeyCode, Keymap, Layer};

// Game
pub use crate::game::{
    Camera, FrameRenderer, GameContext, GameNode, GameScene, GameTree, LoadError, NodeId, Object3D,
    Settings, Song, SongLoader,
};
