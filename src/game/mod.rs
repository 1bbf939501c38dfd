//=========================================================================
// Game
//
// Host objects of the rhythm game built on the node tree: the scene and
// its context, the lane cursor, the camera rig and song/map data.
//
// Node layout of a running scene:
// ```text
// root (Object3D "scene", GameContext)
//  ├─ Input          interpreter, delivers gestures to Cursor
//  ├─ Lanes          outline
//  │   ├─ Cursor     per-layer lane and smoothed angle
//  │   └─ lane × 16  markers
//  └─ Camera         follows the cursor positions
// ```
//
//=========================================================================

//=== Submodules ==========================================================

pub mod camera;
pub mod context;
pub mod cursor;
pub mod lanes;
pub mod map;
pub mod node_id;
pub mod object;
pub mod scene;
pub mod song;
pub mod timing;

//=== Public Exports ======================================================

pub use camera::{Camera, CameraRig};
pub use context::{Clock, GameContext, Settings};
pub use cursor::{Cursor, FULL_LANES, HIT_RADIUS};
pub use map::{GameMap, Note, NoteLayer};
pub use node_id::NodeId;
pub use object::{Object3D, ObjectId};
pub use scene::{FrameRenderer, GameInput, GameScene};
pub use song::{LoadError, MapInfo, Song, SongLoader, SongMetadata};

//=== Type Aliases ========================================================

use crate::core::tree::{NodeRef, NodeTree};

/// Node tree of a running scene.
pub type GameTree = NodeTree<Object3D, GameContext, NodeId>;

/// Shared handle to a node of the scene tree.
pub type GameNode = NodeRef<Object3D, GameContext, NodeId>;
