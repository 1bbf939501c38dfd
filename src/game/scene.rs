//=========================================================================
// Game Scene
//=========================================================================
//
// Host object owning the node tree of one running song.
//
// Architecture:
//   core thread ─► handle_input(batch) ─► Input node (held keys)
//               └► animate(time_ms)
//                    ├─ clock.advance(dt)
//                    ├─ tree.update_recursive(dt)   Input → Cursor → CameraRig
//                    └─ renderer.render(tree, camera)
//
// Child order under the root is fixed so the post-order pass delivers
// gestures before the cursor eases and the cursor before the camera reads.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::rc::Rc;

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::camera::{Camera, CameraRig};
use super::context::{GameContext, Settings};
use super::cursor::Cursor;
use super::lanes;
use super::node_id::NodeId;
use super::object::Object3D;
use super::song::{LoadError, Song, SongLoader};
use super::GameTree;
use crate::core::input::{Input, InputEvent};
use crate::core::tree::{connect_parenting, Node, NodeTree};

/// Interpreter type wired into every scene.
pub type GameInput = Input<Cursor, NodeId>;

/// Frame length assumed before the first `animate` call, in milliseconds.
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;

//=== FrameRenderer Trait =================================================

/// Draws the scene once all nodes have been updated for the frame.
pub trait FrameRenderer {
    fn render(&mut self, tree: &GameTree, camera: &Camera);
}

//=== GameScene ===========================================================

pub struct GameScene<R> {
    tree: GameTree,
    renderer: R,
    last_time: Option<f64>,
}

impl<R: FrameRenderer> GameScene<R> {
    //--- Construction -----------------------------------------------------

    /// Loads the song if needed, reads one of its maps and builds the scene
    /// with default settings.
    pub fn load(
        mut song: Song,
        map_index: usize,
        loader: &dyn SongLoader,
        renderer: R,
    ) -> Result<Self, LoadError> {
        if !song.is_loaded() {
            song.load(loader)?;
        }
        let map = song.map(map_index, loader)?;

        info!(
            "Loaded '{}' by {} ({} notes)",
            song.metadata().name,
            song.metadata().artist,
            map.len()
        );

        Ok(Self::new(GameContext::new(song, map, Settings::default()), renderer))
    }

    /// Builds the scene tree around an existing context.
    pub fn new(context: GameContext, renderer: R) -> Self {
        let tree: GameTree = NodeTree::with_root_value(Object3D::new("scene"), context);
        connect_parenting(&tree);

        tree.add(
            Node::with_behavior(None, GameInput::new(NodeId::Cursor))
                .with_id(NodeId::Input)
                .updating(),
        );
        tree.add(lanes::build());
        tree.add(
            Node::with_behavior(None, CameraRig::new())
                .with_id(NodeId::Camera)
                .updating(),
        );

        Self {
            tree,
            renderer,
            last_time: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn context(&self) -> Rc<GameContext> {
        self.tree.context()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Current camera of the rig, or the default camera if the rig is gone.
    pub fn camera(&self) -> Camera {
        self.tree
            .with_behavior(&NodeId::Camera, |rig: &mut CameraRig| rig.camera())
            .unwrap_or_default()
    }

    //--- Frame Driving ----------------------------------------------------

    /// Forwards a batch of key events to the interpreter.
    pub fn handle_input(&self, events: &[InputEvent]) {
        let handled = self
            .tree
            .with_behavior(&NodeId::Input, |input: &mut GameInput| input.handle_events(events));

        if handled.is_none() {
            warn!("No input node in scene, dropping {} events", events.len());
        }
    }

    /// Runs one frame at `time_ms` milliseconds.
    pub fn animate(&mut self, time_ms: f64) {
        let last = self.last_time.unwrap_or(time_ms - FIRST_FRAME_MS);
        let delta_time = ((time_ms - last) / 1000.0).max(0.0);
        self.last_time = Some(time_ms);

        self.tree.context().clock.advance(delta_time);
        self.tree.update_recursive(delta_time);

        let camera = self.camera();
        self.renderer.render(&self.tree, &camera);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
