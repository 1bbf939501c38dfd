//=========================================================================
// Input Interpreter
//
// Turns the set of physically held keys into slide and tap gestures,
// once per frame, for each of the two lane layers.
//
// Responsibilities:
// - Apply key events to the held-key set as they arrive
// - Run each layer's countdown state machine on the frame tick
// - Deliver gestures to the cursor node through `CursorControl`
//
// Flow:
// ```text
// InputEvent ──► Input::handle_event() ──► HeldKeys
//                                             ↓ (next frame)
// NodeTree::update_recursive() ──► Input::update()
//                                    ├─ InputLayer (Primary)    ─┐
//                                    └─ InputLayer (Background) ─┴─► cursor node
// ```
//
// Notes:
// The interpreter is a node behavior; it finds the cursor by identifier
// at the tree root and checks it carries the expected cursor type.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod gesture;
mod held_keys;
mod keymap;
mod layer;

//=== Public Exports ======================================================

pub use event::{InputEvent, KeyCode};
pub use gesture::{CursorControl, Gesture, Layer};
pub use held_keys::HeldKeys;
pub use keymap::{Keymap, BOTTOM_ROW, TOP_ROW};
pub use layer::{
    InputLayer, MAX_LAYER_KEYS, MAX_TAP_SIZE, MIN_TAP_SIZE, TAP_DURATION_LIMIT, TAP_LENIENCY,
};

//=== Standard Library Imports ============================================

use std::marker::PhantomData;

//=== External Crates =====================================================

use log::{debug, warn};

//=== Internal Imports ====================================================

use crate::core::tree::{Behavior, NodeKey, NodeRef};

//=== Input ===============================================================

/// Node behavior interpreting keyboard input for both layers.
///
/// `C` is the cursor behavior gestures are delivered to, `K` the identifier
/// the cursor node is registered under.
pub struct Input<C, K> {
    held: HeldKeys,
    primary: InputLayer,
    background: InputLayer,
    cursor: K,
    _cursor: PhantomData<fn() -> C>,
}

impl<C: CursorControl + 'static, K: NodeKey> Input<C, K> {
    //--- Construction -----------------------------------------------------

    /// Creates an interpreter over the default key rows.
    pub fn new(cursor: K) -> Self {
        Self::with_keymap(&Keymap::default(), cursor)
    }

    /// Creates an interpreter over custom key rows.
    pub fn with_keymap(keymap: &Keymap, cursor: K) -> Self {
        Self {
            held: HeldKeys::new(),
            primary: InputLayer::new(keymap.row(Layer::Primary).to_vec()),
            background: InputLayer::new(keymap.row(Layer::Background).to_vec()),
            cursor,
            _cursor: PhantomData,
        }
    }

    //--- Event Intake -----------------------------------------------------

    /// Records a key event. Interpretation waits for the next frame.
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.held.apply(event);
    }

    /// Records a batch of key events in order.
    pub fn handle_events(&mut self, events: &[InputEvent]) {
        self.held.apply_all(events);
    }

    //--- Accessors --------------------------------------------------------

    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    pub fn layer(&self, layer: Layer) -> &InputLayer {
        match layer {
            Layer::Primary => &self.primary,
            Layer::Background => &self.background,
        }
    }

    //--- Interpretation ---------------------------------------------------

    /// Runs one frame over both layers and returns their gestures.
    pub fn interpret(&mut self, delta_time: f64) -> Vec<(Layer, Gesture)> {
        let mut gestures = Vec::with_capacity(2);

        if let Some(gesture) = self.primary.update(&self.held, delta_time) {
            gestures.push((Layer::Primary, gesture));
        }
        if let Some(gesture) = self.background.update(&self.held, delta_time) {
            gestures.push((Layer::Background, gesture));
        }

        gestures
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T, G, K, C> Behavior<T, G, K> for Input<C, K>
where
    T: 'static,
    G: 'static,
    K: NodeKey,
    C: CursorControl + 'static,
{
    fn update(&mut self, node: &NodeRef<T, G, K>, delta_time: f64) {
        let gestures = self.interpret(delta_time);
        if gestures.is_empty() {
            return;
        }

        let Some(cursor) = node.root().get(&self.cursor) else {
            warn!("Cursor node {:?} not found, dropping {} gestures", self.cursor, gestures.len());
            return;
        };

        let delivered = cursor.with_behavior_mut(|control: &mut C| {
            for (layer, gesture) in &gestures {
                debug!("Gesture {:?} on {:?} layer", gesture, layer);
                gesture.apply(control, *layer);
            }
        });

        if delivered.is_none() {
            warn!("Node {:?} does not carry the expected cursor behavior", self.cursor);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::{Inert, Node, NodeTree};

    const FRAME: f64 = 1.0 / 60.0;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Default)]
    struct RecordingCursor {
        calls: Vec<(Gesture, Layer)>,
    }

    impl CursorControl for RecordingCursor {
        fn slide(&mut self, delta: i32, layer: Layer) {
            self.calls.push((Gesture::Slide(delta), layer));
        }

        fn tap(&mut self, size: usize, layer: Layer) {
            self.calls.push((Gesture::Tap(size), layer));
        }
    }

    impl Behavior<(), (), &'static str> for RecordingCursor {}

    type TestInput = Input<RecordingCursor, &'static str>;
    type TestTree = NodeTree<(), (), &'static str>;

    fn scene() -> TestTree {
        let tree = NodeTree::new(());
        tree.add(Node::with_behavior(None, TestInput::new("cursor")).with_id("input").updating());
        tree.add(Node::with_behavior(None, RecordingCursor::default()).with_id("cursor"));
        tree
    }

    fn send(tree: &TestTree, events: &[InputEvent]) {
        tree.with_behavior(&"input", |input: &mut TestInput| input.handle_events(events));
    }

    fn key(c: char) -> KeyCode {
        KeyCode::from_char(c).unwrap()
    }

    fn frames(tree: &TestTree, count: usize) {
        for _ in 0..count {
            tree.update_recursive(FRAME);
        }
    }

    fn cursor_calls(tree: &TestTree) -> Vec<(Gesture, Layer)> {
        tree.with_behavior(&"cursor", |c: &mut RecordingCursor| c.calls.clone())
            .unwrap_or_default()
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn bottom_row_slide_reaches_primary_layer() {
        let tree = scene();

        send(&tree, &[InputEvent::KeyDown(key('s'))]);
        frames(&tree, 1);
        send(&tree, &[InputEvent::KeyDown(key('d'))]);
        frames(&tree, 1);

        assert_eq!(cursor_calls(&tree), vec![(Gesture::Slide(1), Layer::Primary)]);
    }

    #[test]
    fn top_row_tap_reaches_background_layer() {
        let tree = scene();

        send(&tree, &[InputEvent::KeyDown(key('W')), InputEvent::KeyDown(key('E'))]);
        frames(&tree, 2);
        send(&tree, &[InputEvent::KeyUp(key('W')), InputEvent::KeyUp(key('E'))]);
        frames(&tree, 30);

        assert_eq!(cursor_calls(&tree), vec![(Gesture::Tap(2), Layer::Background)]);
    }

    #[test]
    fn layers_are_interpreted_independently() {
        let tree = scene();

        send(&tree, &[InputEvent::KeyDown(key('l')), InputEvent::KeyDown(key('o'))]);
        frames(&tree, 1);
        send(&tree, &[InputEvent::KeyDown(key('k')), InputEvent::KeyDown(key('i'))]);
        frames(&tree, 1);

        assert_eq!(
            cursor_calls(&tree),
            vec![(Gesture::Slide(-1), Layer::Primary), (Gesture::Slide(-1), Layer::Background)]
        );
    }

    #[test]
    fn unbound_keys_are_held_but_ignored() {
        let tree = scene();

        send(&tree, &[InputEvent::KeyDown(KeyCode::Space), InputEvent::KeyDown(key('z'))]);
        frames(&tree, 5);

        let held = tree.with_behavior(&"input", |input: &mut TestInput| input.held_keys().len());
        assert_eq!(held, Some(2));
        assert!(cursor_calls(&tree).is_empty());
    }

    #[test]
    fn missing_cursor_drops_gestures() {
        let tree: TestTree = NodeTree::new(());
        tree.add(Node::with_behavior(None, TestInput::new("cursor")).with_id("input").updating());

        send(&tree, &[InputEvent::KeyDown(key('s'))]);
        frames(&tree, 1);
        send(&tree, &[InputEvent::KeyDown(key('d'))]);
        frames(&tree, 1);

        let previous = tree.with_behavior(&"input", |input: &mut TestInput| {
            input.layer(Layer::Primary).previous()
        });
        assert_eq!(previous, Some(0b11), "Interpretation still advances");
    }

    #[test]
    fn cursor_with_wrong_behavior_is_skipped() {
        let tree: TestTree = NodeTree::new(());
        tree.add(Node::with_behavior(None, TestInput::new("cursor")).with_id("input").updating());
        tree.add(Node::new(None).with_id("cursor"));

        send(&tree, &[InputEvent::KeyDown(key('s'))]);
        frames(&tree, 1);
        send(&tree, &[InputEvent::KeyDown(key('d'))]);
        frames(&tree, 1);

        let previous = tree.with_behavior(&"input", |input: &mut TestInput| {
            input.layer(Layer::Primary).previous()
        });
        assert_eq!(previous, Some(0b11), "Both frames were interpreted");
        let cursor = tree.get(&"cursor").unwrap();
        assert!(cursor.behavior::<Inert>().is_some());
    }

    #[test]
    fn press_and_release_within_one_frame_is_not_sampled() {
        let mut input = TestInput::new("cursor");

        input.handle_event(&InputEvent::KeyDown(key('s')));
        input.handle_event(&InputEvent::KeyUp(key('s')));

        assert!(input.interpret(FRAME).is_empty());
        assert_eq!(input.layer(Layer::Primary).previous(), 0);
    }

    #[test]
    fn custom_keymap_rows_drive_layers() {
        let keymap = Keymap::from_rows("QWE", "ASD");
        let mut input: TestInput = Input::with_keymap(&keymap, "cursor");

        input.handle_event(&InputEvent::KeyDown(KeyCode::KeyA));
        input.interpret(FRAME);
        input.handle_event(&InputEvent::KeyDown(KeyCode::KeyS));

        assert_eq!(input.interpret(FRAME), vec![(Layer::Primary, Gesture::Slide(1))]);
        assert_eq!(input.layer(Layer::Background).keys().len(), 3);
    }
}
