//=========================================================================
// Gestures
//=========================================================================
//
// High-level results of the input interpreter and the cursor interface
// they are delivered to.
//
//   InputLayer::update() → Gesture ──► CursorControl::{slide, tap}(.., Layer)
//
//=========================================================================

//=== Layer ===============================================================

/// One of the two independent note planes, each driven by its own key row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Primary,
    Background,
}

impl Layer {
    /// Both layers, in interpretation order.
    pub const ALL: [Layer; 2] = [Layer::Primary, Layer::Background];

    /// Dense index, usable for per-layer arrays.
    pub fn index(self) -> usize {
        match self {
            Layer::Primary => 0,
            Layer::Background => 1,
        }
    }
}

//=== Gesture =============================================================

/// A gesture recognized on one layer in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Move the cursor by a signed number of lanes (positive toward higher
    /// key indices).
    Slide(i32),

    /// Several adjacent keys pressed and released together.
    Tap(usize),
}

impl Gesture {
    /// Forwards the gesture to `cursor`.
    pub fn apply<C: CursorControl + ?Sized>(self, cursor: &mut C, layer: Layer) {
        match self {
            Gesture::Slide(delta) => cursor.slide(delta, layer),
            Gesture::Tap(size) => cursor.tap(size, layer),
        }
    }
}

//=== CursorControl =======================================================

/// Receiver of gestures. Implemented by the game cursor.
pub trait CursorControl {
    fn slide(&mut self, delta: i32, layer: Layer);
    fn tap(&mut self, size: usize, layer: Layer);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl CursorControl for Calls {
        fn slide(&mut self, delta: i32, layer: Layer) {
            self.0.push(format!("slide {} {:?}", delta, layer));
        }

        fn tap(&mut self, size: usize, layer: Layer) {
            self.0.push(format!("tap {} {:?}", size, layer));
        }
    }

    #[test]
    fn apply_routes_to_matching_call() {
        let mut calls = Calls::default();

        Gesture::Slide(-2).apply(&mut calls, Layer::Primary);
        Gesture::Tap(3).apply(&mut calls, Layer::Background);

        assert_eq!(calls.0, vec!["slide -2 Primary", "tap 3 Background"]);
    }

    #[test]
    fn layer_indices_are_dense() {
        let indices: Vec<_> = Layer::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
