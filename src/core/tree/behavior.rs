//=========================================================================
// Node Behavior
//=========================================================================
//
// Per-node lifecycle hooks and the capability check used for typed
// lookups.
//
// A node carries exactly one boxed behavior. The tree calls `init` once,
// top-down, when the node first joins a live tree, and `update` every
// frame the node wants updates (after its descendants).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use super::NodeRef;

//=== NodeKey Trait =======================================================

/// Marker trait for node identifiers.
///
/// Automatically implemented for every `Clone + Eq + Hash + Debug + 'static`
/// type. Games typically use a small enum so lookups are stable and typo-free.
pub trait NodeKey: Clone + Eq + Hash + Debug + 'static {}

// Blanket implementation
impl<T: Clone + Eq + Hash + Debug + 'static> NodeKey for T {}

//=== AsAny ===============================================================

/// Upcast to [`Any`] so a behavior can be checked against a concrete type.
///
/// Implemented for every `'static` type.
pub trait AsAny: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Behavior Trait ======================================================

/// Lifecycle hooks of a node.
///
/// Both hooks default to doing nothing, so a behavior only overrides what it
/// needs:
///
/// ```rust
/// # use ringbeat::core::tree::{Behavior, NodeRef};
/// struct Spinner { angle: f64 }
///
/// impl Behavior<(), (), &'static str> for Spinner {
///     fn update(&mut self, _node: &NodeRef<(), (), &'static str>, delta_time: f64) {
///         self.angle += delta_time;
///     }
/// }
/// ```
///
/// `T` is the payload type, `G` the global context, `K` the identifier type.
pub trait Behavior<T, G, K: NodeKey>: AsAny {
    /// Called once when the node first becomes part of a live tree.
    ///
    /// Runs before the node's descendants are initialized, so children added
    /// here are initialized right after.
    fn init(&mut self, _node: &NodeRef<T, G, K>, _context: &G) {}

    /// Called every frame while the node wants updates.
    ///
    /// Descendants have already been updated this frame.
    fn update(&mut self, _node: &NodeRef<T, G, K>, _delta_time: f64) {}
}

//=== Inert ===============================================================

/// Behavior with no hooks, used by plain payload-carrying nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl<T, G, K: NodeKey> Behavior<T, G, K> for Inert {}

//=========================================================================
// Unit Tests
//=========================================================================
