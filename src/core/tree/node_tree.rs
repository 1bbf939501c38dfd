//=========================================================================
// Node Tree
//=========================================================================
//
// Root container of a node hierarchy.
//
// Architecture:
//   NodeTree
//     └─ root: NodeRef (live from construction, holds Rc<G>)
//          ├─ children ...
//          └─ signal ◄── every structural change in the tree
//
// Flow (per frame):
//   update_recursive(dt) → dispatch snapshot → child subtree → child.update()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::info;

//=== Internal Dependencies ===============================================

use super::behavior::NodeKey;
use super::node::{Node, NodeRef, TreeEvent};
use super::signal::ConnectionId;

//=== NodeTree ============================================================

/// Owner of a node hierarchy and of the global context its nodes share.
///
/// The context is bound once here; nodes reach it by walking to the root.
///
/// # Example
///
/// ```rust
/// use ringbeat::core::tree::{Node, NodeTree};
///
/// struct Context { speed: f64 }
///
/// let tree: NodeTree<&'static str, Context, &'static str> =
///     NodeTree::new(Context { speed: 2.0 });
///
/// let ship = Node::new(Some("ship")).with_id("ship");
/// tree.add(ship);
///
/// assert!(tree.get(&"ship").is_some());
/// assert!(tree.get(&"missing").is_none());
/// ```
pub struct NodeTree<T, G, K: NodeKey> {
    root: NodeRef<T, G, K>,
    context: Rc<G>,
}

impl<T: 'static, G: 'static, K: NodeKey> NodeTree<T, G, K> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty tree bound to `context`.
    pub fn new(context: G) -> Self {
        Self::with_shared_context(None, Rc::new(context))
    }

    /// Creates a tree whose root carries a payload (e.g. the scene object
    /// mirrored by the renderer).
    pub fn with_root_value(root_value: T, context: G) -> Self {
        Self::with_shared_context(Some(root_value), Rc::new(context))
    }

    /// Creates a tree bound to an already shared context.
    pub fn with_shared_context(root_value: Option<T>, context: Rc<G>) -> Self {
        info!("Creating node tree");
        Self {
            root: Node::root_with_context(root_value, context.clone()),
            context,
        }
    }

    //--- Accessors --------------------------------------------------------

    /// The root node.
    pub fn root(&self) -> &NodeRef<T, G, K> {
        &self.root
    }

    /// The shared global context.
    pub fn context(&self) -> Rc<G> {
        self.context.clone()
    }

    //--- Structure --------------------------------------------------------

    /// Attaches `node` directly under the root.
    pub fn add(&self, node: NodeRef<T, G, K>) {
        self.root.add(node);
    }

    /// Attaches several nodes in order.
    pub fn add_children(&self, nodes: impl IntoIterator<Item = NodeRef<T, G, K>>) {
        self.root.add_children(nodes);
    }

    /// Detaches a direct child of the root. No-op for any other node.
    pub fn remove(&self, node: &NodeRef<T, G, K>) {
        self.root.remove(node);
    }

    /// Detaches every child of the root.
    pub fn clear(&self) {
        self.root.clear();
    }

    //--- Lookup -----------------------------------------------------------

    /// O(1) lookup of an identified node anywhere in the tree.
    pub fn get(&self, id: &K) -> Option<NodeRef<T, G, K>> {
        self.root.get(id)
    }

    /// Runs `f` against the behavior of node `id` if it is a `B`.
    ///
    /// Returns `None` if the node is missing, carries another behavior, or
    /// is busy running its own hook.
    pub fn with_behavior<B: 'static, R>(&self, id: &K, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        self.get(id)?.with_behavior_mut(f)
    }

    /// Every node in preorder.
    pub fn walk_recursive(&self) -> Vec<NodeRef<T, G, K>> {
        self.root.walk_recursive()
    }

    /// First node (preorder) matching `predicate`.
    pub fn find_recursive(
        &self,
        predicate: impl FnMut(&NodeRef<T, G, K>) -> bool,
    ) -> Option<NodeRef<T, G, K>> {
        self.root.find_recursive(predicate)
    }

    /// Calls `visitor` on every node in preorder.
    pub fn for_each_recursive(&self, visitor: impl FnMut(&NodeRef<T, G, K>)) {
        self.root.for_each_recursive(visitor);
    }

    //--- Events -----------------------------------------------------------

    /// Subscribes to every structural change in the tree.
    pub fn on_event<F>(&self, listener: F) -> ConnectionId
    where
        F: FnMut(&TreeEvent<T, G, K>) + 'static,
    {
        self.root.on_event(listener)
    }

    /// Removes a subscription made with [`on_event`](Self::on_event).
    pub fn disconnect(&self, connection: ConnectionId) -> bool {
        self.root.disconnect(connection)
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame of updates over the whole tree (post-order).
    pub fn update_recursive(&self, delta_time: f64) {
        self.root.update_recursive(delta_time);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
