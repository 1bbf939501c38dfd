//=========================================================================
// Node
//=========================================================================
//
// A tree entity that is also a container of child nodes.
//
// Architecture:
//   Node
//     ├─ value:     RefCell<Option<T>>         (payload, owned)
//     ├─ behavior:  RefCell<Box<dyn Behavior>> (init/update hooks)
//     ├─ signal:    Signal<TreeEvent>          (structural notifications)
//     └─ state:     RefCell<NodeState>
//          ├─ parent:   Weak<Node>             (non-owning back-reference)
//          ├─ children: Vec<NodeRef>           (ownership flows downward)
//          ├─ dispatch: Vec<NodeRef>           (children reached by update)
//          ├─ named:    HashMap<K, NodeRef>    (recursive identifier index)
//          └─ id / updates / initialized / context
//
// Mutation goes through add/remove/set_id/set_updates so the dispatch
// subset and the name index stay consistent at every ancestor level.
// No RefCell borrow is held while hooks or listeners run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::behavior::{Behavior, Inert, NodeKey};
use super::signal::{ConnectionId, Signal};

//=== Public Types ========================================================

/// Shared handle to a node. Nodes are always handled through this type.
pub type NodeRef<T, G, K> = Rc<Node<T, G, K>>;

/// Structural change notification.
///
/// Delivered to the signal of the container where the change happened and
/// to the signal of every ancestor up to the root.
pub enum TreeEvent<T, G, K: NodeKey> {
    /// `node` was attached under `parent`.
    NodeAdded {
        node: NodeRef<T, G, K>,
        parent: NodeRef<T, G, K>,
    },

    /// `node` was detached from `parent` (or is part of a detached subtree
    /// whose direct parent is `parent`).
    NodeRemoved {
        node: NodeRef<T, G, K>,
        parent: NodeRef<T, G, K>,
    },

    /// `node` changed identifier while attached.
    IdChanged {
        node: NodeRef<T, G, K>,
        old: Option<K>,
        new: Option<K>,
    },
}

impl<T, G, K: NodeKey> TreeEvent<T, G, K> {
    /// The node the event is about.
    pub fn node(&self) -> &NodeRef<T, G, K> {
        match self {
            Self::NodeAdded { node, .. }
            | Self::NodeRemoved { node, .. }
            | Self::IdChanged { node, .. } => node,
        }
    }
}

impl<T: 'static, G: 'static, K: NodeKey> fmt::Debug for TreeEvent<T, G, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeAdded { node, .. } => f.debug_tuple("NodeAdded").field(&node.id()).finish(),
            Self::NodeRemoved { node, .. } => {
                f.debug_tuple("NodeRemoved").field(&node.id()).finish()
            }
            Self::IdChanged { old, new, .. } => f
                .debug_struct("IdChanged")
                .field("old", old)
                .field("new", new)
                .finish(),
        }
    }
}

//=== NodeState ===========================================================

struct NodeState<T, G, K: NodeKey> {
    parent: Weak<Node<T, G, K>>,
    children: Vec<NodeRef<T, G, K>>,
    dispatch: Vec<NodeRef<T, G, K>>,
    named: HashMap<K, NodeRef<T, G, K>>,
    id: Option<K>,
    updates: bool,
    initialized: bool,
    // Only the root carries a context
    context: Option<Rc<G>>,
}

//=== Node ================================================================

/// A tree entity carrying an optional payload and a behavior.
///
/// Created detached with [`Node::new`] or [`Node::with_behavior`], then
/// attached with [`Node::add`] on a container (any node, or the
/// [`NodeTree`](super::NodeTree) root).
pub struct Node<T, G, K: NodeKey> {
    pub(super) value: RefCell<Option<T>>,
    behavior: RefCell<Box<dyn Behavior<T, G, K>>>,
    signal: Signal<TreeEvent<T, G, K>>,
    state: RefCell<NodeState<T, G, K>>,
}

impl<T: 'static, G: 'static, K: NodeKey> Node<T, G, K> {
    //--- Construction -----------------------------------------------------

    /// Creates a detached node with a payload and no hooks.
    pub fn new(value: Option<T>) -> NodeRef<T, G, K> {
        Self::with_behavior(value, Inert)
    }

    /// Creates a detached node with a payload and a behavior.
    pub fn with_behavior<B>(value: Option<T>, behavior: B) -> NodeRef<T, G, K>
    where
        B: Behavior<T, G, K>,
    {
        Rc::new(Self::build(value, Box::new(behavior), None))
    }

    /// Creates a live root holding the global context.
    pub(crate) fn root_with_context(value: Option<T>, context: Rc<G>) -> NodeRef<T, G, K> {
        let root = Self::build(value, Box::new(Inert), Some(context));
        root.state.borrow_mut().initialized = true;
        Rc::new(root)
    }

    fn build(
        value: Option<T>,
        behavior: Box<dyn Behavior<T, G, K>>,
        context: Option<Rc<G>>,
    ) -> Self {
        Self {
            value: RefCell::new(value),
            behavior: RefCell::new(behavior),
            signal: Signal::new(),
            state: RefCell::new(NodeState {
                parent: Weak::new(),
                children: Vec::new(),
                dispatch: Vec::new(),
                named: HashMap::new(),
                id: None,
                updates: false,
                initialized: false,
                context,
            }),
        }
    }

    /// Sets the identifier and returns the node (builder style).
    pub fn with_id(self: Rc<Self>, id: K) -> NodeRef<T, G, K> {
        self.set_id(Some(id));
        self
    }

    /// Flags the node as updating and returns it (builder style).
    pub fn updating(self: Rc<Self>) -> NodeRef<T, G, K> {
        self.set_updates(true);
        self
    }

    //--- Accessors --------------------------------------------------------

    /// The node's identifier, if any.
    pub fn id(&self) -> Option<K> {
        self.state.borrow().id.clone()
    }

    /// Whether the node wants per-frame updates.
    pub fn updates(&self) -> bool {
        self.state.borrow().updates
    }

    /// Whether the node's `init` hook has run.
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// The direct parent, if attached.
    pub fn parent(&self) -> Option<NodeRef<T, G, K>> {
        self.state.borrow().parent.upgrade()
    }

    /// Walks parent links up to the topmost container.
    pub fn root(self: &Rc<Self>) -> NodeRef<T, G, K> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The global context of the tree this node is attached to.
    pub fn context(self: &Rc<Self>) -> Option<Rc<G>> {
        self.root().state.borrow().context.clone()
    }

    /// Snapshot of the direct children, in insertion order.
    pub fn children(&self) -> Vec<NodeRef<T, G, K>> {
        self.state.borrow().children.clone()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.state.borrow().children.len()
    }

    /// Borrows the payload.
    pub fn value(&self) -> Ref<'_, Option<T>> {
        self.value.borrow()
    }

    /// Mutably borrows the payload.
    pub fn value_mut(&self) -> RefMut<'_, Option<T>> {
        self.value.borrow_mut()
    }

    /// Mutably borrows the behavior if it is a `B`.
    ///
    /// Returns `None` on a type mismatch or if the behavior is already
    /// borrowed (e.g. the node is running its own hook).
    pub fn behavior<B: 'static>(&self) -> Option<RefMut<'_, B>> {
        let boxed = self.behavior.try_borrow_mut().ok()?;
        RefMut::filter_map(boxed, |boxed| (**boxed).as_any_mut().downcast_mut::<B>()).ok()
    }

    /// Runs `f` against the behavior if it is a `B`.
    pub fn with_behavior_mut<B: 'static, R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        self.behavior::<B>().map(|mut behavior| f(&mut behavior))
    }

    //--- Lookup -----------------------------------------------------------

    /// O(1) lookup of an identified node anywhere below this one.
    pub fn get(&self, id: &K) -> Option<NodeRef<T, G, K>> {
        self.state.borrow().named.get(id).cloned()
    }

    /// Identifiers indexed at this level (the whole subtree below it).
    pub fn indexed_ids(&self) -> Vec<K> {
        self.state.borrow().named.keys().cloned().collect()
    }

    /// Every descendant in preorder (node before its children).
    pub fn walk_recursive(&self) -> Vec<NodeRef<T, G, K>> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.walk_recursive());
        }
        out
    }

    /// First descendant (preorder) matching `predicate`.
    pub fn find_recursive(
        &self,
        mut predicate: impl FnMut(&NodeRef<T, G, K>) -> bool,
    ) -> Option<NodeRef<T, G, K>> {
        self.walk_recursive().into_iter().find(|node| predicate(node))
    }

    /// Calls `visitor` on every descendant in preorder.
    pub fn for_each_recursive(&self, mut visitor: impl FnMut(&NodeRef<T, G, K>)) {
        for node in self.walk_recursive() {
            visitor(&node);
        }
    }

    //--- Events -----------------------------------------------------------

    /// Subscribes to structural changes in this node's subtree.
    pub fn on_event<F>(&self, listener: F) -> ConnectionId
    where
        F: FnMut(&TreeEvent<T, G, K>) + 'static,
    {
        self.signal.connect(listener)
    }

    /// Removes a subscription made with [`on_event`](Self::on_event).
    pub fn disconnect(&self, connection: ConnectionId) -> bool {
        self.signal.disconnect(connection)
    }

    //=====================================================================
    // Structure
    //=====================================================================

    /// Attaches `child` under this node.
    ///
    /// # Panics
    ///
    /// Panics if this node is initialized, `child` still needs
    /// initialization, and no global context is reachable from this node.
    pub fn add(self: &Rc<Self>, child: NodeRef<T, G, K>) {
        if let Some(current) = child.parent() {
            if Rc::ptr_eq(&current, self) {
                debug!("Node {:?} is already a child, skipping add", child.id());
                return;
            }
        }

        if self.is_self_or_descendant_of(&child) {
            warn!("Refusing to add node {:?} under itself or its own subtree", child.id());
            return;
        }

        if let Some(previous) = child.parent() {
            previous.remove(&child);
        }

        //--- 1. Link --------------------------------------------------------
        {
            let mut state = self.state.borrow_mut();
            state.children.push(child.clone());
        }
        child.state.borrow_mut().parent = Rc::downgrade(self);

        //--- 2. Dispatch membership and name index --------------------------
        self.sync_dispatch(&child);
        let entries = child.subtree_entries();
        for level in self.self_and_ancestors() {
            level.index_entries(&entries);
        }

        //--- 3. Notify ------------------------------------------------------
        debug!("Added node {:?} ({} indexed ids)", child.id(), entries.len());
        self.emit(&TreeEvent::NodeAdded {
            node: child.clone(),
            parent: self.clone(),
        });
        for descendant in child.walk_recursive() {
            if let Some(parent) = descendant.parent() {
                self.emit(&TreeEvent::NodeAdded {
                    node: descendant,
                    parent,
                });
            }
        }

        //--- 4. Initialize --------------------------------------------------
        if self.is_initialized() && child.needs_init() {
            let context = match self.context() {
                Some(context) => context,
                None => panic!(
                    "Global context is not available to initialize node {:?}",
                    child.id()
                ),
            };
            child.initialize(&context);
        }
    }

    /// Attaches several children in order.
    pub fn add_children(self: &Rc<Self>, children: impl IntoIterator<Item = NodeRef<T, G, K>>) {
        for child in children {
            self.add(child);
        }
    }

    /// Detaches `child` from this node. No-op if it is not a direct child.
    pub fn remove(self: &Rc<Self>, child: &NodeRef<T, G, K>) {
        let is_child = child
            .parent()
            .map(|parent| Rc::ptr_eq(&parent, self))
            .unwrap_or(false);
        if !is_child {
            debug!("Node {:?} is not a child, skipping removal", child.id());
            return;
        }

        //--- 1. Unlink ------------------------------------------------------
        {
            let mut state = self.state.borrow_mut();
            state.children.retain(|c| !Rc::ptr_eq(c, child));
        }
        child.state.borrow_mut().parent = Weak::new();

        //--- 2. Dispatch membership and name index --------------------------
        self.drop_dispatch(child);
        let entries = child.subtree_entries();
        for level in self.self_and_ancestors() {
            level.unindex_entries(&entries);
        }

        //--- 3. Notify (node before descendants) ----------------------------
        debug!("Removed node {:?}", child.id());
        self.emit(&TreeEvent::NodeRemoved {
            node: child.clone(),
            parent: self.clone(),
        });
        for descendant in child.walk_recursive() {
            if let Some(parent) = descendant.parent() {
                self.emit(&TreeEvent::NodeRemoved {
                    node: descendant,
                    parent,
                });
            }
        }
    }

    /// Detaches several children.
    pub fn remove_children<'a>(
        self: &Rc<Self>,
        children: impl IntoIterator<Item = &'a NodeRef<T, G, K>>,
    ) {
        for child in children {
            self.remove(child);
        }
    }

    /// Detaches every direct child.
    pub fn clear(self: &Rc<Self>) {
        for child in self.children() {
            self.remove(&child);
        }
    }

    /// Moves this node under `new_parent`.
    pub fn reparent(self: &Rc<Self>, new_parent: &NodeRef<T, G, K>) -> NodeRef<T, G, K> {
        new_parent.add(self.clone());
        self.clone()
    }

    /// Detaches this node from its parent, if any.
    pub fn remove_from_parent(self: &Rc<Self>) {
        if let Some(parent) = self.parent() {
            parent.remove(self);
        }
    }

    //=====================================================================
    // Identifier & Update Flag
    //=====================================================================

    /// Changes the identifier, re-indexing it at every ancestor.
    ///
    /// On a detached node the change is picked up by the next `add`.
    pub fn set_id(self: &Rc<Self>, id: Option<K>) {
        let old = std::mem::replace(&mut self.state.borrow_mut().id, id.clone());
        if old == id {
            return;
        }

        let Some(parent) = self.parent() else {
            return;
        };

        for level in parent.self_and_ancestors() {
            if let Some(old) = &old {
                level.unindex_entries(&[(old.clone(), self.clone())]);
            }
            if let Some(new) = &id {
                insert_unique(&mut level.state.borrow_mut().named, new.clone(), self.clone());
            }
        }

        parent.emit(&TreeEvent::IdChanged {
            node: self.clone(),
            old,
            new: id,
        });
    }

    /// Toggles per-frame updates, keeping every ancestor's dispatch subset
    /// consistent.
    pub fn set_updates(self: &Rc<Self>, updates: bool) {
        self.state.borrow_mut().updates = updates;
        if let Some(parent) = self.parent() {
            parent.sync_dispatch(self);
        }
    }

    //=====================================================================
    // Frame Update
    //=====================================================================

    /// Updates every updating node below this one, children before parents.
    pub fn update_recursive(self: &Rc<Self>, delta_time: f64) {
        let dispatch = self.state.borrow().dispatch.clone();

        for child in dispatch {
            // Detached earlier in this pass
            if !child.is_child_of(self) {
                continue;
            }

            child.update_recursive(delta_time);

            // A descendant may have detached it
            if !child.is_child_of(self) {
                continue;
            }

            if child.updates() && child.is_initialized() {
                child.run_update(delta_time);
            }
        }
    }

    //=====================================================================
    // Internal Helpers
    //=====================================================================

    fn run_update(self: &Rc<Self>, delta_time: f64) {
        match self.behavior.try_borrow_mut() {
            Ok(mut behavior) => behavior.update(self, delta_time),
            Err(_) => warn!("Behavior of node {:?} is busy, skipping update", self.id()),
        }
    }

    fn needs_init(&self) -> bool {
        !self.is_initialized() || self.walk_recursive().iter().any(|n| !n.is_initialized())
    }

    /// Runs `init` on this node (if needed) and then on its descendants.
    fn initialize(self: &Rc<Self>, context: &G) {
        if !self.is_initialized() {
            match self.behavior.try_borrow_mut() {
                Ok(mut behavior) => behavior.init(self, context),
                Err(_) => warn!("Behavior of node {:?} is busy, skipping init hook", self.id()),
            }
            self.state.borrow_mut().initialized = true;
        }

        for child in self.children() {
            child.initialize(context);
        }
    }

    fn is_child_of(&self, container: &Rc<Self>) -> bool {
        self.parent()
            .map(|parent| Rc::ptr_eq(&parent, container))
            .unwrap_or(false)
    }

    fn is_self_or_descendant_of(self: &Rc<Self>, other: &NodeRef<T, G, K>) -> bool {
        self.self_and_ancestors()
            .iter()
            .any(|level| Rc::ptr_eq(level, other))
    }

    fn self_and_ancestors(self: &Rc<Self>) -> Vec<NodeRef<T, G, K>> {
        let mut levels = vec![self.clone()];
        while let Some(parent) = levels[levels.len() - 1].parent() {
            levels.push(parent);
        }
        levels
    }

    fn emit(self: &Rc<Self>, event: &TreeEvent<T, G, K>) {
        for level in self.self_and_ancestors() {
            level.signal.emit(event);
        }
    }

    /// Whether the parent should reach this node during update dispatch.
    fn wants_dispatch(&self) -> bool {
        let state = self.state.borrow();
        state.updates || !state.dispatch.is_empty()
    }

    /// Re-evaluates `child`'s dispatch membership and propagates upward.
    fn sync_dispatch(self: &Rc<Self>, child: &NodeRef<T, G, K>) {
        let wants = child.wants_dispatch();

        let changed = {
            let mut state = self.state.borrow_mut();
            let was_reachable = !state.dispatch.is_empty();
            let position = state.dispatch.iter().position(|c| Rc::ptr_eq(c, child));

            match (wants, position) {
                (true, None) => state.dispatch.push(child.clone()),
                (false, Some(index)) => {
                    state.dispatch.remove(index);
                }
                _ => {}
            }

            was_reachable != !state.dispatch.is_empty()
        };

        if changed {
            if let Some(parent) = self.parent() {
                parent.sync_dispatch(self);
            }
        }
    }

    fn drop_dispatch(self: &Rc<Self>, child: &NodeRef<T, G, K>) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.dispatch.len();
            state.dispatch.retain(|c| !Rc::ptr_eq(c, child));
            before != 0 && state.dispatch.is_empty()
        };

        if changed {
            if let Some(parent) = self.parent() {
                parent.sync_dispatch(self);
            }
        }
    }

    /// The node's own identifier plus everything indexed below it.
    fn subtree_entries(self: &Rc<Self>) -> Vec<(K, NodeRef<T, G, K>)> {
        let state = self.state.borrow();
        let mut entries: Vec<_> = state
            .named
            .iter()
            .map(|(id, node)| (id.clone(), node.clone()))
            .collect();
        if let Some(id) = &state.id {
            entries.push((id.clone(), self.clone()));
        }
        entries
    }

    fn index_entries(&self, entries: &[(K, NodeRef<T, G, K>)]) {
        let mut state = self.state.borrow_mut();
        for (id, node) in entries {
            insert_unique(&mut state.named, id.clone(), node.clone());
        }
    }

    /// Drops `entries` from the index. A vacated identifier passes to the
    /// last remaining holder in this subtree (preorder), if any.
    fn unindex_entries(&self, entries: &[(K, NodeRef<T, G, K>)]) {
        let vacated: Vec<K> = {
            let mut state = self.state.borrow_mut();
            entries
                .iter()
                .filter(|(id, node)| remove_if_same(&mut state.named, id, node))
                .map(|(id, _)| id.clone())
                .collect()
        };

        for id in vacated {
            if let Some(holder) = self.last_holder_of(&id) {
                debug!("Identifier {:?} falls back to a remaining holder", id);
                self.state.borrow_mut().named.insert(id, holder);
            }
        }
    }

    fn last_holder_of(&self, id: &K) -> Option<NodeRef<T, G, K>> {
        self.walk_recursive()
            .into_iter()
            .rev()
            .find(|node| node.id().as_ref() == Some(id))
    }
}

//=== Index Helpers =======================================================

fn insert_unique<T, G, K: NodeKey>(
    named: &mut HashMap<K, NodeRef<T, G, K>>,
    id: K,
    node: NodeRef<T, G, K>,
) {
    if let Some(existing) = named.get(&id) {
        if !Rc::ptr_eq(existing, &node) {
            warn!("Identifier {:?} is already in use; the newest node takes it", id);
        }
    }
    named.insert(id, node);
}

/// Removes `id` if `node` holds it. Returns whether the entry was removed.
fn remove_if_same<T, G, K: NodeKey>(
    named: &mut HashMap<K, NodeRef<T, G, K>>,
    id: &K,
    node: &NodeRef<T, G, K>,
) -> bool {
    let held = named.get(id).map(|n| Rc::ptr_eq(n, node)).unwrap_or(false);
    if held {
        named.remove(id);
    }
    held
}

//--- Trait Implementations -----------------------------------------------

impl<T, G, K: NodeKey> fmt::Debug for Node<T, G, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Node")
                .field("id", &state.id)
                .field("updates", &state.updates)
                .field("initialized", &state.initialized)
                .field("children", &state.children.len())
                .finish(),
            Err(_) => f.write_str("Node { <borrowed> }"),
        }
    }
}
