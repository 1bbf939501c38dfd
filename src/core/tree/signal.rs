//=========================================================================
// Signal
//=========================================================================
//
// Single-threaded observer list used by the node tree to publish
// structural changes.
//
// Architecture:
//   connect() → ConnectionId ──► listeners: Vec<(id, once, Rc<RefCell<FnMut>>)>
//                                      ↓
//   emit(&E) → snapshot listeners → call each (once-listeners dropped first)
//                                      ↓
//   disconnect(id) / clear()
//
// Emission iterates a snapshot, so listeners may connect, disconnect or
// mutate the tree while being notified.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::warn;

//=== ConnectionId ========================================================

/// Handle returned by [`Signal::connect`], used to disconnect a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

//=== Listener ============================================================

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Slot<E> {
    id: ConnectionId,
    once: bool,
    listener: Listener<E>,
}

//=== Signal ==============================================================

/// Ordered list of listeners notified on every [`emit`](Signal::emit).
pub struct Signal<E> {
    next_id: Cell<u64>,
    slots: RefCell<Vec<Slot<E>>>,
}

impl<E> Signal<E> {
    /// Creates a signal with no listeners.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            slots: RefCell::new(Vec::new()),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a listener called on every emission until disconnected.
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: FnMut(&E) + 'static,
    {
        self.register(listener, false)
    }

    /// Registers a listener that is dropped after its first call.
    pub fn once<F>(&self, listener: F) -> ConnectionId
    where
        F: FnMut(&E) + 'static,
    {
        self.register(listener, true)
    }

    /// Removes a listener. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        slots.len() != before
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    //--- Emission ---------------------------------------------------------

    /// Notifies every connected listener in registration order.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = {
            let mut slots = self.slots.borrow_mut();
            let snapshot = slots.iter().map(|slot| slot.listener.clone()).collect();
            slots.retain(|slot| !slot.once);
            snapshot
        };

        for listener in snapshot {
            match listener.try_borrow_mut() {
                Ok(mut call) => call(event),
                // A listener that re-emits its own signal would recurse here
                Err(_) => warn!("Skipping listener already running on this signal"),
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Number of connected listeners.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Returns true if no listener is connected.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn register<F>(&self, listener: F, once: bool) -> ConnectionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = ConnectionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        self.slots.borrow_mut().push(Slot { id, once, listener });
        id
    }
}

//--- Trait Implementations -----------------------------------------------

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
