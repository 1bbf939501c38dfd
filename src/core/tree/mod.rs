//=========================================================================
// Node Tree Module
//=========================================================================
//
// Generic lifecycle and update hierarchy every game object composes with.
//
// Architecture:
//   NodeTree (root, owns Rc<G>)
//     └─ Node ─┬─ Behavior (init / update hooks, downcastable)
//              ├─ children + dispatch subset
//              ├─ recursive name index (K → NodeRef)
//              └─ Signal<TreeEvent> ──► connect_parenting (payload mirror)
//
//=========================================================================

//=== Module Declarations =================================================

mod behavior;
mod node;
mod node_tree;
mod parenting;
mod signal;

//=== Public Exports ======================================================

pub use behavior::{AsAny, Behavior, Inert, NodeKey};
pub use node::{Node, NodeRef, TreeEvent};
pub use node_tree::NodeTree;
pub use parenting::{connect_parenting, SceneObject};
pub use signal::{ConnectionId, Signal};
