//=========================================================================
// Parenting Mirror
//=========================================================================
//
// Keeps payload objects (e.g. renderer scene-graph handles) parented the
// same way as the nodes that own them.
//
//   NodeAdded   { node, parent } → parent.value.attach(node.value)
//   NodeRemoved { node, parent } → parent.value.detach(node.value)
//
// Nodes without a payload on either side are skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::behavior::NodeKey;
use super::node::TreeEvent;
use super::node_tree::NodeTree;
use super::signal::ConnectionId;

//=== SceneObject Trait ===================================================

/// A payload that can itself hold child payloads.
pub trait SceneObject {
    fn attach(&mut self, child: &Self);
    fn detach(&mut self, child: &Self);
}

//=== connect_parenting() =================================================

/// Mirrors every structural change of `tree` into its payload values.
///
/// Returns the subscription so the mirror can be disconnected.
pub fn connect_parenting<T, G, K>(tree: &NodeTree<T, G, K>) -> ConnectionId
where
    T: SceneObject + 'static,
    G: 'static,
    K: NodeKey,
{
    tree.on_event(|event| {
        let (node, parent, attach) = match event {
            TreeEvent::NodeAdded { node, parent } => (node, parent, true),
            TreeEvent::NodeRemoved { node, parent } => (node, parent, false),
            TreeEvent::IdChanged { .. } => return,
        };

        let (Ok(mut parent_value), Ok(child_value)) =
            (parent.value.try_borrow_mut(), node.value.try_borrow())
        else {
            warn!("Payload of node {:?} is borrowed, parenting not mirrored", node.id());
            return;
        };

        if let (Some(parent_value), Some(child_value)) =
            (parent_value.as_mut(), child_value.as_ref())
        {
            if attach {
                parent_value.attach(child_value);
            } else {
                parent_value.detach(child_value);
            }
        }
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::Node;

    /// Payload recording the names of its attached children.
    #[derive(Debug, Default)]
    struct Group {
        name: &'static str,
        children: Vec<&'static str>,
    }

    impl SceneObject for Group {
        fn attach(&mut self, child: &Self) {
            self.children.push(child.name);
        }

        fn detach(&mut self, child: &Self) {
            self.children.retain(|name| *name != child.name);
        }
    }

    fn group(name: &'static str) -> Group {
        Group { name, children: Vec::new() }
    }

    fn children_of(node: &crate::core::tree::NodeRef<Group, (), u8>) -> Vec<&'static str> {
        node.value().as_ref().map(|g| g.children.clone()).unwrap_or_default()
    }

    #[test]
    fn mirrors_additions_and_removals() {
        let tree: NodeTree<Group, (), u8> = NodeTree::with_root_value(group("scene"), ());
        connect_parenting(&tree);

        let outline = Node::new(Some(group("outline")));
        let cursor = Node::new(Some(group("cursor")));
        tree.add(outline.clone());
        outline.add(cursor.clone());

        assert_eq!(children_of(tree.root()), vec!["outline"]);
        assert_eq!(children_of(&outline), vec!["cursor"]);

        outline.remove(&cursor);
        assert!(children_of(&outline).is_empty());
    }

    #[test]
    fn subtree_added_at_once_is_mirrored_per_level() {
        let tree: NodeTree<Group, (), u8> = NodeTree::with_root_value(group("scene"), ());
        connect_parenting(&tree);

        let outline = Node::new(Some(group("outline")));
        let marker = Node::new(Some(group("marker")));
        outline.add(marker);

        tree.add(outline.clone());

        assert_eq!(children_of(tree.root()), vec!["outline"]);
        // Attached when the subtree entered the mirrored tree
        assert_eq!(children_of(&outline), vec!["marker"]);
    }

    #[test]
    fn nodes_without_payload_are_skipped() {
        let tree: NodeTree<Group, (), u8> = NodeTree::with_root_value(group("scene"), ());
        connect_parenting(&tree);

        tree.add(Node::new(None));

        assert!(children_of(tree.root()).is_empty());
    }

    #[test]
    fn disconnected_mirror_stops_tracking() {
        let tree: NodeTree<Group, (), u8> = NodeTree::with_root_value(group("scene"), ());
        let connection = connect_parenting(&tree);
        assert!(tree.disconnect(connection));

        tree.add(Node::new(Some(group("late"))));

        assert!(children_of(tree.root()).is_empty());
    }
}
