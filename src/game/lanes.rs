//=========================================================================
// Lanes
//=========================================================================
//
// Hit-circle subtree.
//
//   Lanes (outline, y = -30)
//     ├─ Cursor        (updating)
//     └─ lane marker × FULL_LANES (rotated about Y)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;

//=== Internal Dependencies ===============================================

use super::cursor::{Cursor, FULL_LANES};
use super::node_id::NodeId;
use super::object::Object3D;
use super::GameNode;
use crate::core::tree::Node;

/// Height of the outline below the scene origin.
const OUTLINE_HEIGHT: f64 = -30.0;

/// Builds the lanes subtree, ready to be added to a game tree.
pub fn build() -> GameNode {
    let outline = Node::new(Some(Object3D::new("lanes").at(0.0, OUTLINE_HEIGHT, 0.0))).with_id(NodeId::Lanes);

    outline.add(
        Node::with_behavior(Some(Object3D::new("cursor")), Cursor::new())
            .with_id(NodeId::Cursor)
            .updating(),
    );

    for lane in 0..FULL_LANES {
        let mut marker = Object3D::new("lane");
        marker.rotation.y = TAU * lane as f64 / FULL_LANES as f64;
        outline.add(Node::new(Some(marker)));
    }

    outline
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtree_holds_cursor_and_one_marker_per_lane() {
        let lanes = build();

        assert_eq!(lanes.child_count(), 1 + FULL_LANES as usize);
        assert!(lanes.get(&NodeId::Cursor).is_some());
        assert_eq!(lanes.id(), Some(NodeId::Lanes));
    }

    #[test]
    fn markers_are_spread_around_the_circle() {
        let lanes = build();

        let rotations: Vec<f64> = lanes
            .children()
            .iter()
            .filter(|n| n.id().is_none())
            .filter_map(|n| n.value().as_ref().map(|o| o.rotation.y))
            .collect();

        assert_eq!(rotations.len(), FULL_LANES as usize);
        assert_eq!(rotations[0], 0.0);
        assert!((rotations[4] - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn cursor_wants_updates() {
        let lanes = build();
        let cursor = lanes.get(&NodeId::Cursor).unwrap();

        assert!(cursor.updates());
        assert!(cursor.behavior::<Cursor>().is_some());
    }
}
