//=========================================================================
// Node Identifiers
//=========================================================================

/// Stable identifiers of the game's named nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// Keyboard interpreter.
    Input,

    /// Hit-circle outline holding the cursor and lane markers.
    Lanes,

    /// Per-layer lane cursor.
    Cursor,

    /// Camera rig following the cursor.
    Camera,
}
