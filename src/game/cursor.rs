//=========================================================================
// Cursor
//=========================================================================
//
// Per-layer lane cursor driven by gestures.
//
// Architecture:
//   Input ──slide/tap──► Cursor
//                          ├─ Primary:    lane, angle → target_angle
//                          └─ Background: lane, angle → target_angle
//                          ↓ update(dt): exp_smooth toward targets
//                        payload rotation.z (primary angle)
//
// Angles are in radians and never wrap, so smoothing always takes the
// short way after a slide across lane 0.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;

use cgmath::Vector3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::context::GameContext;
use super::node_id::NodeId;
use super::object::Object3D;
use super::timing::exp_smooth;
use crate::core::input::{CursorControl, Layer};
use crate::core::tree::{Behavior, NodeRef};

//=== Constants ===========================================================

/// Lanes around the hit circle.
pub const FULL_LANES: u32 = 16;

/// Radius of the hit circle, in world units.
pub const HIT_RADIUS: f64 = 50.0;

const CURSOR_SMOOTHING: f64 = 30.0;

/// Angle covered by one lane.
pub fn lane_angle() -> f64 {
    TAU / FULL_LANES as f64
}

//=== LaneCursor ==========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LaneCursor {
    lane: u32,
    angle: f64,
    target_angle: f64,
}

//=== Cursor ==============================================================

/// Cursor behavior for both layers.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    layers: [LaneCursor; 2],
    last_tap: Option<(usize, Layer)>,
    tap_count: u32,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Accessors --------------------------------------------------------

    /// Lane index in `[0, FULL_LANES)`.
    pub fn lane(&self, layer: Layer) -> u32 {
        self.layers[layer.index()].lane
    }

    /// Current (smoothed) angle.
    pub fn angle(&self, layer: Layer) -> f64 {
        self.layers[layer.index()].angle
    }

    pub fn target_angle(&self, layer: Layer) -> f64 {
        self.layers[layer.index()].target_angle
    }

    /// Most recent tap size and layer.
    pub fn last_tap(&self) -> Option<(usize, Layer)> {
        self.last_tap
    }

    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// World position of `layer`'s cursor on the hit circle (XZ plane).
    pub fn position(&self, layer: Layer) -> Vector3<f64> {
        let angle = self.angle(layer);
        Vector3::new(angle.cos() * HIT_RADIUS, 0.0, angle.sin() * HIT_RADIUS)
    }

    /// Positions of the primary and background cursors.
    pub fn cursor_positions(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.position(Layer::Primary), self.position(Layer::Background))
    }

    //--- Animation --------------------------------------------------------

    /// Eases every layer toward its target.
    pub fn advance(&mut self, delta_time: f64) {
        for cursor in &mut self.layers {
            cursor.angle = exp_smooth(cursor.angle, cursor.target_angle, CURSOR_SMOOTHING, delta_time);
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl CursorControl for Cursor {
    fn slide(&mut self, delta: i32, layer: Layer) {
        let cursor = &mut self.layers[layer.index()];
        cursor.lane = (cursor.lane as i64 + delta as i64).rem_euclid(FULL_LANES as i64) as u32;
        cursor.target_angle += delta as f64 * lane_angle();
        debug!("Cursor {:?} slid {} to lane {}", layer, delta, cursor.lane);
    }

    fn tap(&mut self, size: usize, layer: Layer) {
        self.last_tap = Some((size, layer));
        self.tap_count += 1;
        debug!("Cursor {:?} tapped with {} keys", layer, size);
    }
}

impl Behavior<Object3D, GameContext, NodeId> for Cursor {
    fn update(&mut self, node: &NodeRef<Object3D, GameContext, NodeId>, delta_time: f64) {
        self.advance(delta_time);

        if let Some(object) = node.value_mut().as_mut() {
            object.rotation.z = self.angle(Layer::Primary);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
