//=========================================================================
// Camera Rig
//=========================================================================
//
// Follows both cursors around the hit circle.
//
// Architecture:
//   Cursor (already updated this frame, post-order)
//     ↓ cursor_positions()
//   CameraRig::update(dt)
//     ├─ ease both positions (smoothing 10)
//     ├─ center = midpoint → orbit angle (smoothing 5, shortest turn)
//     ├─ spread = how far apart the layers are (0 same, 1 opposite)
//     └─ Camera { position, target }
//
// The rig node must come after the lanes subtree so the cursor has
// advanced before it is read.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;

use cgmath::{InnerSpace, Matrix3, Rad, Vector3, VectorSpace, Zero};

//=== Internal Dependencies ===============================================

use super::context::GameContext;
use super::cursor::{Cursor, HIT_RADIUS};
use super::node_id::NodeId;
use super::object::Object3D;
use super::timing::{exp_smooth, exp_smooth_alpha};
use crate::core::tree::{Behavior, NodeRef};

//=== Tuning ==============================================================

const FOLLOW_SMOOTHING: f64 = 10.0;
const ORBIT_SMOOTHING: f64 = 5.0;
const SPREAD_HEIGHT: f64 = 50.0;
const BASE_HEIGHT: f64 = 10.0;

//=== Camera ==============================================================

/// Look-at camera handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f64>,
    pub target: Vector3<f64>,
}

impl Camera {
    /// Unit view direction (zero if position and target coincide).
    pub fn forward(&self) -> Vector3<f64> {
        let direction = self.target - self.position;
        if direction.magnitude2() == 0.0 {
            Vector3::zero()
        } else {
            direction.normalize()
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            target: Vector3::unit_z(),
        }
    }
}

//=== CameraRig ===========================================================

/// Camera behavior reading the cursor node.
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: Camera,
    eased_primary: Vector3<f64>,
    eased_background: Vector3<f64>,
    orbit_angle: f64,
    orbit_target: f64,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            eased_primary: Vector3::zero(),
            eased_background: Vector3::zero(),
            orbit_angle: 0.0,
            orbit_target: 0.0,
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn orbit_angle(&self) -> f64 {
        self.orbit_angle
    }

    /// Advances the rig toward the given cursor positions.
    pub fn follow(&mut self, primary: Vector3<f64>, background: Vector3<f64>, delta_time: f64) {
        let alpha = exp_smooth_alpha(FOLLOW_SMOOTHING, delta_time);
        self.eased_primary = self.eased_primary.lerp(primary, alpha);
        self.eased_background = self.eased_background.lerp(background, alpha);

        let center = self.eased_primary.lerp(self.eased_background, 0.5);

        // Keep the previous heading when the center is ambiguous
        if center.magnitude() > 0.01 {
            let heading = center.z.atan2(center.x);
            self.orbit_target = heading + ((self.orbit_angle - heading) / TAU).round() * TAU;
        }
        self.orbit_angle = exp_smooth(self.orbit_angle, self.orbit_target, ORBIT_SMOOTHING, delta_time);

        let spread = match (flat_direction(primary), flat_direction(self.eased_background)) {
            (Some(a), Some(b)) => 1.0 - (a.dot(b) * 0.5 + 0.5),
            _ => 0.0,
        };

        let offset = Vector3::new(-spread * HIT_RADIUS, spread * SPREAD_HEIGHT + BASE_HEIGHT, 0.0);
        self.camera.position = Matrix3::from_angle_y(Rad(-self.orbit_angle)) * offset;
        self.camera.target = center;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal unit direction of `v`, if it has one.
fn flat_direction(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    if flat.magnitude2() == 0.0 {
        None
    } else {
        Some(flat.normalize())
    }
}

//--- Trait Implementations -----------------------------------------------

impl Behavior<Object3D, GameContext, NodeId> for CameraRig {
    fn update(&mut self, node: &NodeRef<Object3D, GameContext, NodeId>, delta_time: f64) {
        let positions = node
            .root()
            .get(&NodeId::Cursor)
            .and_then(|cursor| cursor.behavior::<Cursor>().map(|c| c.cursor_positions()));

        if let Some((primary, background)) = positions {
            self.follow(primary, background, delta_time);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
