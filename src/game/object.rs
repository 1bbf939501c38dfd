//=========================================================================
// Scene Object
//=========================================================================
//
// Payload carried by game nodes and mirrored into the renderer.
//
// An `Object3D` is a lightweight handle: a process-unique id, a label, a
// transform and the ids of its attached children. Renderers resolve the
// ids against their own resources.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Vector3, Zero};

//=== Internal Dependencies ===============================================

use crate::core::tree::SceneObject;

//=== ObjectId ============================================================

/// Process-unique handle of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

//=== Object3D ============================================================

/// Transform node of the rendered scene.
#[derive(Debug, Clone)]
pub struct Object3D {
    id: ObjectId,
    label: &'static str,
    pub position: Vector3<f64>,
    /// Euler angles in radians (XYZ).
    pub rotation: Vector3<f64>,
    children: Vec<ObjectId>,
}

impl Object3D {
    /// Creates an object at the origin with no rotation.
    pub fn new(label: &'static str) -> Self {
        Self {
            id: ObjectId::next(),
            label,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            children: Vec::new(),
        }
    }

    /// Sets the position and returns the object (builder style).
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Ids of the attached children, in attach order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

impl SceneObject for Object3D {
    fn attach(&mut self, child: &Self) {
        if !self.children.contains(&child.id) {
            self.children.push(child.id);
        }
    }

    fn detach(&mut self, child: &Self) {
        self.children.retain(|id| *id != child.id);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Object3D::new("a");
        let b = Object3D::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn attach_is_idempotent_and_detach_removes() {
        let mut parent = Object3D::new("parent");
        let child = Object3D::new("child");

        parent.attach(&child);
        parent.attach(&child);
        assert_eq!(parent.children(), &[child.id()]);

        parent.detach(&child);
        assert!(parent.children().is_empty());
    }

    #[test]
    fn builder_sets_position() {
        let object = Object3D::new("outline").at(0.0, -30.0, 0.0);
        assert_eq!(object.position, Vector3::new(0.0, -30.0, 0.0));
        assert_eq!(object.label(), "outline");
    }
}
