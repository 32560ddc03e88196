//! Anchor and target geometry.
//!
//! The engine never moves anything. It only reads positions and facing of
//! the agent it drives (the anchor) and of whatever the agent is interested
//! in (the target).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Something with a position and a facing in world space.
pub trait Spatial {
    fn position(&self) -> Vec3;

    /// Unit vector the object faces. Defaults to +Z.
    fn forward(&self) -> Vec3 {
        Vec3::Z
    }
}

/// Position and orientation of an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Spatial for Pose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// A fixed point; faces +Z.
impl Spatial for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

/// Shared, mutable pose.
///
/// The owner of an agent keeps one clone and moves it every frame; the
/// machine keeps another and reads it when a state or guard asks for
/// distances. Clones share the same pose.
#[derive(Clone, Debug, Default)]
pub struct PoseHandle(Rc<RefCell<Pose>>);

impl PoseHandle {
    pub fn new(pose: Pose) -> Self {
        Self(Rc::new(RefCell::new(pose)))
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(Pose::at(position))
    }

    pub fn pose(&self) -> Pose {
        *self.0.borrow()
    }

    pub fn set_position(&self, position: Vec3) {
        self.0.borrow_mut().position = position;
    }

    pub fn translate(&self, delta: Vec3) {
        self.0.borrow_mut().position += delta;
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.0.borrow_mut().rotation = rotation;
    }

    /// Turn to face `point`, keeping the up axis vertical.
    pub fn face_towards(&self, point: Vec3) {
        let mut pose = self.0.borrow_mut();
        let flat = Vec3::new(point.x - pose.position.x, 0.0, point.z - pose.position.z);
        if flat.length_squared() > f32::EPSILON {
            pose.rotation = Quat::from_rotation_arc(Vec3::Z, flat.normalize());
        }
    }
}

impl Spatial for PoseHandle {
    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn forward(&self) -> Vec3 {
        self.0.borrow().forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_faces_forward() {
        let pose = Pose::default();
        assert_eq!(pose.position, Vec3::ZERO);
        assert!(pose.forward().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn handle_clones_share_pose() {
        let handle = PoseHandle::at(Vec3::ONE);
        let other = handle.clone();

        other.translate(Vec3::X);

        assert_eq!(handle.position(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn face_towards_rotates_forward() {
        let handle = PoseHandle::default();
        handle.face_towards(Vec3::new(5.0, 3.0, 0.0));

        assert!(handle.forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn face_towards_ignores_point_directly_above() {
        let handle = PoseHandle::default();
        handle.face_towards(Vec3::new(0.0, 10.0, 0.0));

        assert!(handle.forward().abs_diff_eq(Vec3::Z, 1e-6));
    }
}
