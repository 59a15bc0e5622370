//! Core types used throughout avatarkit

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local transform of a bone: position, rotation, and scale relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Decompose an affine matrix into position, rotation, and scale
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Compute the model matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Euler rotation in degrees, applied in Z, X, Y order
    pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
        Quat::from_euler(
            glam::EulerRot::YXZ,
            y.to_radians(),
            x.to_radians(),
            z.to_radians(),
        )
    }
}

/// A bone of a skinned mesh as exported by the avatar generator.
///
/// `bind_pose` maps mesh space into the bone's space (the inverse bind matrix),
/// so `bind_pose.inverse()` is the bone's rest transform in mesh space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBone {
    pub name: String,
    pub parent: Option<String>,
    pub bind_pose: Mat4,
}

impl MeshBone {
    pub fn new(name: impl Into<String>, parent: Option<&str>, bind_pose: Mat4) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            bind_pose,
        }
    }
}
