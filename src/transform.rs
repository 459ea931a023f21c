//! Position, orientation and scale of the model and of simulated tools.

use crate::math::{Mat4, Vec3};

/// A transform with position, rotation (Euler angles) and scale.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// pose.translate(Vec3::UP * 0.1).rotate_z(0.05);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // radians: x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Rotation only: RotationX * RotationY * RotationZ.
    fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
    }

    /// Translation * Rotation * Scale.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position) * self.rotation_matrix() * Mat4::scaling(self.scale)
    }

    /// Translation * Rotation, ignoring scale. This is the shape of a
    /// tracked tool pose.
    pub fn rigid_matrix(&self) -> Mat4 {
        Mat4::translation(self.position) * self.rotation_matrix()
    }
}
