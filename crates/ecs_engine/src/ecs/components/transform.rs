//! Transform component
//!
//! Pure data: where an entity is, how it is turned, and how big it is.
//! Rotation is stored as Euler angles in radians (pitch, yaw, roll), the
//! form the renderer's draw call consumes.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};

/// Spatial transformation in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Transform {
    /// World space position
    pub position: Vec3,

    /// Euler rotation in radians
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate by `delta` radians per axis, keeping each angle in `[0, TAU)`
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation = (self.rotation + delta).map(utils::wrap_angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::TAU;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotate_wraps() {
        let mut transform = Transform::default();
        transform.rotate(Vec3::new(TAU + 0.5, 0.0, -0.5));
        assert_relative_eq!(transform.rotation.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(transform.rotation.z, TAU - 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_deserialize_partial_record() {
        let transform: Transform = serde_json::from_value(serde_json::json!({
            "Type": "Transform",
            "Position": [1.0, 2.0, 3.0]
        }))
        .unwrap();

        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }
}
