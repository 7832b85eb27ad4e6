//! Movement components

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Linear and angular velocity, integrated by the physics system
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Velocity {
    /// Units per second
    pub linear: Vec3,
    /// Radians per second, per axis
    pub angular: Vec3,
}

impl Velocity {
    /// Linear-only velocity
    pub fn linear(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::zeros(),
        }
    }
}

/// Marks an entity as steered by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Controllable {
    /// Speed applied along each pressed direction
    pub speed: f32,
}

impl Default for Controllable {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}
