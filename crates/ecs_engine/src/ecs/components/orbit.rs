//! Circular motion around a fixed center

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};

/// Moves an entity on a horizontal circle around `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Orbit {
    /// Circle center
    pub center: Vec3,
    /// Circle radius
    pub radius: f32,
    /// Angular speed in radians per second
    pub speed: f32,
    /// Direction of travel seen from above
    pub clockwise: bool,
    /// Current angle in radians
    pub angle: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 5.0,
            speed: 2.0,
            clockwise: false,
            angle: 0.0,
        }
    }
}

impl Orbit {
    /// Advance the angle by `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        let step = self.speed * delta_time;
        let signed = if self.clockwise { -step } else { step };
        self.angle = utils::wrap_angle(self.angle + signed);
    }

    /// Point on the circle at the current angle
    pub fn position(&self) -> Vec3 {
        self.center + Vec3::new(self.radius * self.angle.cos(), 0.0, self.radius * self.angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_of_travel() {
        let mut counter = Orbit { speed: PI / 2.0, ..Orbit::default() };
        let mut clockwise = Orbit { clockwise: true, ..counter };
        counter.advance(1.0);
        clockwise.advance(1.0);

        assert_relative_eq!(counter.position().z, 5.0, epsilon = 1e-4);
        assert_relative_eq!(clockwise.position().z, -5.0, epsilon = 1e-4);
    }
}
