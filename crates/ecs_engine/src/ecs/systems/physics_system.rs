//! Velocity integration

use crate::ecs::components::{Transform, Velocity};
use crate::ecs::{EntityId, System, SystemContext, SystemError};

/// Applies [`Velocity`] to [`Transform`] with explicit Euler steps
pub struct PhysicsSystem {
    priority: i32,
}

impl PhysicsSystem {
    /// Create a physics system with the given priority
    pub fn new(priority: i32) -> Self {
        Self { priority }
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "PhysicsSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) -> Result<(), SystemError> {
        let moving: Vec<(EntityId, Velocity)> = ctx
            .world
            .components()
            .pool::<Velocity>()
            .map(|pool| pool.iter().map(|(entity, velocity)| (entity, *velocity)).collect())
            .unwrap_or_default();

        for (entity, velocity) in moving {
            if let Some(transform) = ctx.world.get_component_mut::<Transform>(entity) {
                transform.translate(velocity.linear * delta_time);
                transform.rotate(velocity.angular * delta_time);
            }
        }
        Ok(())
    }
}
