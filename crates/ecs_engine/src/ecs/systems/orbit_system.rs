//! Circular motion for entities with an [`Orbit`]

use crate::ecs::components::{Orbit, Transform};
use crate::ecs::{EntityId, SparseSet, System, SystemContext, SystemError, World};

/// Moves orbiting entities around their centers
///
/// The list of orbiting entities is gathered on start and gathered again
/// whenever the set of entities owning an `Orbit` differs from it.
pub struct OrbitSystem {
    priority: i32,
    orbiting: Vec<EntityId>,
}

impl OrbitSystem {
    /// Create an orbit system with the given priority
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            orbiting: Vec::new(),
        }
    }

    fn refresh(&mut self, world: &World) {
        self.orbiting = world.components().entities_with::<Orbit>();
        log::debug!("Tracking {} orbiting entities", self.orbiting.len());
    }
}

impl System for OrbitSystem {
    fn name(&self) -> &str {
        "OrbitSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_start(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        self.refresh(ctx.world);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) -> Result<(), SystemError> {
        let current = ctx.world.components().pool::<Orbit>().map_or(&[][..], SparseSet::ids);
        if current != self.orbiting.as_slice() {
            self.refresh(ctx.world);
        }

        for &entity in &self.orbiting {
            let Some(orbit) = ctx.world.get_component_mut::<Orbit>(entity) else {
                continue;
            };
            orbit.advance(delta_time);
            let position = orbit.position();

            if let Some(transform) = ctx.world.get_component_mut::<Transform>(entity) {
                transform.position = position;
            }
        }
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut SystemContext<'_>) {
        self.orbiting.clear();
    }
}
