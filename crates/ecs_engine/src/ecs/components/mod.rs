//! Built-in components
//!
//! Every built-in component can be written in a scene file under the tag
//! listed in [`register_builtin_factories`].

pub mod transform;
pub mod movement;
pub mod renderable;
pub mod orbit;

pub use transform::Transform;
pub use movement::{Controllable, Velocity};
pub use renderable::{Camera, Renderable};
pub use orbit::Orbit;

use super::ComponentRegistry;

/// Register scene tags for every built-in component
///
/// | Tag            | Component        |
/// |----------------|------------------|
/// | `Transform`    | [`Transform`]    |
/// | `Velocity`     | [`Velocity`]     |
/// | `Controllable` | [`Controllable`] |
/// | `Renderable`   | [`Renderable`]   |
/// | `Camera`       | [`Camera`]       |
/// | `Orbit`        | [`Orbit`]        |
pub fn register_builtin_factories(registry: &mut ComponentRegistry) {
    registry.register_factory::<Transform>("Transform");
    registry.register_factory::<Velocity>("Velocity");
    registry.register_factory::<Controllable>("Controllable");
    registry.register_factory::<Renderable>("Renderable");
    registry.register_factory::<Camera>("Camera");
    registry.register_factory::<Orbit>("Orbit");
}
