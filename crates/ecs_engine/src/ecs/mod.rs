//! Entity-Component-System implementation
//!
//! Components live in one sparse set per type, entities are bare ids, and
//! systems run once per frame in priority order.

pub mod storage;
pub mod entity;
pub mod component;
pub mod world;
pub mod system;
pub mod scheduler;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use storage::SparseSet;
pub use entity::{EntityId, EntityRegistry};
pub use component::{Component, ComponentError, ComponentRegistry};
pub use world::World;
pub use system::{System, SystemCommands, SystemContext, SystemError, SystemId};
pub use scheduler::SystemScheduler;
