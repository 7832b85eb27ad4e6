//! ECS World: the entity and component registries side by side
//!
//! Both registries are private. Component writes go through the world so
//! that only live entities can own components.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{components, Component, ComponentError, ComponentRegistry, EntityId, EntityRegistry};
use crate::config::EntityDefinition;

/// ECS World containing all entities and components
#[derive(Debug, Default)]
pub struct World {
    entities: EntityRegistry,
    components: ComponentRegistry,
}

impl World {
    /// Create an empty world with no component factories
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world whose component registry knows the built-in
    /// component tags
    pub fn with_builtin_components() -> Self {
        let mut world = Self::new();
        components::register_builtin_factories(&mut world.components);
        world
    }

    /// Live entity set
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Component pools, read-only
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Register a factory so records tagged `tag` build a `T`
    pub fn register_component<T>(&mut self, tag: impl Into<String>)
    where
        T: Component + DeserializeOwned,
    {
        self.components.register_factory::<T>(tag);
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> EntityId {
        self.entities.create_entity()
    }

    /// Destroy an entity and every component it owns
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        self.entities.destroy_entity(entity, &mut self.components)
    }

    /// Check whether `entity` is alive
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    /// Attach `component` to a live entity
    ///
    /// Returns `false` when the entity is not alive or already has a `T`.
    pub fn create_component<T: Component>(&mut self, entity: EntityId, component: T) -> bool {
        if !self.is_alive(entity) {
            log::warn!("Entity {entity} is not alive; {} not attached", std::any::type_name::<T>());
            return false;
        }
        self.components.create_component(entity, component)
    }

    /// Build a component from a configuration record and attach it to a
    /// live entity
    pub fn create_component_from_record(
        &mut self,
        entity: EntityId,
        record: &Value,
    ) -> Result<bool, ComponentError> {
        if !self.is_alive(entity) {
            return Err(ComponentError::DeadEntity(entity));
        }
        self.components.create_component_from_record(entity, record)
    }

    /// Detach the `T` owned by `entity`
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> bool {
        self.components.remove_component::<T>(entity)
    }

    /// Borrow the `T` owned by `entity`
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.components.get_component(entity)
    }

    /// Mutably borrow the `T` owned by `entity`
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.components.get_component_mut(entity)
    }

    /// Whether `entity` owns a `T`
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.components.has_component::<T>(entity)
    }

    /// Create an entity and attach every component its definition names
    ///
    /// Records that fail (unknown type, bad fields, missing tag) are logged
    /// and skipped; the remaining components are still attached.
    pub fn spawn_from_definition(&mut self, definition: &EntityDefinition) -> EntityId {
        let entity = self.create_entity();
        for record in &definition.components {
            match self.create_component_from_record(entity, record) {
                Ok(true) => {}
                Ok(false) => {
                    log::warn!("Entity {entity}: duplicate component record ignored: {record}");
                }
                Err(e) => log::warn!("Entity {entity}: skipped component: {e}"),
            }
        }
        entity
    }

    /// Drop every component, then every entity
    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
    }
}
