//! Component trait and the registry that owns every component pool

use std::any::{Any, TypeId};
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::{EntityId, SparseSet};

/// Key naming the component type inside a configuration record
pub const TYPE_TAG_KEY: &str = "Type";

/// Marker trait for components
///
/// Any owned `'static` type can be attached to an entity.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Errors raised while building components from configuration records
#[derive(Error, Debug)]
pub enum ComponentError {
    /// The record names a type with no registered factory
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// The record has no string `Type` field
    #[error("component record has no 'Type' tag")]
    MissingTypeTag,

    /// The target entity was never created or has been destroyed
    #[error("entity {0} is not alive")]
    DeadEntity(EntityId),

    /// The record's fields do not match the component layout
    #[error("invalid fields for component '{tag}': {source}")]
    InvalidFields {
        /// Type tag of the failing record
        tag: String,
        /// Underlying deserialization error
        source: serde_json::Error,
    },
}

/// Type-erased view of a `SparseSet<T>` so pools of different types can
/// share one map
trait ComponentPool {
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn contains_entity(&self, entity: EntityId) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentPool for SparseSet<T> {
    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity)
    }

    fn contains_entity(&self, entity: EntityId) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds one component type from an untyped record and inserts it
type ComponentFactory = fn(&mut ComponentRegistry, EntityId, &Value) -> Result<bool, ComponentError>;

fn build_from_record<T>(
    registry: &mut ComponentRegistry,
    entity: EntityId,
    record: &Value,
) -> Result<bool, ComponentError>
where
    T: Component + DeserializeOwned,
{
    let component = T::deserialize(record).map_err(|source| ComponentError::InvalidFields {
        tag: tag_of(record).unwrap_or_default().to_string(),
        source,
    })?;
    Ok(registry.create_component(entity, component))
}

fn tag_of(record: &Value) -> Option<&str> {
    record.get(TYPE_TAG_KEY).and_then(Value::as_str)
}

/// Owns exactly one [`SparseSet`] per component type
#[derive(Default)]
pub struct ComponentRegistry {
    pools: HashMap<TypeId, Box<dyn ComponentPool>>,
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry with no factories
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `component` to `entity`
    ///
    /// Returns `false` if the entity already has a component of this type.
    pub fn create_component<T: Component>(&mut self, entity: EntityId, component: T) -> bool {
        self.pool_or_insert::<T>().insert(entity, component)
    }

    /// Detach the `T` component from `entity`
    ///
    /// Returns `false` if there was none.
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> bool {
        self.pool_mut::<T>().is_some_and(|pool| pool.remove(entity))
    }

    /// Borrow the `T` component of `entity`
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.pool::<T>()?.try_get(entity)
    }

    /// Mutably borrow the `T` component of `entity`
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.pool_mut::<T>()?.try_get_mut(entity)
    }

    /// Check whether `entity` has a `T` component
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.pool::<T>().is_some_and(|pool| pool.contains(entity))
    }

    /// Borrow the pool for `T`, if any component of that type was ever added
    pub fn pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.pools
            .get(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any().downcast_ref())
    }

    /// Mutably borrow the pool for `T`
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any_mut().downcast_mut())
    }

    /// Entities that currently own a `T` component, in pool order
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.pool::<T>()
            .map(|pool| pool.ids().to_vec())
            .unwrap_or_default()
    }

    /// Number of `T` components stored
    pub fn count<T: Component>(&self) -> usize {
        self.pool::<T>().map_or(0, SparseSet::len)
    }

    /// Number of components of any type owned by `entity`
    pub fn component_count(&self, entity: EntityId) -> usize {
        self.pools
            .values()
            .filter(|pool| pool.contains_entity(entity))
            .count()
    }

    /// Remove every component owned by `entity`, returning how many
    pub fn remove_all_components(&mut self, entity: EntityId) -> usize {
        self.pools
            .values_mut()
            .map(|pool| pool.remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Make `T` constructible from configuration records tagged `tag`
    ///
    /// Registering the same tag again replaces the previous factory.
    pub fn register_factory<T>(&mut self, tag: impl Into<String>)
    where
        T: Component + DeserializeOwned,
    {
        let tag = tag.into();
        if self.factories.insert(tag.clone(), build_from_record::<T>).is_some() {
            log::debug!("Replaced component factory for '{tag}'");
        }
    }

    /// Whether a factory is registered under `tag`
    pub fn has_factory(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Build a component from an untyped record and attach it to `entity`
    ///
    /// The record must carry a `Type` tag naming a registered factory; the
    /// remaining fields are deserialized into the component. Returns
    /// `Ok(false)` when the entity already has that component type.
    pub fn create_component_from_record(
        &mut self,
        entity: EntityId,
        record: &Value,
    ) -> Result<bool, ComponentError> {
        let tag = tag_of(record).ok_or(ComponentError::MissingTypeTag)?;
        let factory = *self
            .factories
            .get(tag)
            .ok_or_else(|| ComponentError::UnknownComponentType(tag.to_string()))?;
        factory(self, entity, record)
    }

    /// Drop every pool; factories stay registered
    pub fn clear(&mut self) {
        self.pools.clear();
    }

    /// Number of component types with a pool
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    fn pool_or_insert<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut()
            .expect("pool stored under TypeId of T must be SparseSet<T>")
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sizes: Vec<usize> = self.pools.values().map(|pool| pool.len()).collect();
        f.debug_struct("ComponentRegistry")
            .field("pool_sizes", &sizes)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
