//! Entity identifiers and their lifecycle

use std::collections::BTreeSet;
use std::fmt;

use super::ComponentRegistry;

/// Entity identifier
///
/// An opaque handle with no data of its own. Ids handed out by
/// [`EntityRegistry`] are never reused, so a stale id can be detected with
/// [`EntityRegistry::is_alive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Wrap a raw id value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into sparse arrays
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the set of live entities
///
/// Ids come from a monotonic counter. Destroyed ids are retired for the
/// lifetime of the registry (until [`Self::clear`]).
#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_id: u32,
    alive: BTreeSet<EntityId>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    pub fn create_entity(&mut self) -> EntityId {
        let entity = EntityId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("entity id space exhausted");
        self.alive.insert(entity);
        log::trace!("Created entity {entity}");
        entity
    }

    /// Destroy `entity`, removing every component it owns first
    ///
    /// Returns `false` if the entity was not alive; nothing is touched then.
    pub fn destroy_entity(&mut self, entity: EntityId, components: &mut ComponentRegistry) -> bool {
        if !self.alive.contains(&entity) {
            log::warn!("Attempted to destroy unknown entity {entity}");
            return false;
        }

        let removed = components.remove_all_components(entity);
        self.alive.remove(&entity);
        log::trace!("Destroyed entity {entity} ({removed} components)");
        true
    }

    /// Check whether `entity` is alive
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Whether no entity is alive
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Iterate live entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().copied()
    }

    /// Forget every entity and restart the id counter
    pub fn clear(&mut self) {
        self.alive.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_destroyed_ids_are_not_reused() {
        let mut registry = EntityRegistry::new();
        let mut components = ComponentRegistry::new();
        let a = registry.create_entity();

        assert!(registry.destroy_entity(a, &mut components));
        assert!(!registry.is_alive(a));

        let b = registry.create_entity();
        assert_ne!(a, b);
    }

    #[test]
    fn test_destroy_cascades_into_components() {
        let mut registry = EntityRegistry::new();
        let mut components = ComponentRegistry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        components.create_component(a, 1_u32);
        components.create_component(a, "tag");
        components.create_component(b, 2_u32);

        registry.destroy_entity(a, &mut components);

        assert!(!components.has_component::<u32>(a));
        assert!(!components.has_component::<&'static str>(a));
        assert_eq!(components.get_component::<u32>(b), Some(&2));
    }

    #[test]
    fn test_destroy_unknown_entity() {
        let mut registry = EntityRegistry::new();
        let mut components = ComponentRegistry::new();
        assert!(!registry.destroy_entity(EntityId::from_raw(42), &mut components));
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut registry = EntityRegistry::new();
        registry.create_entity();
        registry.create_entity();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.create_entity(), EntityId::from_raw(0));
    }
}
