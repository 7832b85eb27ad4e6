//! Scenario tests spanning storage, registries and the scheduler

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;

use crate::config::SceneConfig;
use crate::ecs::components::{Transform, Velocity};
use crate::ecs::systems::PhysicsSystem;
use crate::ecs::{
    EntityId, SparseSet, System, SystemContext, SystemError, SystemId, SystemScheduler, World,
};
use crate::events::EventBus;
use crate::foundation::math::Vec3;

fn frame(scheduler: &mut SystemScheduler, world: &mut World, events: &EventBus, delta_time: f32) {
    scheduler.process_added_systems(world, events);
    scheduler.process_removed_systems(world, events);
    scheduler.update(world, events, delta_time);
}

/// Records each update in a shared log and optionally touches the scheduler
/// from inside its update
struct Scripted {
    name: &'static str,
    priority: i32,
    log: Rc<RefCell<Vec<String>>>,
    spawn_on_first_update: Option<Box<dyn System>>,
    remove_on_first_update: Option<SystemId>,
}

impl Scripted {
    fn new(name: &'static str, priority: i32, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name,
            priority,
            log: Rc::clone(log),
            spawn_on_first_update: None,
            remove_on_first_update: None,
        }
    }
}

impl System for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) -> Result<(), SystemError> {
        self.log.borrow_mut().push(self.name.to_string());
        if let Some(system) = self.spawn_on_first_update.take() {
            ctx.commands.add_system(system);
        }
        if let Some(id) = self.remove_on_first_update.take() {
            ctx.commands.remove_system(id);
        }
        Ok(())
    }
}

#[test]
fn test_sparse_set_matches_model_under_random_operations() {
    let mut set = SparseSet::new();
    let mut model: HashMap<EntityId, u64> = HashMap::new();
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;

    for step in 0..2_000_u64 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let entity = EntityId::from_raw(u32::try_from(seed % 64).unwrap());

        if seed % 3 == 0 {
            assert_eq!(set.remove(entity), model.remove(&entity).is_some());
        } else {
            let inserted = set.insert(entity, step);
            assert_eq!(inserted, !model.contains_key(&entity));
            model.entry(entity).or_insert(step);
        }

        assert_eq!(set.len(), model.len());
        for (id, value) in &model {
            assert!(set.contains(*id));
            assert_eq!(set.get(*id), value);
        }
    }
}

#[test]
fn test_removed_id_can_be_added_again() {
    let mut set = SparseSet::new();
    let entity = EntityId::from_raw(3);
    set.insert(entity, 'a');
    set.remove(entity);

    assert!(set.insert(entity, 'b'));
    assert_eq!(set.get(entity), &'b');
}

#[test]
fn test_position_velocity_one_frame() {
    let mut world = World::new();
    let events = EventBus::new();
    let mut scheduler = SystemScheduler::new();

    let entity = world.create_entity();
    world.create_component(entity, Transform::default());
    world.create_component(entity, Velocity::linear(Vec3::new(1.0, 0.0, 0.0)));
    scheduler.add_system(Box::new(PhysicsSystem::new(10)));

    frame(&mut scheduler, &mut world, &events, 1.0);

    let transform = world.get_component::<Transform>(entity).unwrap();
    assert_eq!(transform.position, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_lower_priority_effect_is_visible_first() {
    struct Counter {
        priority: i32,
        seen: Rc<RefCell<Vec<(i32, u32)>>>,
    }

    impl System for Counter {
        fn name(&self) -> &str {
            "Counter"
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> Result<(), SystemError> {
            let shared = EntityId::from_raw(0);
            let counter = ctx.world.get_component_mut::<u32>(shared).ok_or_else(|| {
                SystemError::Failed { system: "Counter".to_string(), reason: "no counter".to_string() }
            })?;
            *counter += 1;
            self.seen.borrow_mut().push((self.priority, *counter));
            Ok(())
        }
    }

    let mut world = World::new();
    let events = EventBus::new();
    let mut scheduler = SystemScheduler::new();
    let shared = world.create_entity();
    world.create_component(shared, 0_u32);
    let seen = Rc::new(RefCell::new(Vec::new()));

    scheduler.add_system(Box::new(Counter { priority: 10, seen: Rc::clone(&seen) }));
    scheduler.add_system(Box::new(Counter { priority: 5, seen: Rc::clone(&seen) }));
    frame(&mut scheduler, &mut world, &events, 0.016);

    assert_eq!(*seen.borrow(), vec![(5, 1), (10, 2)]);
}

#[test]
fn test_system_added_mid_frame_waits_one_frame() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    let events = EventBus::new();
    let mut scheduler = SystemScheduler::new();

    let mut spawner = Scripted::new("spawner", 0, &log);
    spawner.spawn_on_first_update = Some(Box::new(Scripted::new("spawned", -5, &log)));
    scheduler.add_system(Box::new(spawner));

    frame(&mut scheduler, &mut world, &events, 0.016);
    assert_eq!(*log.borrow(), vec!["spawner"]);
    assert_eq!(scheduler.pending_len(), 1);

    frame(&mut scheduler, &mut world, &events, 0.016);
    assert_eq!(*log.borrow(), vec!["spawner", "spawned", "spawner"]);
}

#[test]
fn test_system_removed_mid_frame_finishes_that_frame() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    let events = EventBus::new();
    let mut scheduler = SystemScheduler::new();

    let mut remover = Scripted::new("remover", 0, &log);
    let victim_id = scheduler.add_system(Box::new(Scripted::new("victim", 1, &log)));
    remover.remove_on_first_update = Some(victim_id);
    scheduler.add_system(Box::new(remover));

    frame(&mut scheduler, &mut world, &events, 0.016);
    assert_eq!(*log.borrow(), vec!["remover", "victim"]);

    frame(&mut scheduler, &mut world, &events, 0.016);
    assert_eq!(*log.borrow(), vec!["remover", "victim", "remover"]);
    assert!(!scheduler.is_active(victim_id));
}

#[test]
fn test_scene_with_unknown_component_still_assembles() {
    let scene: SceneConfig = serde_json::from_value(json!({
        "Entities": [
            { "Components": [
                { "Type": "Transform", "Position": [1.0, 1.0, 1.0] },
                { "Type": "Teleporter", "Target": "moon" }
            ] },
            { "Components": [
                { "Type": "Velocity", "Linear": [0.0, 0.0, 2.0] }
            ] }
        ]
    }))
    .unwrap();

    let mut world = World::with_builtin_components();
    let spawned: Vec<EntityId> = scene
        .entities
        .iter()
        .map(|definition| world.spawn_from_definition(definition))
        .collect();

    assert_eq!(world.entities().len(), 2);
    assert!(world.has_component::<Transform>(spawned[0]));
    assert_eq!(world.components().component_count(spawned[0]), 1);
    assert!(world.has_component::<Velocity>(spawned[1]));
}
