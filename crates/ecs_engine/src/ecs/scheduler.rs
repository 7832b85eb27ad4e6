//! System scheduling
//!
//! Lifecycle of a system:
//!
//! ```text
//! add_system -> pending add -> (process_added_systems) -> active
//! remove_system -> pending remove -> (process_removed_systems) -> removed
//! ```
//!
//! The active set is never mutated while it is being iterated: additions and
//! removals requested during a frame, including by systems themselves, wait
//! in [`SystemCommands`] until the next call to `process_added_systems` /
//! `process_removed_systems`.
//!
//! Update order is ascending priority, ties broken by registration order.

use std::collections::{BTreeMap, HashMap};

use super::{System, SystemCommands, SystemContext, SystemId, World};
use crate::events::{EngineEvent, EventBus};

/// Owns every system and runs their hooks in priority order
#[derive(Default)]
pub struct SystemScheduler {
    active: BTreeMap<(i32, SystemId), Box<dyn System>>,
    priorities: HashMap<SystemId, i32>,
    pending: SystemCommands,
}

impl SystemScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `system` for activation; it first updates on the next frame
    pub fn add_system(&mut self, system: Box<dyn System>) -> SystemId {
        self.pending.add_system(system)
    }

    /// Queue the system `id` for removal
    pub fn remove_system(&mut self, id: SystemId) {
        self.pending.remove_system(id);
    }

    /// Start every queued system and make it active
    pub fn process_added_systems(&mut self, world: &mut World, events: &EventBus) {
        // systems queued by a start hook wait for the next frame
        let added: Vec<_> = self.pending.added.drain(..).collect();

        for (id, mut system) in added {
            let mut ctx = SystemContext {
                world: &mut *world,
                events,
                commands: &mut self.pending,
            };
            if let Err(e) = system.on_start(&mut ctx) {
                log::error!("System '{}' ({id}) failed to start: {e}", system.name());
                continue;
            }

            let priority = system.priority();
            let name = system.name().to_string();
            log::debug!("Started system '{name}' ({id}, priority {priority})");
            self.priorities.insert(id, priority);
            self.active.insert((priority, id), system);
            events.emit(&EngineEvent::SystemStarted { name });
        }
    }

    /// Stop every system queued for removal and drop it
    pub fn process_removed_systems(&mut self, world: &mut World, events: &EventBus) {
        let removed: Vec<_> = self.pending.removed.drain(..).collect();

        for id in removed {
            let Some(mut system) = self
                .priorities
                .remove(&id)
                .and_then(|priority| self.active.remove(&(priority, id)))
            else {
                log::warn!("Ignoring removal of unknown or inactive {id}");
                continue;
            };

            let mut ctx = SystemContext {
                world: &mut *world,
                events,
                commands: &mut self.pending,
            };
            system.on_stop(&mut ctx);

            let name = system.name().to_string();
            log::debug!("Removed system '{name}' ({id})");
            events.emit(&EngineEvent::SystemStopped { name });
        }
    }

    /// Run one frame of every active system in priority order
    ///
    /// A failing system is logged and the remaining systems still run.
    pub fn update(&mut self, world: &mut World, events: &EventBus, delta_time: f32) {
        let Self { active, pending, .. } = self;

        for ((_, id), system) in active.iter_mut() {
            let mut ctx = SystemContext {
                world: &mut *world,
                events,
                commands: &mut *pending,
            };
            if let Err(e) = system.on_update(&mut ctx, delta_time) {
                log::error!("System '{}' ({id}) update failed: {e}", system.name());
            }
        }
    }

    /// Run every active system's stop hook
    ///
    /// Systems stay registered; pair with [`Self::clear`] for teardown.
    pub fn stop(&mut self, world: &mut World, events: &EventBus) {
        let Self { active, pending, .. } = self;

        for system in active.values_mut() {
            let mut ctx = SystemContext {
                world: &mut *world,
                events,
                commands: &mut *pending,
            };
            system.on_stop(&mut ctx);
            log::debug!("Stopped system '{}'", system.name());
        }
    }

    /// Drop every system, active or pending, without running any hook
    pub fn clear(&mut self) {
        self.active.clear();
        self.priorities.clear();
        self.pending.clear();
    }

    /// Whether `id` is currently active
    pub fn is_active(&self, id: SystemId) -> bool {
        self.priorities.contains_key(&id)
    }

    /// Number of active systems
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no system is active
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of queued additions and removals
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Names of active systems in update order
    pub fn system_names(&self) -> Vec<String> {
        self.active.values().map(|system| system.name().to_string()).collect()
    }
}

impl std::fmt::Debug for SystemScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemScheduler")
            .field("active", &self.system_names())
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: String,
        priority: i32,
        journal: Journal,
        fail_start: bool,
        fail_update: bool,
    }

    impl Recorder {
        fn boxed(name: &str, priority: i32, journal: &Journal) -> Box<dyn System> {
            Box::new(Self {
                name: name.to_string(),
                priority,
                journal: Rc::clone(journal),
                fail_start: false,
                fail_update: false,
            })
        }
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_start(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), crate::ecs::SystemError> {
            self.journal.borrow_mut().push(format!("start:{}", self.name));
            if self.fail_start {
                return Err(crate::ecs::SystemError::Failed {
                    system: self.name.clone(),
                    reason: "refused".to_string(),
                });
            }
            Ok(())
        }

        fn on_update(&mut self, _ctx: &mut SystemContext<'_>, _dt: f32) -> Result<(), crate::ecs::SystemError> {
            self.journal.borrow_mut().push(format!("update:{}", self.name));
            if self.fail_update {
                return Err(crate::ecs::SystemError::Failed {
                    system: self.name.clone(),
                    reason: "broken".to_string(),
                });
            }
            Ok(())
        }

        fn on_stop(&mut self, _ctx: &mut SystemContext<'_>) {
            self.journal.borrow_mut().push(format!("stop:{}", self.name));
        }
    }

    fn frame(scheduler: &mut SystemScheduler, world: &mut World, events: &EventBus) {
        scheduler.process_added_systems(world, events);
        scheduler.process_removed_systems(world, events);
        scheduler.update(world, events, 0.016);
    }

    fn updates(journal: &Journal) -> Vec<String> {
        journal
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with("update:"))
            .cloned()
            .collect()
    }

    #[test]
    fn test_priority_order_lower_first() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        scheduler.add_system(Recorder::boxed("ten", 10, &journal));
        scheduler.add_system(Recorder::boxed("five", 5, &journal));
        scheduler.add_system(Recorder::boxed("minus", -1, &journal));
        frame(&mut scheduler, &mut world, &events);

        assert_eq!(updates(&journal), vec!["update:minus", "update:five", "update:ten"]);
    }

    #[test]
    fn test_ties_break_by_registration_order() {
        let run = || {
            let journal = Journal::default();
            let mut scheduler = SystemScheduler::new();
            let mut world = World::new();
            let events = EventBus::new();
            for name in ["a", "b", "c", "d"] {
                scheduler.add_system(Recorder::boxed(name, 1, &journal));
            }
            frame(&mut scheduler, &mut world, &events);
            updates(&journal)
        };

        let first = run();
        assert_eq!(first, vec!["update:a", "update:b", "update:c", "update:d"]);
        assert_eq!(first, run());
    }

    #[test]
    fn test_added_system_waits_for_processing() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        scheduler.add_system(Recorder::boxed("late", 0, &journal));
        scheduler.update(&mut world, &events, 0.016);

        assert!(journal.borrow().is_empty());
        assert_eq!(scheduler.pending_len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_remove_runs_stop_hook_once() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        let id = scheduler.add_system(Recorder::boxed("gone", 0, &journal));
        frame(&mut scheduler, &mut world, &events);
        scheduler.remove_system(id);
        frame(&mut scheduler, &mut world, &events);

        assert_eq!(*journal.borrow(), vec!["start:gone", "update:gone", "stop:gone"]);
        assert!(!scheduler.is_active(id));
    }

    #[test]
    fn test_remove_unknown_is_ignored() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        let id = scheduler.add_system(Recorder::boxed("kept", 0, &journal));
        frame(&mut scheduler, &mut world, &events);
        scheduler.remove_system(id);
        scheduler.remove_system(id);
        frame(&mut scheduler, &mut world, &events);

        assert_eq!(journal.borrow().iter().filter(|e| e.starts_with("stop:")).count(), 1);
    }

    #[test]
    fn test_failed_start_never_activates() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        scheduler.add_system(Box::new(Recorder {
            name: "fragile".to_string(),
            priority: 0,
            journal: Rc::clone(&journal),
            fail_start: true,
            fail_update: false,
        }));
        frame(&mut scheduler, &mut world, &events);

        assert!(scheduler.is_empty());
        assert_eq!(*journal.borrow(), vec!["start:fragile"]);
    }

    #[test]
    fn test_failing_update_does_not_stop_frame() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        scheduler.add_system(Box::new(Recorder {
            name: "broken".to_string(),
            priority: 0,
            journal: Rc::clone(&journal),
            fail_start: false,
            fail_update: true,
        }));
        scheduler.add_system(Recorder::boxed("healthy", 1, &journal));
        frame(&mut scheduler, &mut world, &events);
        scheduler.update(&mut world, &events, 0.016);

        assert_eq!(
            updates(&journal),
            vec!["update:broken", "update:healthy", "update:broken", "update:healthy"]
        );
    }

    #[test]
    fn test_stop_runs_hooks_clear_does_not() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();

        scheduler.add_system(Recorder::boxed("a", 0, &journal));
        scheduler.add_system(Recorder::boxed("b", 1, &journal));
        frame(&mut scheduler, &mut world, &events);

        scheduler.stop(&mut world, &events);
        assert_eq!(journal.borrow().iter().filter(|e| e.starts_with("stop:")).count(), 2);
        assert_eq!(scheduler.len(), 2);

        journal.borrow_mut().clear();
        scheduler.add_system(Recorder::boxed("pending", 2, &journal));
        scheduler.clear();

        assert!(journal.borrow().is_empty());
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn test_lifecycle_events_are_published() {
        let journal = Journal::default();
        let mut scheduler = SystemScheduler::new();
        let mut world = World::new();
        let events = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        events.subscribe(move |event: &EngineEvent| sink.borrow_mut().push(event.clone()));

        let id = scheduler.add_system(Recorder::boxed("watched", 0, &journal));
        frame(&mut scheduler, &mut world, &events);
        scheduler.remove_system(id);
        frame(&mut scheduler, &mut world, &events);

        assert_eq!(
            *seen.borrow(),
            vec![
                EngineEvent::SystemStarted { name: "watched".to_string() },
                EngineEvent::SystemStopped { name: "watched".to_string() },
            ]
        );
    }
}
