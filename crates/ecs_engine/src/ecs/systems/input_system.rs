//! Keyboard steering
//!
//! Tracks key state from [`NativeKeyStateChanged`] events and turns it into
//! the linear velocity of every [`Controllable`] entity. Escape requests
//! engine exit.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::ecs::components::{Controllable, Velocity};
use crate::ecs::{EntityId, System, SystemContext, SystemError};
use crate::events::{EngineEvent, NativeKeyStateChanged, SubscriptionId};
use crate::foundation::math::Vec3;
use crate::input::KeyCode;

/// Keyboard-driven movement
pub struct InputSystem {
    priority: i32,
    pressed: Rc<RefCell<HashSet<KeyCode>>>,
    subscription: Option<SubscriptionId>,
}

impl InputSystem {
    /// Create an input system with the given priority
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            pressed: Rc::default(),
            subscription: None,
        }
    }

    /// Whether `key` is currently held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.borrow().contains(&key)
    }

    fn direction(pressed: &HashSet<KeyCode>) -> Vec3 {
        let axis = |positive: &[KeyCode], negative: &[KeyCode]| {
            let pos = positive.iter().any(|key| pressed.contains(key));
            let neg = negative.iter().any(|key| pressed.contains(key));
            f32::from(u8::from(pos)) - f32::from(u8::from(neg))
        };

        Vec3::new(
            axis(&[KeyCode::D, KeyCode::Right], &[KeyCode::A, KeyCode::Left]),
            axis(&[KeyCode::E], &[KeyCode::Q]),
            axis(&[KeyCode::W, KeyCode::Up], &[KeyCode::S, KeyCode::Down]),
        )
    }
}

impl System for InputSystem {
    fn name(&self) -> &str {
        "InputSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_start(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let pressed = Rc::clone(&self.pressed);
        let bus = ctx.events.downgrade();
        let id = ctx.events.subscribe(move |event: &NativeKeyStateChanged| {
            if event.is_pressed {
                pressed.borrow_mut().insert(event.key_code);
            } else {
                pressed.borrow_mut().remove(&event.key_code);
            }

            if event.key_code == KeyCode::Escape && event.is_pressed {
                log::info!("Escape pressed, requesting exit");
                if let Some(bus) = bus.upgrade() {
                    bus.emit(&EngineEvent::ExitRequested);
                }
            }
        });
        self.subscription = Some(id);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) -> Result<(), SystemError> {
        let direction = Self::direction(&self.pressed.borrow());
        let direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);

        let controlled: Vec<(EntityId, f32)> = ctx
            .world
            .components()
            .pool::<Controllable>()
            .map(|pool| pool.iter().map(|(entity, c)| (entity, c.speed)).collect())
            .unwrap_or_default();

        for (entity, speed) in controlled {
            if let Some(velocity) = ctx.world.get_component_mut::<Velocity>(entity) {
                velocity.linear = direction * speed;
            }
        }
        Ok(())
    }

    fn on_stop(&mut self, ctx: &mut SystemContext<'_>) {
        if let Some(id) = self.subscription.take() {
            ctx.events.unsubscribe(id);
        }
        self.pressed.borrow_mut().clear();
    }
}
