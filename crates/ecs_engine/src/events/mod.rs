//! Synchronous publish/subscribe event bus
//!
//! Key properties:
//! - Handlers are keyed by the exact Rust type of the event
//! - `emit` runs every handler immediately, on the calling thread, in
//!   subscription order; nothing is queued and no history is kept
//! - Handlers may emit further events; those are delivered recursively
//!   before the outer emission continues
//! - A handler unsubscribed mid-emission is not invoked afterwards, even
//!   later in the same emission
//! - There is no re-entrancy guard: a handler that emits its own event type
//!   is invoked again immediately, so it must bound its own recursion
//!
//! Handlers are `Fn`; state they mutate lives in `Cell`/`RefCell`.
//!
//! The bus is a cheap cloneable handle over shared single-threaded state, so
//! a handler can capture a clone and publish from inside a callback. Handlers
//! stored on the bus should capture a [`WeakEventBus`] instead, so the bus
//! does not keep itself alive.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::input::KeyCode;

/// Marker trait for event payloads
pub trait Event: 'static {}

impl<T: 'static> Event for T {}

/// A platform key changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeKeyStateChanged {
    /// Key that changed
    pub key_code: KeyCode,
    /// `true` on press, `false` on release
    pub is_pressed: bool,
}

/// Engine-level signals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Ask the frame loop to exit at the top of the next frame
    ExitRequested,
    /// A system finished its start hook and became active
    SystemStarted {
        /// System name
        name: String,
    },
    /// A system ran its stop hook and left the active set
    SystemStopped {
        /// System name
        name: String,
    },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type ErasedHandler = Rc<dyn Fn(&dyn Any)>;

struct Subscription {
    id: SubscriptionId,
    active: Rc<Cell<bool>>,
    handler: ErasedHandler,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    by_type: HashMap<TypeId, Vec<Subscription>>,
    owner_type: HashMap<SubscriptionId, TypeId>,
}

/// Process-wide event bus
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Subscribers>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`
    pub fn subscribe<E: Event>(&self, handler: impl Fn(&E) + 'static) -> SubscriptionId {
        let erased: ErasedHandler = Rc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.owner_type.insert(id, TypeId::of::<E>());
        inner.by_type.entry(TypeId::of::<E>()).or_default().push(Subscription {
            id,
            active: Rc::new(Cell::new(true)),
            handler: erased,
        });
        id
    }

    /// Remove a subscription
    ///
    /// Returns `false` if the id was unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(type_id) = inner.owner_type.remove(&id) else {
            return false;
        };

        let Some(subscriptions) = inner.by_type.get_mut(&type_id) else {
            return false;
        };
        let Some(position) = subscriptions.iter().position(|sub| sub.id == id) else {
            return false;
        };

        let removed = subscriptions.remove(position);
        removed.active.set(false);
        if subscriptions.is_empty() {
            inner.by_type.remove(&type_id);
        }
        true
    }

    /// Deliver `event` to every current subscriber of `E`
    ///
    /// Subscribers added while the emission is running receive the next
    /// event, not this one. Returns the number of handlers invoked.
    pub fn emit<E: Event>(&self, event: &E) -> usize {
        let snapshot: Vec<(Rc<Cell<bool>>, ErasedHandler)> = {
            let inner = self.inner.borrow();
            inner
                .by_type
                .get(&TypeId::of::<E>())
                .map(|subs| {
                    subs.iter()
                        .map(|sub| (Rc::clone(&sub.active), Rc::clone(&sub.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut delivered = 0;
        for (active, handler) in snapshot {
            if !active.get() {
                continue;
            }
            (*handler)(event as &dyn Any);
            delivered += 1;
        }
        delivered
    }

    /// Number of handlers subscribed to `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .borrow()
            .by_type
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Non-owning handle to this bus
    pub fn downgrade(&self) -> WeakEventBus {
        WeakEventBus {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Drop every subscription
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        for subscription in inner.by_type.values().flatten() {
            subscription.active.set(false);
        }
        inner.by_type.clear();
        inner.owner_type.clear();
    }
}

/// Non-owning [`EventBus`] handle for handlers stored on the bus itself
#[derive(Clone, Default)]
pub struct WeakEventBus {
    inner: Weak<RefCell<Subscribers>>,
}

impl WeakEventBus {
    /// The bus, if any strong handle is still alive
    pub fn upgrade(&self) -> Option<EventBus> {
        self.inner.upgrade().map(|inner| EventBus { inner })
    }
}

impl fmt::Debug for WeakEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventBus")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("event_types", &inner.by_type.len())
            .field("subscriptions", &inner.owner_type.len())
            .finish()
    }
}
