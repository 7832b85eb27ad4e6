//! System trait and the context handed to its lifecycle hooks

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use super::World;
use crate::events::EventBus;
use crate::render::RenderError;

/// Identifier of a registered system
///
/// Assigned in registration order and never reused; it is also the
/// tie-breaker between systems of equal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemId(u64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system#{}", self.0)
    }
}

/// Errors a system hook can report
///
/// They are logged by the scheduler; they never stop the frame loop.
#[derive(Error, Debug)]
pub enum SystemError {
    /// Generic failure
    #[error("{system}: {reason}")]
    Failed {
        /// Name of the failing system
        system: String,
        /// What went wrong
        reason: String,
    },

    /// Renderer failure
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// A unit of per-frame behavior
///
/// Systems are owned by the scheduler once registered. Hooks run in
/// ascending [`System::priority`] order; equal priorities run in
/// registration order.
pub trait System {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Ordering key; lower values update earlier
    fn priority(&self) -> i32;

    /// Called once when the system becomes active
    ///
    /// An error keeps the system from ever becoming active.
    fn on_start(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        Ok(())
    }

    /// Called once per frame with the elapsed time in seconds
    fn on_update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) -> Result<(), SystemError>;

    /// Called when the system is removed or the engine stops
    fn on_stop(&mut self, _ctx: &mut SystemContext<'_>) {}
}

/// What a running hook may touch
pub struct SystemContext<'a> {
    /// Entities and components
    pub world: &'a mut World,
    /// Event bus
    pub events: &'a EventBus,
    /// Deferred system additions and removals
    pub commands: &'a mut SystemCommands,
}

/// Queues of system additions and removals applied between frames
#[derive(Default)]
pub struct SystemCommands {
    next_id: u64,
    pub(super) added: VecDeque<(SystemId, Box<dyn System>)>,
    pub(super) removed: VecDeque<SystemId>,
}

impl SystemCommands {
    /// Queue `system` for activation at the start of the next frame
    pub fn add_system(&mut self, system: Box<dyn System>) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        log::debug!("Queued {} '{}' (priority {})", id, system.name(), system.priority());
        self.added.push_back((id, system));
        id
    }

    /// Queue the system `id` for removal at the start of the next frame
    pub fn remove_system(&mut self, id: SystemId) {
        self.removed.push_back(id);
    }

    /// Number of queued additions and removals
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Drop both queues without running any hook
    pub(super) fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }
}

impl fmt::Debug for SystemCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemCommands")
            .field("added", &self.added.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
