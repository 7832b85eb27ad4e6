//! # ECS Engine
//!
//! A small entity-component-system game engine.
//!
//! ## Features
//!
//! - **Sparse-set storage**: one densely packed pool per component type
//! - **Priority scheduling**: systems update in a fixed order, with
//!   additions and removals deferred to frame boundaries
//! - **Event bus**: synchronous, type-keyed publish/subscribe
//! - **Config-driven scenes**: entities assembled from tagged JSON records
//! - **Pluggable collaborators**: rendering and windowing behind traits,
//!   with headless implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecs_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let window = HeadlessWindow::new("demo", 800, 600).with_frame_limit(60);
//!     let mut engine = Engine::new(config, Box::new(window), Box::new(HeadlessRenderer::new()));
//!     engine.init_from_file("resources/scene.json")?;
//!     engine.run()?;
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod input;
pub mod render;
pub mod window;

mod engine;


pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig, SceneConfig},
        ecs::{
            components::{Camera, Controllable, Orbit, Renderable, Transform, Velocity},
            Component, EntityId, System, SystemContext, SystemError, World,
        },
        events::{EngineEvent, EventBus, NativeKeyStateChanged},
        foundation::math::Vec3,
        input::KeyCode,
        render::{HeadlessRenderer, Renderer},
        window::{HeadlessWindow, Window},
        Engine, EngineError,
    };
}
