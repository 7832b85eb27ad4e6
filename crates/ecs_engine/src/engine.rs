//! Engine controller
//!
//! [`Engine`] is the composition root: it owns the window, the world, the
//! event bus and the scheduler, builds the scene from configuration and runs
//! the frame loop.
//!
//! Each frame:
//! 1. poll the window; stop if it or an [`EngineEvent::ExitRequested`]
//!    asked to exit
//! 2. start systems queued for addition
//! 3. stop systems queued for removal
//! 4. update every active system in priority order
//!
//! The delta handed to step 4 is the measured duration of the previous
//! frame's update.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::config::{ConfigError, EngineConfig, SceneConfig};
use crate::ecs::systems::{InputSystem, OrbitSystem, PhysicsSystem, RenderingSystem, StatsSystem};
use crate::ecs::{System, SystemId, SystemScheduler, World};
use crate::events::{EngineEvent, EventBus, NativeKeyStateChanged};
use crate::foundation::time::Stopwatch;
use crate::input::KeyCode;
use crate::render::{RenderError, Renderer};
use crate::window::Window;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene or settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The renderer failed to initialize
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// `init` was called more than once
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// `run` or `step` was called before `init`
    #[error("Engine not initialized")]
    NotInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Created,
    Running,
    Stopped,
}

/// Main engine struct
pub struct Engine {
    config: EngineConfig,
    window: Box<dyn Window>,
    renderer: Option<Box<dyn Renderer>>,
    world: World,
    events: EventBus,
    scheduler: SystemScheduler,
    exit_requested: Rc<Cell<bool>>,
    state: EngineState,
    frame_count: u64,
}

impl Engine {
    /// Assemble an engine from its collaborators
    ///
    /// Raw key notifications from `window` are re-published on the event
    /// bus as [`NativeKeyStateChanged`].
    pub fn new(config: EngineConfig, mut window: Box<dyn Window>, renderer: Box<dyn Renderer>) -> Self {
        let events = EventBus::new();

        let bus = events.clone();
        window.set_key_callback(Box::new(move |virtual_key, is_pressed| {
            bus.emit(&NativeKeyStateChanged {
                key_code: KeyCode::from_virtual_key(virtual_key),
                is_pressed,
            });
        }));

        let exit_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&exit_requested);
        events.subscribe(move |event: &EngineEvent| {
            if *event == EngineEvent::ExitRequested {
                flag.set(true);
            }
        });

        Self {
            config,
            window,
            renderer: Some(renderer),
            world: World::with_builtin_components(),
            events,
            scheduler: SystemScheduler::new(),
            exit_requested,
            state: EngineState::Created,
            frame_count: 0,
        }
    }

    /// Load the scene at `path` and initialize from it
    pub fn init_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let scene = SceneConfig::load(path)?;
        self.init(&scene)
    }

    /// Initialize the renderer, spawn the scene and register the built-in
    /// systems
    ///
    /// Component records with unknown type tags are logged and skipped.
    /// Only renderer initialization is fatal.
    pub fn init(&mut self, scene: &SceneConfig) -> Result<(), EngineError> {
        if self.state != EngineState::Created {
            return Err(EngineError::AlreadyInitialized);
        }
        let Some(mut renderer) = self.renderer.take() else {
            return Err(EngineError::AlreadyInitialized);
        };

        log::info!("Initializing engine '{}'", self.window.title());
        if let Err(e) = renderer.init(self.window.handle()) {
            log::error!("Renderer initialization failed: {e}");
            self.renderer = Some(renderer);
            return Err(e.into());
        }

        for definition in &scene.entities {
            self.world.spawn_from_definition(definition);
        }
        log::info!("Spawned {} entities", self.world.entities().len());

        let asset_root = self.asset_root(scene);
        let priorities = self.config.priorities;
        self.scheduler.add_system(Box::new(InputSystem::new(priorities.input)));
        self.scheduler.add_system(Box::new(OrbitSystem::new(priorities.orbit)));
        self.scheduler.add_system(Box::new(PhysicsSystem::new(priorities.physics)));
        self.scheduler.add_system(Box::new(RenderingSystem::new(
            priorities.rendering,
            renderer,
            asset_root,
            self.config.clear_color,
        )));
        self.scheduler.add_system(Box::new(StatsSystem::new(
            priorities.stats,
            self.config.stats_interval,
        )));

        self.state = EngineState::Running;
        Ok(())
    }

    /// Run frames until the window or an exit request stops the loop, then
    /// stop every system
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Running {
            return Err(EngineError::NotInitialized);
        }

        log::info!("Entering frame loop");
        let mut delta_time = 0.0;
        loop {
            if self.window.update() || self.exit_requested.get() {
                break;
            }
            delta_time = self.frame(delta_time);
        }
        log::info!("Leaving frame loop after {} frames", self.frame_count);

        self.stop();
        Ok(())
    }

    /// Run a single frame with a fixed `delta_time`, skipping the window
    pub fn step(&mut self, delta_time: f32) -> Result<(), EngineError> {
        if self.state != EngineState::Running {
            return Err(EngineError::NotInitialized);
        }
        self.frame(delta_time);
        Ok(())
    }

    fn frame(&mut self, delta_time: f32) -> f32 {
        self.scheduler.process_added_systems(&mut self.world, &self.events);
        self.scheduler.process_removed_systems(&mut self.world, &self.events);

        let stopwatch = Stopwatch::start_new();
        self.scheduler.update(&mut self.world, &self.events, delta_time);
        self.frame_count += 1;
        stopwatch.elapsed_secs()
    }

    /// Run every active system's stop hook once
    pub fn stop(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        self.scheduler.stop(&mut self.world, &self.events);
        self.state = EngineState::Stopped;
    }

    /// Drop systems, then components, then entities; no hooks run
    pub fn clear(&mut self) {
        self.scheduler.clear();
        self.world.clear();
    }

    /// Stop and clear
    pub fn shutdown(&mut self) {
        self.stop();
        self.clear();
        log::info!("Engine shut down");
    }

    /// Queue an application system; it starts on the next frame
    pub fn add_system(&mut self, system: Box<dyn System>) -> SystemId {
        self.scheduler.add_system(system)
    }

    /// Queue a system for removal on the next frame
    pub fn remove_system(&mut self, id: SystemId) {
        self.scheduler.remove_system(id);
    }

    /// Ask the loop to exit at the top of the next frame
    pub fn request_exit(&self) {
        self.events.emit(&EngineEvent::ExitRequested);
    }

    /// Whether an exit was requested through the event bus
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.get()
    }

    /// Whether `init` succeeded and the engine has not stopped
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Frames executed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Engine settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Entities and components
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to entities and components
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// System scheduler
    pub fn scheduler(&self) -> &SystemScheduler {
        &self.scheduler
    }

    fn asset_root(&self, scene: &SceneConfig) -> PathBuf {
        self.config
            .asset_root
            .clone()
            .or_else(|| scene.base_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("frame_count", &self.frame_count)
            .field("world", &self.world)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
