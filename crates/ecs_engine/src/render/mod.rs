//! Rendering collaborator interface
//!
//! The ECS core never talks to a graphics API directly. The rendering system
//! drives any [`Renderer`] through load / instance / draw / present calls;
//! asset loads report success as `bool` and only initialization is allowed
//! to fail hard.

pub mod headless;

pub use headless::{DrawCall, FrameLog, FrameStats, HeadlessRenderer};

use std::path::Path;

use thiserror::Error;

use crate::foundation::collections::Handle;
use crate::foundation::math::Vec3;
use crate::window::WindowHandle;

/// Name of the built-in texture used when a requested texture is missing
pub const DEFAULT_TEXTURE: &str = "default.png";

/// Handle to one placement of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelInstance(pub(crate) Handle);

/// Rendering error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// An instance was requested for a model that was never loaded
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    /// The model instance handle is stale or foreign
    #[error("Invalid model instance handle")]
    InvalidHandle,

    /// A frame operation ran before `init` or after `clean_up`
    #[error("Renderer not initialized")]
    NotInitialized,
}

/// Capabilities the engine needs from a graphics backend
pub trait Renderer {
    /// Attach to `window` and create device resources
    fn init(&mut self, window: WindowHandle) -> Result<(), RenderError>;

    /// Start a frame cleared to `color` (RGBA)
    fn clear_background(&mut self, color: [f32; 4]);

    /// Queue `instance` for this frame
    ///
    /// `rotation` is in euler radians.
    fn draw(
        &mut self,
        instance: ModelInstance,
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
    ) -> Result<(), RenderError>;

    /// Set the view for this frame
    fn set_camera_properties(&mut self, position: Vec3, rotation: Vec3);

    /// Present the frame
    fn render(&mut self) -> Result<(), RenderError>;

    /// Load a model file; loading an already loaded model succeeds
    fn load_model(&mut self, path: &Path) -> bool;

    /// Load a texture file; loading an already loaded texture succeeds
    fn load_texture(&mut self, path: &Path) -> bool;

    /// Create a drawable instance of a loaded model
    fn create_model_instance(&mut self, model: &Path) -> Result<ModelInstance, RenderError>;

    /// Bind `texture` to `instance`
    ///
    /// A texture that is not loaded falls back to [`DEFAULT_TEXTURE`];
    /// returns `false` in that case.
    fn set_instance_texture(&mut self, instance: ModelInstance, texture: &Path) -> bool;

    /// Release an instance; returns `false` for an unknown handle
    fn destroy_model_instance(&mut self, instance: ModelInstance) -> bool;

    /// Forget a loaded model
    fn unload_model(&mut self, path: &Path);

    /// Forget a loaded texture
    fn unload_texture(&mut self, path: &Path);

    /// Release every resource; the renderer must be initialized again
    /// before further frame operations
    fn clean_up(&mut self);
}
