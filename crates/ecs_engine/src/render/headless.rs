//! Renderer that draws nothing
//!
//! Asset loads are checked against the filesystem so missing files behave
//! the same way they would with a GPU backend. Every draw and presented
//! frame is recorded in a [`FrameLog`].

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{ModelInstance, RenderError, Renderer, DEFAULT_TEXTURE};
use crate::foundation::collections::HandleMap;
use crate::foundation::math::Vec3;
use crate::window::WindowHandle;

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Model file of the instance
    pub model: PathBuf,
    /// Texture bound to the instance
    pub texture: PathBuf,
    /// World position
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Scale
    pub scale: Vec3,
}

/// Counters and the draws of the last presented frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Frames presented since creation
    pub frames_presented: u64,
    /// Draws recorded since creation
    pub total_draw_calls: u64,
    /// Draws of the most recent presented frame
    pub last_frame: Vec<DrawCall>,
    /// Clear color of the most recent frame
    pub clear_color: [f32; 4],
    /// Camera position and rotation of the most recent frame
    pub camera: (Vec3, Vec3),
}

/// Shared read handle to a [`HeadlessRenderer`]'s statistics
///
/// Stays valid after the renderer is moved into the rendering system.
#[derive(Debug, Clone, Default)]
pub struct FrameLog(Rc<RefCell<FrameStats>>);

impl FrameLog {
    /// Borrow the current statistics
    pub fn stats(&self) -> Ref<'_, FrameStats> {
        self.0.borrow()
    }

    /// Frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.0.borrow().frames_presented
    }
}

#[derive(Debug)]
struct InstanceRecord {
    model: PathBuf,
    texture: PathBuf,
}

/// Headless [`Renderer`] backend
#[derive(Debug)]
pub struct HeadlessRenderer {
    window: Option<WindowHandle>,
    init_failure: Option<String>,
    models: HashSet<PathBuf>,
    textures: HashSet<PathBuf>,
    instances: HandleMap<InstanceRecord>,
    pending_draws: Vec<DrawCall>,
    log: FrameLog,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    /// Create a renderer whose `init` succeeds
    pub fn new() -> Self {
        Self {
            window: None,
            init_failure: None,
            models: HashSet::new(),
            textures: HashSet::new(),
            instances: HandleMap::new(),
            pending_draws: Vec::new(),
            log: FrameLog::default(),
        }
    }

    /// Make `init` fail with `reason`, as a missing GPU device would
    pub fn with_init_failure(mut self, reason: impl Into<String>) -> Self {
        self.init_failure = Some(reason.into());
        self
    }

    /// Statistics handle
    pub fn frame_log(&self) -> FrameLog {
        self.log.clone()
    }

    /// Whether `init` succeeded and `clean_up` has not run since
    pub fn is_initialized(&self) -> bool {
        self.window.is_some()
    }

    /// Whether `path` is a loaded model
    pub fn has_model(&self, path: &Path) -> bool {
        self.models.contains(path)
    }

    /// Whether `path` is a loaded texture
    pub fn has_texture(&self, path: &Path) -> bool {
        self.textures.contains(path)
    }

    /// Number of live model instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn default_texture() -> PathBuf {
        PathBuf::from(DEFAULT_TEXTURE)
    }

    fn ensure_initialized(&self) -> Result<(), RenderError> {
        if self.window.is_none() {
            return Err(RenderError::NotInitialized);
        }
        Ok(())
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self, window: WindowHandle) -> Result<(), RenderError> {
        if let Some(reason) = &self.init_failure {
            return Err(RenderError::InitializationFailed(reason.clone()));
        }

        self.textures.insert(Self::default_texture());
        self.window = Some(window);
        log::info!("Headless renderer attached to {}x{} window", window.width, window.height);
        Ok(())
    }

    fn clear_background(&mut self, color: [f32; 4]) {
        self.pending_draws.clear();
        self.log.0.borrow_mut().clear_color = color;
    }

    fn draw(
        &mut self,
        instance: ModelInstance,
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
    ) -> Result<(), RenderError> {
        self.ensure_initialized()?;
        let record = self.instances.get(instance.0).ok_or(RenderError::InvalidHandle)?;

        self.pending_draws.push(DrawCall {
            model: record.model.clone(),
            texture: record.texture.clone(),
            position,
            rotation,
            scale,
        });
        Ok(())
    }

    fn set_camera_properties(&mut self, position: Vec3, rotation: Vec3) {
        self.log.0.borrow_mut().camera = (position, rotation);
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.ensure_initialized()?;

        let mut stats = self.log.0.borrow_mut();
        stats.frames_presented += 1;
        stats.total_draw_calls += self.pending_draws.len() as u64;
        stats.last_frame = std::mem::take(&mut self.pending_draws);
        Ok(())
    }

    fn load_model(&mut self, path: &Path) -> bool {
        if self.models.contains(path) {
            return true;
        }
        if !path.is_file() {
            log::warn!("Model file not found: {}", path.display());
            return false;
        }

        log::debug!("Loaded model {}", path.display());
        self.models.insert(path.to_path_buf());
        true
    }

    fn load_texture(&mut self, path: &Path) -> bool {
        if self.textures.contains(path) {
            return true;
        }
        if !path.is_file() {
            log::warn!("Texture file not found: {}", path.display());
            return false;
        }

        log::debug!("Loaded texture {}", path.display());
        self.textures.insert(path.to_path_buf());
        true
    }

    fn create_model_instance(&mut self, model: &Path) -> Result<ModelInstance, RenderError> {
        if !self.models.contains(model) {
            return Err(RenderError::ModelNotLoaded(model.display().to_string()));
        }

        let handle = self.instances.insert(InstanceRecord {
            model: model.to_path_buf(),
            texture: Self::default_texture(),
        });
        Ok(ModelInstance(handle))
    }

    fn set_instance_texture(&mut self, instance: ModelInstance, texture: &Path) -> bool {
        let loaded = self.textures.contains(texture);
        let Some(record) = self.instances.get_mut(instance.0) else {
            return false;
        };

        if loaded {
            record.texture = texture.to_path_buf();
        } else {
            log::warn!("Texture {} not loaded, using {DEFAULT_TEXTURE}", texture.display());
            record.texture = Self::default_texture();
        }
        loaded
    }

    fn destroy_model_instance(&mut self, instance: ModelInstance) -> bool {
        self.instances.remove(instance.0).is_some()
    }

    fn unload_model(&mut self, path: &Path) {
        self.models.remove(path);
    }

    fn unload_texture(&mut self, path: &Path) {
        if path == Path::new(DEFAULT_TEXTURE) {
            return;
        }
        self.textures.remove(path);
    }

    fn clean_up(&mut self) {
        self.instances.clear();
        self.models.clear();
        self.textures.clear();
        self.pending_draws.clear();
        self.window = None;
        log::info!("Headless renderer cleaned up");
    }
}
