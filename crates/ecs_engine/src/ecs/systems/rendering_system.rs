//! Drawing through a [`Renderer`]
//!
//! Each frame: clear, place the camera, draw every renderable entity with
//! its transform, present. A failed draw is logged and the frame is still
//! presented. Model instances are created lazily the first frame an entity
//! is seen and released when it loses its `Renderable`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::ecs::components::{Camera, Renderable, Transform};
use crate::ecs::{EntityId, System, SystemContext, SystemError, World};
use crate::render::{ModelInstance, Renderer};

/// Owns the renderer and the per-entity model instances
pub struct RenderingSystem {
    priority: i32,
    renderer: Box<dyn Renderer>,
    asset_root: PathBuf,
    clear_color: [f32; 4],
    instances: HashMap<EntityId, ModelInstance>,
    failed: HashSet<EntityId>,
}

impl RenderingSystem {
    /// Wrap an initialized renderer
    ///
    /// Model and texture names from [`Renderable`] are resolved against
    /// `asset_root`.
    pub fn new(
        priority: i32,
        renderer: Box<dyn Renderer>,
        asset_root: impl Into<PathBuf>,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            priority,
            renderer,
            asset_root: asset_root.into(),
            clear_color,
            instances: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Number of live model instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let path = Path::new(relative);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }

    fn create_instance(&mut self, entity: EntityId, renderable: &Renderable) -> Result<(), SystemError> {
        let model = self.resolve(&renderable.model);
        if !self.renderer.load_model(&model) {
            log::warn!("Entity {entity}: cannot load model {}, not drawing it", model.display());
            self.failed.insert(entity);
            return Ok(());
        }

        let instance = self.renderer.create_model_instance(&model)?;
        if let Some(texture) = &renderable.texture {
            let texture = self.resolve(texture);
            self.renderer.load_texture(&texture);
            self.renderer.set_instance_texture(instance, &texture);
        }

        self.instances.insert(entity, instance);
        Ok(())
    }

    fn sync_instances(&mut self, world: &World) -> Result<(), SystemError> {
        let Some(pool) = world.components().pool::<Renderable>() else {
            self.release_instances();
            return Ok(());
        };

        let stale: Vec<EntityId> = self
            .instances
            .keys()
            .copied()
            .filter(|entity| !pool.contains(*entity))
            .collect();
        for entity in stale {
            if let Some(instance) = self.instances.remove(&entity) {
                self.renderer.destroy_model_instance(instance);
            }
        }
        self.failed.retain(|entity| pool.contains(*entity));

        for (entity, renderable) in pool.iter() {
            if !self.instances.contains_key(&entity) && !self.failed.contains(&entity) {
                self.create_instance(entity, renderable)?;
            }
        }
        Ok(())
    }

    fn release_instances(&mut self) {
        for (_, instance) in self.instances.drain() {
            self.renderer.destroy_model_instance(instance);
        }
        self.failed.clear();
    }

    fn place_camera(&mut self, world: &World) {
        let Some(cameras) = world.components().pool::<Camera>() else {
            return;
        };

        let transform = cameras
            .iter()
            .filter(|(_, camera)| camera.active)
            .find_map(|(entity, _)| world.get_component::<Transform>(entity));
        if let Some(transform) = transform {
            self.renderer.set_camera_properties(transform.position, transform.rotation);
        }
    }
}

impl System for RenderingSystem {
    fn name(&self) -> &str {
        "RenderingSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_start(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        self.sync_instances(ctx.world)?;
        log::info!("Rendering {} entities", self.instances.len());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) -> Result<(), SystemError> {
        self.sync_instances(ctx.world)?;

        self.renderer.clear_background(self.clear_color);
        self.place_camera(ctx.world);

        let default_transform = Transform::default();
        for (&entity, &instance) in &self.instances {
            let transform = ctx.world.get_component::<Transform>(entity).unwrap_or(&default_transform);
            if let Err(e) = self.renderer.draw(instance, transform.position, transform.rotation, transform.scale) {
                log::warn!("Entity {entity}: draw failed: {e}");
            }
        }

        self.renderer.render()?;
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut SystemContext<'_>) {
        self.release_instances();
        self.renderer.clean_up();
    }
}
