//! Scene demo application
//!
//! Loads `resources/engine.toml` and a JSON scene, then runs the engine
//! headless until the configured frame limit.
//!
//! Usage: `scene_app [scene.json]`

use std::path::PathBuf;

use ecs_engine::config::{Config, ConfigError, EngineConfig};
use ecs_engine::foundation::logging;
use ecs_engine::render::HeadlessRenderer;
use ecs_engine::window::HeadlessWindow;
use ecs_engine::{Engine, EngineError};
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error("settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("engine: {0}")]
    Engine(#[from] EngineError),
}

fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn main() -> Result<(), AppError> {
    logging::init();

    let resources = resources_dir();
    let settings_path = resources.join("engine.toml");
    let config = if settings_path.is_file() {
        EngineConfig::load_from_file(&settings_path)?
    } else {
        log::warn!("No settings at {}, using defaults", settings_path.display());
        EngineConfig::default()
    };

    let scene_path = std::env::args()
        .nth(1)
        .map_or_else(|| resources.join("scene.json"), PathBuf::from);

    let mut window = HeadlessWindow::new(config.window_title.clone(), 1280, 720);
    if let Some(limit) = config.frame_limit {
        window = window.with_frame_limit(limit);
    }
    let renderer = HeadlessRenderer::new();
    let frames = renderer.frame_log();

    let mut engine = Engine::new(config, Box::new(window), Box::new(renderer));
    engine.init_from_file(&scene_path)?;
    engine.run()?;
    engine.shutdown();

    let stats = frames.stats();
    log::info!(
        "Presented {} frames, {} draw calls",
        stats.frames_presented,
        stats.total_draw_calls
    );
    Ok(())
}
