//! Engine settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub window_title: String,

    /// Background color the renderer clears to each frame (RGBA)
    pub clear_color: [f32; 4],

    /// Directory model and texture paths are resolved against. When unset
    /// the directory of the loaded scene file is used.
    pub asset_root: Option<PathBuf>,

    /// Stop after this many frames (headless runs)
    pub frame_limit: Option<u64>,

    /// Seconds between frame statistics reports
    pub stats_interval: f32,

    /// Priorities of the built-in systems
    pub priorities: SystemPriorities,
}

/// Priorities of the built-in systems; lower runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPriorities {
    /// Keyboard handling
    pub input: i32,
    /// Circular motion
    pub orbit: i32,
    /// Velocity integration
    pub physics: i32,
    /// Drawing
    pub rendering: i32,
    /// Frame statistics
    pub stats: i32,
}

impl Default for SystemPriorities {
    fn default() -> Self {
        Self {
            input: 0,
            orbit: 5,
            physics: 10,
            rendering: 100,
            stats: 200,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "ECS Engine".to_string(),
            clear_color: [0.1, 0.1, 0.15, 1.0],
            asset_root: None,
            frame_limit: None,
            stats_interval: 1.0,
            priorities: SystemPriorities::default(),
        }
    }
}

impl Config for EngineConfig {}
