//! Rendering components

use serde::{Deserialize, Serialize};

/// Something to draw: a model file and an optional texture override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Renderable {
    /// Model path, relative to the asset root
    pub model: String,

    /// Texture path, relative to the asset root
    #[serde(default)]
    pub texture: Option<String>,
}

impl Renderable {
    /// Renderable with the model's own materials
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            texture: None,
        }
    }

    /// Builder pattern: Set texture
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }
}

/// Viewpoint; the first active camera's transform drives the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Camera {
    /// Whether this camera may be selected
    pub active: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self { active: true }
    }
}
