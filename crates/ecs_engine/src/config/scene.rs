//! Scene documents
//!
//! ```json
//! {
//!   "Entities": [
//!     { "Components": [
//!         { "Type": "Transform", "Position": [0.0, 0.0, 0.0] },
//!         { "Type": "Velocity", "Linear": [1.0, 0.0, 0.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Component records stay untyped here; the component registry turns each
//! one into a concrete component through the factory named by `Type`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConfigError;

/// One entity: the list of component records to attach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Tagged component records
    #[serde(rename = "Components", default)]
    pub components: Vec<Value>,
}

/// A scene: the entities to build at engine start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Entity definitions in creation order
    #[serde(rename = "Entities", default)]
    pub entities: Vec<EntityDefinition>,

    /// Directory the scene was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl SceneConfig {
    /// Parse a scene from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a scene file, remembering its directory for path resolution
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut scene = Self::from_json(&std::fs::read_to_string(path)?)?;
        scene.base_dir = path.parent().map(Path::to_path_buf);
        log::info!("Loaded scene {} ({} entities)", path.display(), scene.entities.len());
        Ok(scene)
    }

    /// Directory of the scene file, if it was loaded from disk
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolve a path written in the scene relative to the scene file
    pub fn resolve_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(relative),
            None => relative.as_ref().to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entities() {
        let scene = SceneConfig::from_json(
            r#"{ "Entities": [
                { "Components": [ { "Type": "Transform" }, { "Type": "Camera" } ] },
                { "Components": [] },
                {}
            ] }"#,
        )
        .unwrap();

        assert_eq!(scene.entities.len(), 3);
        assert_eq!(scene.entities[0].components.len(), 2);
        assert!(scene.entities[2].components.is_empty());
    }

    #[test]
    fn test_malformed_scene() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "Entities": 5 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{ "Entities": [] }"#).unwrap();

        let scene = SceneConfig::load(&path).unwrap();
        assert_eq!(scene.base_dir(), Some(dir.path()));
        assert_eq!(scene.resolve_path("models/cube.obj"), dir.path().join("models/cube.obj"));
    }

    #[test]
    fn test_unloaded_scene_keeps_path() {
        let scene = SceneConfig::default();
        assert_eq!(scene.resolve_path("a/b.png"), PathBuf::from("a/b.png"));
    }
}
