//! Module manifest types and parsing

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Name of the per-module control file. Never copied into generated projects.
pub const MANIFEST_FILE: &str = "config.json";

/// Ordered string map. Key order is preserved from the manifest so generated
/// files list entries in the order modules declare them.
pub type StringMap = IndexMap<String, String>;

/// Module classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Base,
    Database,
    Feature,
}

/// Per-module manifest (`<module>/config.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    /// Module identifier, also used to name the module in logs and errors
    pub id: String,

    /// Display name of the module
    pub name: String,

    /// Description of what the module provides
    pub description: String,

    #[serde(rename = "type")]
    pub module_type: ModuleType,

    #[serde(default)]
    pub dependencies: StringMap,

    #[serde(default)]
    pub dev_dependencies: StringMap,

    /// Script commands; may contain template expressions
    #[serde(default)]
    pub scripts: StringMap,

    /// Environment variables with their default values
    #[serde(default)]
    pub env_vars: StringMap,

    /// Files (relative to the generated project) to render after copying
    #[serde(default)]
    pub template_files: Vec<String>,
}

impl ModuleManifest {
    /// Parse and validate manifest JSON
    pub fn from_json(content: &str) -> Result<Self, String> {
        let manifest: ModuleManifest =
            serde_json::from_str(content).map_err(|e| e.to_string())?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Checks serde cannot express: a non-empty id and template paths that
    /// stay inside the generated project
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("field `id` must not be empty".to_string());
        }

        for file in &self.template_files {
            if !is_contained_relative_path(file) {
                return Err(format!(
                    "template file '{}' must be a relative path inside the project",
                    file
                ));
            }
        }

        Ok(())
    }
}

fn is_contained_relative_path(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
