//! Module registry: resolves module ids to directories and loads their manifests

use super::manifest::{ModuleManifest, ModuleType, MANIFEST_FILE};
use super::selector::{ModuleId, ModuleSelection};
use crate::error::{BuildError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable overriding the template root
pub const TEMPLATE_DIR_ENV: &str = "BETTER_TS_STACK_TEMPLATE_DIR";

/// Subdirectory of the template root holding non-base modules
const MODULES_DIR: &str = "modules";

/// A loaded manifest together with the module's source directory
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub manifest: ModuleManifest,
    pub path: PathBuf,
}

/// Template module registry rooted at a templates directory.
///
/// Layout:
/// - `<root>/<backend|frontend>/<framework>` for base templates
/// - `<root>/modules/<name>[/<framework>]` for database and feature modules
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    root: PathBuf,
}

impl ModuleRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a registry from an explicit directory, falling back to the
    /// environment and then to the bundled templates
    pub fn from_env(template_dir: Option<PathBuf>) -> Self {
        Self::new(resolve_template_root(template_dir))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute directory for a module id
    pub fn resolve_path(&self, id: &ModuleId) -> PathBuf {
        match id.module_type() {
            ModuleType::Base => self.root.join(id.relative_path()),
            ModuleType::Database | ModuleType::Feature => {
                self.root.join(MODULES_DIR).join(id.relative_path())
            }
        }
    }

    /// Look up a module and load its manifest
    pub async fn get_module(&self, id: &ModuleId) -> Result<Module> {
        let path = self.resolve_path(id);

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(BuildError::ModuleNotFound {
                id: id.to_string(),
                path,
            });
        }

        let manifest = load_manifest(&path).await?;
        if manifest.module_type != id.module_type() {
            tracing::warn!(
                module = %id,
                declared = ?manifest.module_type,
                "manifest type differs from the selected module kind"
            );
        }

        Ok(Module {
            id: id.clone(),
            manifest,
            path,
        })
    }

    /// Load every selected module, base first
    pub async fn load_selection(&self, selection: &ModuleSelection) -> Result<Vec<Module>> {
        let mut modules = Vec::with_capacity(selection.len());
        for id in selection.iter() {
            tracing::debug!(module = %id, "loading module");
            modules.push(self.get_module(id).await?);
        }
        Ok(modules)
    }
}

/// Read and validate `<module_dir>/config.json`
pub async fn load_manifest(module_dir: &Path) -> Result<ModuleManifest> {
    let config_path = module_dir.join(MANIFEST_FILE);

    let content = fs::read_to_string(&config_path)
        .await
        .map_err(|e| BuildError::ModuleConfig {
            path: config_path.clone(),
            reason: e.to_string(),
        })?;

    ModuleManifest::from_json(&content).map_err(|reason| BuildError::ModuleConfig {
        path: config_path,
        reason,
    })
}

/// Template root, first match wins: explicit directory, `BETTER_TS_STACK_TEMPLATE_DIR`,
/// `templates/` next to the executable, the workspace `templates/` directory
pub fn resolve_template_root(template_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = template_dir {
        return dir;
    }

    if let Some(dir) = std::env::var_os(TEMPLATE_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
        .filter(|dir| dir.is_dir())
    {
        return dir;
    }

    bundled_template_root()
}

/// `templates/` at the workspace root this crate was built from
pub fn bundled_template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("templates")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ApplicationType, Framework, Orm};
    use crate::templates::selector::Feature;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(MANIFEST_FILE), body).unwrap();
    }

    #[test]
    fn test_resolve_paths_by_kind() {
        let registry = ModuleRegistry::new("/t");

        let base = ModuleId::Base {
            application: ApplicationType::Backend,
            framework: Framework::Express,
        };
        let prisma = ModuleId::Database {
            orm: Orm::Prisma,
            framework: Some(Framework::Express),
        };
        let docker = ModuleId::Feature {
            feature: Feature::Docker,
            framework: None,
        };

        assert_eq!(
            registry.resolve_path(&base),
            PathBuf::from("/t/backend/express")
        );
        assert_eq!(
            registry.resolve_path(&prisma),
            PathBuf::from("/t/modules/prisma/express")
        );
        assert_eq!(
            registry.resolve_path(&docker),
            PathBuf::from("/t/modules/docker")
        );
    }

    #[tokio::test]
    async fn test_missing_module_directory() {
        let temp = TempDir::new().unwrap();
        let registry = ModuleRegistry::new(temp.path());
        let id = ModuleId::Feature {
            feature: Feature::Docker,
            framework: None,
        };

        let err = registry.get_module(&id).await.unwrap_err();
        assert!(matches!(err, BuildError::ModuleNotFound { ref id, .. } if id == "docker"));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_config_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("modules/docker")).unwrap();
        let registry = ModuleRegistry::new(temp.path());
        let id = ModuleId::Feature {
            feature: Feature::Docker,
            framework: None,
        };

        let err = registry.get_module(&id).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ModuleConfigError);
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_manifest(&temp.path().join("modules/docker"), "{ not json");
        let registry = ModuleRegistry::new(temp.path());
        let id = ModuleId::Feature {
            feature: Feature::Docker,
            framework: None,
        };

        let err = registry.get_module(&id).await.unwrap_err();
        assert!(matches!(err, BuildError::ModuleConfig { .. }));
    }

    #[tokio::test]
    async fn test_loads_module() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            &temp.path().join("backend/express"),
            r#"{"id": "backend/express", "name": "Express", "description": "Base", "type": "base",
                "dependencies": {"express": "^4.21.2"}}"#,
        );
        let registry = ModuleRegistry::new(temp.path());
        let id = ModuleId::Base {
            application: ApplicationType::Backend,
            framework: Framework::Express,
        };

        let module = registry.get_module(&id).await.unwrap();
        assert_eq!(module.manifest.id, "backend/express");
        assert_eq!(module.path, temp.path().join("backend/express"));
        assert_eq!(module.manifest.dependencies["express"], "^4.21.2");
    }

    #[test]
    fn test_explicit_template_dir_wins() {
        let root = resolve_template_root(Some(PathBuf::from("/custom/templates")));
        assert_eq!(root, PathBuf::from("/custom/templates"));
    }
}
