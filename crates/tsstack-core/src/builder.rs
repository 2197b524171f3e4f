//! Build orchestration: one guarded pass from project choices to a project on disk

use crate::config::{generate_env_file, generate_package_json, merge_configurations};
use crate::error::{BuildError, Result};
use crate::output::{generate_next_steps, project_location};
use crate::project::ProjectConfig;
use crate::runtime::{initialize_git_repository, install_dependencies};
use crate::templates::{
    build_template_context, copy_modules, process_template_files, select_modules,
    ModuleRegistry,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub success: bool,
    /// Absolute path of the created project
    pub project_path: PathBuf,
    /// Ids of the modules composed into the project, in merge order
    pub modules: Vec<String>,
    pub next_steps: Vec<String>,
}

/// State of the target directory before the build touched it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetState {
    Absent,
    Empty,
}

/// Composes projects from the modules of a registry
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    registry: ModuleRegistry,
    cleanup_on_failure: bool,
}

impl ProjectBuilder {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            registry,
            cleanup_on_failure: true,
        }
    }

    /// Remove what a failed build wrote (enabled by default)
    pub fn cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Build a project into `target_dir`, which must be absent or empty.
    ///
    /// Stages run strictly in sequence and the first failure ends the build.
    /// Installing dependencies and initialising git are best-effort and never fail it.
    pub async fn build(&self, config: &ProjectConfig, target_dir: &Path) -> Result<BuildResult> {
        info!("starting project build");

        config
            .validate()
            .map_err(|e| BuildError::Building(format!("invalid project configuration: {}", e)))?;

        let target = std::path::absolute(target_dir).map_err(|e| {
            BuildError::Building(format!(
                "cannot resolve target directory {}: {}",
                target_dir.display(),
                e
            ))
        })?;

        info!(path = %target.display(), "validating target directory");
        let state = validate_directory_empty(&target).await?;

        info!("creating project directory");
        fs::create_dir_all(&target)
            .await
            .map_err(|source| BuildError::DirectoryCreate {
                path: target.clone(),
                source,
            })?;

        match self.run_stages(config, &target).await {
            Ok(result) => {
                info!("project build completed");
                Ok(result)
            }
            Err(err) => {
                if self.cleanup_on_failure {
                    cleanup(&target, state).await;
                }
                Err(err)
            }
        }
    }

    async fn run_stages(&self, config: &ProjectConfig, target: &Path) -> Result<BuildResult> {
        info!("selecting modules");
        let selection = select_modules(config);

        info!("loading module configurations");
        let modules = self
            .registry
            .load_selection(&selection)
            .await
            .map_err(|e| BuildError::ModuleLoading(Box::new(e)))?;
        let module_ids: Vec<String> = modules.iter().map(|m| m.manifest.id.clone()).collect();
        info!(
            count = modules.len(),
            modules = %module_ids.join(", "),
            "selected modules"
        );

        info!("building template context");
        let context = build_template_context(config);

        info!("merging module configurations");
        let merged = merge_configurations(modules.iter().map(|m| &m.manifest), &context)?;
        debug!(
            dependencies = merged.dependencies.len(),
            dev_dependencies = merged.dev_dependencies.len(),
            scripts = merged.scripts.len(),
            env_vars = merged.env_vars.len(),
            "merged configuration"
        );

        info!("copying module files");
        let copied = copy_modules(&modules, target).await?;
        debug!(files = copied, "module files copied");

        info!("processing template files");
        let template_files: Vec<String> = modules
            .iter()
            .flat_map(|m| m.manifest.template_files.iter().cloned())
            .collect();
        if template_files.is_empty() {
            debug!("no template files to process");
        } else {
            let rendered = process_template_files(target, &context, &template_files)
                .await
                .map_err(|e| BuildError::TemplateProcessing(Box::new(e)))?;
            debug!(
                declared = template_files.len(),
                rendered, "template files processed"
            );
        }

        info!("generating package.json");
        generate_package_json(target, &merged, config).await?;

        info!("generating environment files");
        generate_env_file(target, &merged.env_vars).await?;

        let deps_installed = if config.install_deps {
            let installed = install_dependencies(config.package_manager, target).await;
            if !installed {
                warn!("continuing despite dependency installation issues");
            }
            installed
        } else {
            false
        };

        if config.init_git && !initialize_git_repository(target).await {
            warn!("continuing despite git initialization issues");
        }

        let cwd = std::env::current_dir().ok();
        let location = project_location(config, target, cwd.as_deref());

        Ok(BuildResult {
            success: true,
            project_path: target.to_path_buf(),
            modules: module_ids,
            next_steps: generate_next_steps(config, location.as_deref(), deps_installed),
        })
    }
}

/// The target must not exist, or be an empty directory
async fn validate_directory_empty(dir: &Path) -> Result<TargetState> {
    let not_empty = |reason: String| BuildError::DirectoryNotEmpty {
        path: dir.to_path_buf(),
        reason,
    };

    let metadata = match fs::metadata(dir).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TargetState::Absent),
        Err(e) => return Err(not_empty(format!("Error checking directory: {}", e))),
    };

    if !metadata.is_dir() {
        return Err(not_empty(format!(
            "Path \"{}\" exists but is not a directory",
            dir.display()
        )));
    }

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| not_empty(format!("Error checking directory: {}", e)))?;
    let has_entries = entries
        .next_entry()
        .await
        .map_err(|e| not_empty(format!("Error checking directory: {}", e)))?
        .is_some();

    if has_entries {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        return Err(not_empty(format!(
            "Directory \"{}\" already exists and is not empty",
            name
        )));
    }

    Ok(TargetState::Empty)
}

/// Undo a failed build: remove the directory it created, or empty the one it was given
async fn cleanup(target: &Path, state: TargetState) {
    let result = match state {
        TargetState::Absent => fs::remove_dir_all(target).await,
        TargetState::Empty => clear_directory(target).await,
    };

    match result {
        Ok(()) => info!(path = %target.display(), "removed partially generated project"),
        Err(e) => warn!(
            path = %target.display(),
            error = %e,
            "failed to clean up partially generated project"
        ),
    }
}

async fn clear_directory(dir: &Path) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            fs::remove_dir_all(&path).await?;
        } else {
            fs::remove_file(&path).await?;
        }
    }
    Ok(())
}
