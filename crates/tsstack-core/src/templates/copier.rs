//! Module file copying

use super::manifest::MANIFEST_FILE;
use super::registry::Module;
use crate::error::{BuildError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Copy a module's file tree into the target directory, skipping its manifest.
///
/// Existing files are overwritten, so a later module wins over an earlier one
/// for the same relative path. Returns the copied paths relative to `target_dir`.
pub async fn copy_module_files(module_dir: &Path, target_dir: &Path) -> Result<Vec<PathBuf>> {
    let copy_error = |reason: String| BuildError::FileCopy {
        module_dir: module_dir.to_path_buf(),
        reason,
    };

    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| copy_error(format!("failed to create {}: {}", target_dir.display(), e)))?;

    let mut copied_files = Vec::new();

    let walker = WalkDir::new(module_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != MANIFEST_FILE);

    for entry in walker {
        let entry = entry.map_err(|e| copy_error(e.to_string()))?;

        let relative = entry
            .path()
            .strip_prefix(module_dir)
            .map_err(|e| copy_error(e.to_string()))?;
        let target_path = target_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).await.map_err(|e| {
                copy_error(format!("failed to create {}: {}", target_path.display(), e))
            })?;
            continue;
        }

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                copy_error(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        fs::copy(entry.path(), &target_path).await.map_err(|e| {
            copy_error(format!("failed to write {}: {}", target_path.display(), e))
        })?;

        copied_files.push(relative.to_path_buf());
    }

    Ok(copied_files)
}

/// Copy every module in selection order
pub async fn copy_modules(modules: &[Module], target_dir: &Path) -> Result<usize> {
    let mut total = 0;
    for module in modules {
        let copied = copy_module_files(&module.path, target_dir).await?;
        tracing::debug!(module = %module.id, files = copied.len(), "copied module files");
        total += copied.len();
    }
    Ok(total)
}
