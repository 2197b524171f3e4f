//! Generated project files: package.json and environment files

use super::merge::MergedConfig;
use crate::error::{BuildError, Result};
use crate::project::{Orm, ProjectConfig};
use crate::templates::manifest::StringMap;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

const PACKAGE_VERSION: &str = "1.0.0";
const PACKAGE_MAIN: &str = "dist/index.js";
const PACKAGE_LICENSE: &str = "MIT";
const PACKAGE_KEYWORDS: &[&str] = &["backend", "typescript", "express"];

const ENV_HEADER: &str = "# Environment Variables\n\
                          # Copy this file to .env and update with your actual values\n\n";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson<'a> {
    name: &'a str,
    version: &'a str,
    description: String,
    main: &'a str,
    scripts: &'a StringMap,
    keywords: &'a [&'a str],
    author: &'a str,
    license: &'a str,
    dependencies: &'a StringMap,
    dev_dependencies: &'a StringMap,
}

fn package_description(config: &ProjectConfig) -> String {
    let database = match config.database() {
        Orm::None => "no database".to_string(),
        orm => orm.to_string(),
    };
    format!("Project created with better-ts-stack using {}", database)
}

/// Render the package.json body (pretty-printed, trailing newline)
pub fn package_json_content(merged: &MergedConfig, config: &ProjectConfig) -> Result<String> {
    let package = PackageJson {
        name: &config.project_name,
        version: PACKAGE_VERSION,
        description: package_description(config),
        main: PACKAGE_MAIN,
        scripts: &merged.scripts,
        keywords: PACKAGE_KEYWORDS,
        author: "",
        license: PACKAGE_LICENSE,
        dependencies: &merged.dependencies,
        dev_dependencies: &merged.dev_dependencies,
    };

    let mut json = serde_json::to_string_pretty(&package).map_err(|e| BuildError::PackageJson {
        path: Path::new("package.json").to_path_buf(),
        reason: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

/// Write `<target_dir>/package.json`
pub async fn generate_package_json(
    target_dir: &Path,
    merged: &MergedConfig,
    config: &ProjectConfig,
) -> Result<()> {
    let path = target_dir.join("package.json");
    let content = package_json_content(merged, config)?;

    fs::write(&path, content)
        .await
        .map_err(|e| BuildError::PackageJson {
            path,
            reason: e.to_string(),
        })
}

/// Render the `.env.example` body: header comments then one `KEY=value` per line
pub fn env_file_content(env_vars: &StringMap) -> String {
    let mut content = String::from(ENV_HEADER);
    for (key, value) in env_vars {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    content
}

/// Write `.env.example`, then copy it verbatim to `.env` so the project runs as generated
pub async fn generate_env_file(target_dir: &Path, env_vars: &StringMap) -> Result<()> {
    let env_error = |source| BuildError::EnvFile {
        dir: target_dir.to_path_buf(),
        source,
    };

    let example_path = target_dir.join(".env.example");
    fs::write(&example_path, env_file_content(env_vars))
        .await
        .map_err(env_error)?;

    fs::copy(&example_path, target_dir.join(".env"))
        .await
        .map_err(env_error)?;

    Ok(())
}
