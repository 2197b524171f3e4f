//! Build failures
//!
//! Every failure of the build pipeline is one [`BuildError`] variant. Each variant
//! maps to a stable machine-readable [`ErrorCode`] and a process exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit status for any failed build
pub const EXIT_FAILURE: i32 = 1;

/// Stable identifiers for build failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DirectoryNotEmpty,
    DirectoryCreateError,
    ModuleNotFound,
    ModuleConfigError,
    ModuleLoadingError,
    TemplateScriptError,
    TemplateSyntaxError,
    TemplateWriteError,
    TemplateProcessingError,
    FileCopyError,
    PackageJsonError,
    EnvFileError,
    BuildingError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DirectoryNotEmpty => "DIRECTORY_NOT_EMPTY",
            ErrorCode::DirectoryCreateError => "DIRECTORY_CREATE_ERROR",
            ErrorCode::ModuleNotFound => "MODULE_NOT_FOUND",
            ErrorCode::ModuleConfigError => "MODULE_CONFIG_ERROR",
            ErrorCode::ModuleLoadingError => "MODULE_LOADING_ERROR",
            ErrorCode::TemplateScriptError => "TEMPLATE_SCRIPT_ERROR",
            ErrorCode::TemplateSyntaxError => "TEMPLATE_SYNTAX_ERROR",
            ErrorCode::TemplateWriteError => "TEMPLATE_WRITE_ERROR",
            ErrorCode::TemplateProcessingError => "TEMPLATE_PROCESSING_ERROR",
            ErrorCode::FileCopyError => "FILE_COPY_ERROR",
            ErrorCode::PackageJsonError => "PACKAGE_JSON_ERROR",
            ErrorCode::EnvFileError => "ENV_FILE_ERROR",
            ErrorCode::BuildingError => "BUILDING_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{reason}")]
    DirectoryNotEmpty { path: PathBuf, reason: String },

    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Module not found: {id} (looked in {})", path.display())]
    ModuleNotFound { id: String, path: PathBuf },

    #[error("Failed to load module config from {}: {reason}", path.display())]
    ModuleConfig { path: PathBuf, reason: String },

    #[error("Failed to load modules: {0}")]
    ModuleLoading(#[source] Box<BuildError>),

    #[error("Failed to process script \"{script}\" of module '{module}': {reason}")]
    TemplateScript {
        module: String,
        script: String,
        reason: String,
    },

    #[error("Failed to compile template {}: {reason}", file.display())]
    TemplateSyntax { file: PathBuf, reason: String },

    #[error("Failed to process template file {}: {source}", file.display())]
    TemplateWrite {
        file: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to process template files: {0}")]
    TemplateProcessing(#[source] Box<BuildError>),

    #[error("Failed to copy module files from {}: {reason}", module_dir.display())]
    FileCopy { module_dir: PathBuf, reason: String },

    #[error("Failed to generate package.json at {}: {reason}", path.display())]
    PackageJson { path: PathBuf, reason: String },

    #[error("Failed to generate environment files in {}: {source}", dir.display())]
    EnvFile {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Building failed: {0}")]
    Building(String),
}

impl BuildError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BuildError::DirectoryNotEmpty { .. } => ErrorCode::DirectoryNotEmpty,
            BuildError::DirectoryCreate { .. } => ErrorCode::DirectoryCreateError,
            BuildError::ModuleNotFound { .. } => ErrorCode::ModuleNotFound,
            BuildError::ModuleConfig { .. } => ErrorCode::ModuleConfigError,
            BuildError::ModuleLoading(_) => ErrorCode::ModuleLoadingError,
            BuildError::TemplateScript { .. } => ErrorCode::TemplateScriptError,
            BuildError::TemplateSyntax { .. } => ErrorCode::TemplateSyntaxError,
            BuildError::TemplateWrite { .. } => ErrorCode::TemplateWriteError,
            BuildError::TemplateProcessing(_) => ErrorCode::TemplateProcessingError,
            BuildError::FileCopy { .. } => ErrorCode::FileCopyError,
            BuildError::PackageJson { .. } => ErrorCode::PackageJsonError,
            BuildError::EnvFile { .. } => ErrorCode::EnvFileError,
            BuildError::Building(_) => ErrorCode::BuildingError,
        }
    }

    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Innermost error of a wrapping variant (or `self` when not wrapped)
    pub fn root_cause(&self) -> &BuildError {
        match self {
            BuildError::ModuleLoading(inner) | BuildError::TemplateProcessing(inner) => {
                inner.root_cause()
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
