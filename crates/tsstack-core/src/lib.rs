//! tsstack-core - composing TypeScript projects from template modules
//!
//! A project is assembled from an ordered list of modules: one base template
//! (e.g. `backend/express`) followed by an optional database integration and
//! optional features (Docker, auth). Each module is a directory holding a file
//! tree and a `config.json` manifest declaring its dependencies, scripts,
//! environment variables and which files to render.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - module selection, registry lookup, manifest
//!   merging, file copying and Handlebars rendering
//! - **Layer 2: Workflow Orchestration** - `ProjectBuilder`, which sequences every
//!   stage into one guarded build
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use tsstack_core::{ModuleRegistry, ProjectBuilder};
//!
//! let builder = ProjectBuilder::new(ModuleRegistry::from_env(None));
//! let result = builder.build(&config, Path::new("my-api")).await?;
//! for step in &result.next_steps {
//!     println!("{step}");
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod output;
pub mod project;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use builder::{BuildResult, ProjectBuilder};
pub use config::MergedConfig;
pub use error::{BuildError, ErrorCode};
pub use project::{
    ApplicationType, ConfigError, DatabaseType, Framework, Orm, PackageManager, ProjectConfig,
};
pub use templates::{
    select_modules, ModuleId, ModuleManifest, ModuleRegistry, ModuleSelection, TemplateContext,
};

#[cfg(feature = "tui")]
pub use tui::run;
