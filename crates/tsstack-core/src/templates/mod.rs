//! Template modules: selection, lookup, rendering and copying
//!
//! This module provides:
//! - Module selection from project choices (tagged `ModuleId`s in merge order)
//! - The module registry and manifest (`config.json`) types
//! - The template context and its helpers
//! - Handlebars rendering of template files and file-tree copying

pub mod context;
pub mod copier;
pub mod manifest;
pub mod registry;
pub mod render;
pub mod selector;

pub use context::{build_template_context, HelperTable, TemplateContext, DEFAULT_PORT};
pub use copier::{copy_module_files, copy_modules};
pub use manifest::{ModuleManifest, ModuleType, StringMap, MANIFEST_FILE};
pub use registry::{Module, ModuleRegistry, TEMPLATE_DIR_ENV};
pub use render::{process_template_files, render, TEMPLATE_EXTENSION};
pub use selector::{select_modules, Feature, ModuleId, ModuleSelection};
