//! Merged configuration and the project files generated from it

pub mod generator;
pub mod merge;

pub use generator::{generate_env_file, generate_package_json};
pub use merge::{merge_configurations, process_script_variables, MergedConfig};
