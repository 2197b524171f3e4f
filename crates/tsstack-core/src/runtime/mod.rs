//! External tools used after generation
//!
//! This module provides:
//! - Detection of git and the package managers
//! - Dependency installation and git initialisation

pub mod check;
pub mod tool;

pub use check::{check_git, check_package_manager, RuntimeInfo};
pub use tool::{initialize_git_repository, install_dependencies};
