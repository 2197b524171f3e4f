//! Tool detection for git and the package managers

use crate::project::PackageManager;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// Human-readable status, e.g. `pnpm (9.1.0)` or `bun (not installed)`
    pub fn describe(&self) -> String {
        match (&self.version, self.available) {
            (Some(version), true) => format!("{} ({})", self.name, version),
            (None, true) => format!("{} (unknown)", self.name),
            (_, false) => format!("{} (not installed)", self.name),
        }
    }
}

/// Run `<program> --version` and report what was found
fn check_program(program: &'static str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: program,
                version: (!version.is_empty()).then_some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: program,
            version: None,
            available: false,
        },
    }
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    check_program("git")
}

/// Check if the chosen package manager is available
pub fn check_package_manager(package_manager: PackageManager) -> RuntimeInfo {
    check_program(package_manager.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let found = RuntimeInfo {
            name: "pnpm",
            version: Some("9.1.0".to_string()),
            available: true,
        };
        let missing = RuntimeInfo {
            name: "bun",
            version: None,
            available: false,
        };
        assert_eq!(found.describe(), "pnpm (9.1.0)");
        assert_eq!(missing.describe(), "bun (not installed)");
    }

    #[test]
    fn test_check_reports_name() {
        let info = check_package_manager(PackageManager::Npm);
        assert_eq!(info.name, "npm");
        if !info.available {
            assert!(info.version.is_none());
        }
    }
}
