//! Post-build instructions

use crate::project::{Framework, Orm, ProjectConfig};
use std::path::Path;

/// How to reach the project from `cwd`: `None` when it is `cwd` itself,
/// the bare project name when it sits directly under `cwd`, else the full path
pub fn project_location(config: &ProjectConfig, dir: &Path, cwd: Option<&Path>) -> Option<String> {
    match cwd {
        Some(cwd) if cwd == dir => None,
        Some(cwd) if cwd.join(&config.project_name) == dir => Some(config.project_name.clone()),
        _ => Some(dir.display().to_string()),
    }
}

/// Generate the "next steps" shown after a successful build.
///
/// `location` comes from [`project_location`]; `None` skips the `cd` step.
pub fn generate_next_steps(
    config: &ProjectConfig,
    location: Option<&str>,
    deps_installed: bool,
) -> Vec<String> {
    let mut steps = Vec::new();
    let pm = config.package_manager;

    if let Some(location) = location {
        steps.push(format!("cd {}", location));
    }

    if config.use_auth {
        match config.effective_framework() {
            Framework::Nextjs => {
                steps.push("Set AUTH_SECRET in .env (required for auth)".to_string());
                steps.push("Sign in via /api/auth/signin".to_string());
            }
            Framework::Express | Framework::Nestjs => {
                steps.push("Set JWT_SECRET in .env (required for auth)".to_string());
                steps.push(
                    "Create a user via POST /auth/register then login with /auth/login".to_string(),
                );
            }
        }
    }

    if !deps_installed {
        steps.push(pm.install_command());
    }

    match config.database() {
        Orm::Prisma => {
            steps.push(format!("{} prisma:generate", pm.run_command()));
            steps.push(format!("{} prisma:migrate", pm.run_command()));
        }
        Orm::Drizzle => {
            steps.push(format!("{} db:generate", pm.run_command()));
            steps.push(format!("{} db:migrate", pm.run_command()));
        }
        Orm::Mongoose => {
            steps.push("Ensure MongoDB is running locally or update MONGODB_URI in .env".to_string());
        }
        Orm::None => {}
    }

    steps.push(format!("{} dev", pm.run_command()));

    steps
}
