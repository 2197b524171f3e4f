//! Best-effort post-build steps: dependency installation and git initialisation
//!
//! Neither step can fail a build. Failures are logged and reported as `false`.

use crate::project::PackageManager;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command as TokioCommand;

const INITIAL_COMMIT_MESSAGE: &str = "Initial commit from better-ts-stack";

/// Run a command to completion in `cwd`, with output shown or discarded
async fn run(
    program: &str,
    args: &[&str],
    cwd: &Path,
    inherit: bool,
) -> std::io::Result<ExitStatus> {
    let stdio = || {
        if inherit {
            Stdio::inherit()
        } else {
            Stdio::null()
        }
    };

    TokioCommand::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(stdio())
        .stderr(stdio())
        .status()
        .await
}

/// Run a quiet command, logging and returning `false` on any failure
async fn run_step(program: &str, args: &[&str], cwd: &Path) -> bool {
    match run(program, args, cwd, false).await {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::warn!(
                command = %format!("{} {}", program, args.join(" ")),
                code = status.code().unwrap_or(-1),
                "command failed"
            );
            false
        }
        Err(e) => {
            tracing::warn!(
                command = %format!("{} {}", program, args.join(" ")),
                error = %e,
                "failed to run command"
            );
            false
        }
    }
}

/// Install dependencies with the chosen package manager, streaming its output.
/// Returns whether installation succeeded.
pub async fn install_dependencies(package_manager: PackageManager, cwd: &Path) -> bool {
    let command = package_manager.install_command();
    tracing::info!(%command, "installing dependencies");

    match run(package_manager.as_str(), &["install"], cwd, true).await {
        Ok(status) if status.success() => {
            tracing::info!("dependencies installed");
            true
        }
        Ok(status) => {
            tracing::warn!(
                code = status.code().unwrap_or(-1),
                "failed to install dependencies; run `{}` manually later",
                command
            );
            false
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "failed to install dependencies; run `{}` manually later",
                command
            );
            false
        }
    }
}

async fn git_available(cwd: &Path) -> bool {
    matches!(
        run("git", &["--version"], cwd, false).await,
        Ok(status) if status.success()
    )
}

/// `git init`, stage everything, and create the initial commit.
/// Returns whether all of it succeeded.
pub async fn initialize_git_repository(cwd: &Path) -> bool {
    if !git_available(cwd).await {
        tracing::warn!("git is not installed or not available in PATH; skipping git initialization");
        return false;
    }

    tracing::info!("initializing git repository");
    if !run_step("git", &["init"], cwd).await {
        tracing::warn!("failed to initialize git repository");
        return false;
    }

    tracing::info!("creating initial commit");
    if !run_step("git", &["add", "."], cwd).await
        || !run_step("git", &["commit", "-m", INITIAL_COMMIT_MESSAGE], cwd).await
    {
        tracing::warn!("failed to create initial commit; you can create it manually later");
        return false;
    }

    true
}
