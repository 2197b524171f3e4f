//! Charm-style CLI prompts using cliclack

use crate::builder::{BuildResult, ProjectBuilder};
use crate::project::{
    validate_project_name, ApplicationType, DatabaseType, Framework, Orm, PackageManager,
    ProjectConfig,
};
use crate::runtime::{check_git, check_package_manager};
use crate::templates::{ModuleRegistry, DEFAULT_PORT};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

const DEFAULT_PROJECT_NAME: &str = "my-awesome-project";

/// Choices supplied up front. Anything left `None` is prompted for,
/// or defaulted when `yes` is set.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory holding template modules instead of the bundled ones
    pub template_dir: Option<PathBuf>,

    /// Project name (`.` for the current directory)
    pub name: Option<String>,

    pub application_type: Option<ApplicationType>,
    pub framework: Option<Framework>,
    pub database_type: Option<DatabaseType>,
    pub orm: Option<Orm>,
    pub package_manager: Option<PackageManager>,
    pub docker: Option<bool>,
    pub auth: Option<bool>,
    pub git: Option<bool>,
    pub install: Option<bool>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    /// Leave partially generated files on disk when a build fails
    pub keep_on_failure: bool,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs) -> Result<BuildResult> {
    cliclack::intro("better-ts-stack")?;

    // Step 1: Collect choices
    let (config, project_dir) = collect_choices(&args)?;

    // Step 2: Summary and confirmation
    confirm_build(&config, &project_dir, args.yes)?;

    // Step 3: Warn early about missing tools
    if config.init_git {
        let git = check_git();
        if !git.available {
            cliclack::log::warning(format!(
                "{} - git initialization will be skipped",
                git.describe()
            ))?;
        }
    }
    if config.install_deps {
        let pm = check_package_manager(config.package_manager);
        if !pm.available {
            cliclack::log::warning(format!(
                "{} - dependency installation will be skipped",
                pm.describe()
            ))?;
        }
    }

    // Step 4: Build
    let registry = setup_registry(&args)?;
    let builder = ProjectBuilder::new(registry).cleanup_on_failure(!args.keep_on_failure);
    let result = build_project(&builder, &config, &project_dir).await?;

    // Step 5: Show next steps
    print_next_steps(&result)?;

    Ok(result)
}

fn setup_registry(args: &CreateArgs) -> Result<ModuleRegistry> {
    let registry = ModuleRegistry::from_env(args.template_dir.clone());
    if !registry.root().is_dir() {
        anyhow::bail!(
            "Template directory not found: {}",
            registry.root().display()
        );
    }
    cliclack::log::info(format!(
        "Using templates from {}",
        registry.root().display()
    ))?;
    Ok(registry)
}

fn collect_choices(args: &CreateArgs) -> Result<(ProjectConfig, PathBuf)> {
    let (project_name, project_dir) = select_project_name(args)?;

    let application_type = match args.application_type {
        Some(app) => app,
        None if args.yes => ApplicationType::Backend,
        None => cliclack::select("Application type")
            .item(
                ApplicationType::Backend,
                ApplicationType::Backend.label(),
                "",
            )
            .item(
                ApplicationType::Fullstack,
                ApplicationType::Fullstack.label(),
                "",
            )
            .initial_value(ApplicationType::Backend)
            .interact()?,
    };

    let framework = select_framework(args, application_type)?;
    let database_type = select_database_type(args)?;
    let orm = select_orm(args, database_type)?;

    let package_manager = match args.package_manager {
        Some(pm) => pm,
        None if args.yes => PackageManager::default(),
        None => cliclack::select("Package manager")
            .item(PackageManager::Npm, "npm", "")
            .item(PackageManager::Pnpm, "pnpm", "")
            .item(PackageManager::Bun, "bun", "")
            .initial_value(PackageManager::Npm)
            .interact()?,
    };

    let use_docker = confirm_flag(args.docker, args.yes, "Use Docker?", false)?;

    // Full-stack auth needs a database-backed adapter
    let use_auth = if application_type == ApplicationType::Fullstack
        && database_type == DatabaseType::None
    {
        if args.auth == Some(true) {
            cliclack::log::warning("Authentication requires a database; skipping auth")?;
        }
        false
    } else {
        confirm_flag(args.auth, args.yes, "Add authentication?", false)?
    };

    let init_git = confirm_flag(args.git, args.yes, "Init git?", true)?;
    let install_deps = confirm_flag(args.install, args.yes, "Install dependencies now?", false)?;

    let config = ProjectConfig {
        project_name,
        application_type,
        framework,
        database_type,
        orm,
        use_docker,
        use_auth,
        package_manager,
        init_git,
        install_deps,
    };
    config.validate()?;

    Ok((config, project_dir))
}

/// Returns the package name and the directory to build into
fn select_project_name(args: &CreateArgs) -> Result<(String, PathBuf)> {
    let name = match &args.name {
        Some(name) => {
            validate_project_name(name)?;
            name.clone()
        }
        None if args.yes => DEFAULT_PROJECT_NAME.to_string(),
        None => cliclack::input("Project name")
            .placeholder(DEFAULT_PROJECT_NAME)
            .validate(|input: &String| validate_project_name(input).map_err(|e| e.to_string()))
            .interact()?,
    };

    let current_dir = std::env::current_dir().context("Failed to read current directory")?;

    if name == "." {
        // Package name comes from the directory itself
        let dir_name = current_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_project_name(&dir_name).with_context(|| {
            format!("Current directory name '{}' is not a valid project name", dir_name)
        })?;
        return Ok((dir_name, current_dir));
    }

    let project_dir = current_dir.join(&name);
    Ok((name, project_dir))
}

fn select_framework(args: &CreateArgs, app: ApplicationType) -> Result<Framework> {
    let available = Framework::for_application(app);

    if let Some(framework) = args.framework {
        if !available.contains(&framework) {
            anyhow::bail!(
                "Framework '{}' is not available for {} applications",
                framework,
                app
            );
        }
        if framework.is_coming_soon() {
            anyhow::bail!("{} is coming soon. Please select another framework.", framework.label());
        }
        return Ok(framework);
    }

    // Auto-select when there is only one choice
    if available.len() == 1 || args.yes {
        let framework = available[0];
        cliclack::log::info(format!("Framework: {}", framework.label()))?;
        return Ok(framework);
    }

    loop {
        let mut select = cliclack::select("Select a framework");
        for framework in available {
            let hint = if framework.is_coming_soon() {
                "(Coming Soon)"
            } else {
                ""
            };
            select = select.item(*framework, framework.label(), hint);
        }
        let selected: Framework = select.initial_value(available[0]).interact()?;

        if selected.is_coming_soon() {
            cliclack::log::warning(
                "This framework is coming soon! Please select another option.",
            )?;
            continue;
        }

        return Ok(selected);
    }
}

fn select_database_type(args: &CreateArgs) -> Result<DatabaseType> {
    match args.database_type {
        Some(db) => Ok(db),
        None if args.yes => Ok(DatabaseType::None),
        None => {
            let mut select = cliclack::select("Select a database");
            for db in [
                DatabaseType::None,
                DatabaseType::Mongodb,
                DatabaseType::Postgresql,
            ] {
                select = select.item(db, db.label(), "");
            }
            Ok(select.initial_value(DatabaseType::None).interact()?)
        }
    }
}

fn select_orm(args: &CreateArgs, database_type: DatabaseType) -> Result<Orm> {
    let offered = database_type.orms();
    if offered.is_empty() {
        return Ok(Orm::None);
    }

    match args.orm {
        Some(orm) if offered.contains(&orm) => Ok(orm),
        Some(orm) => anyhow::bail!(
            "ORM '{}' is not available for {}",
            orm,
            database_type.label()
        ),
        None if args.yes => Ok(offered[0]),
        None => {
            let mut select =
                cliclack::select(format!("Select an ORM for {}", database_type.label()));
            for orm in offered {
                select = select.item(*orm, orm.label(), "");
            }
            Ok(select.initial_value(offered[0]).interact()?)
        }
    }
}

fn confirm_flag(value: Option<bool>, yes: bool, prompt: &str, default: bool) -> Result<bool> {
    match value {
        Some(v) => Ok(v),
        None if yes => Ok(default),
        None => Ok(cliclack::confirm(prompt).initial_value(default).interact()?),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Format the choices for the summary box
pub fn summary(config: &ProjectConfig, project_dir: &Path) -> String {
    format!(
        "Project Name:    {}\n\
         Target Dir:      {}\n\
         App Type:        {}\n\
         Framework:       {}\n\
         Database:        {}\n\
         Auth:            {}\n\
         Docker:          {}\n\
         Package Mgr:     {}\n\
         Git Init:        {}\n\
         Install Deps:    {}",
        config.project_name,
        project_dir.display(),
        config.application_type,
        config.effective_framework(),
        config.database(),
        yes_no(config.use_auth),
        yes_no(config.use_docker),
        config.package_manager,
        yes_no(config.init_git),
        yes_no(config.install_deps),
    )
}

fn confirm_build(config: &ProjectConfig, project_dir: &Path, yes: bool) -> Result<()> {
    cliclack::note("Project Summary", summary(config, project_dir))?;

    if yes {
        return Ok(());
    }

    let proceed: bool = cliclack::confirm("Looks good? Ready to build?")
        .initial_value(true)
        .interact()?;

    if !proceed {
        cliclack::outro_cancel("Building cancelled by user.")?;
        std::process::exit(0);
    }

    Ok(())
}

async fn build_project(
    builder: &ProjectBuilder,
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<BuildResult> {
    // Installer output streams to the terminal, which a spinner would garble
    if config.install_deps {
        cliclack::log::step("Building project...")?;
        let result = builder.build(config, project_dir).await?;
        cliclack::log::success(format!(
            "Created {} from {}",
            result.project_path.display(),
            result.modules.join(", ")
        ))?;
        return Ok(result);
    }

    let spinner = cliclack::spinner();
    spinner.start("Building project...");

    match builder.build(config, project_dir).await {
        Ok(result) => {
            spinner.stop(format!(
                "Created {} from {}",
                result.project_path.display(),
                result.modules.join(", ")
            ));
            Ok(result)
        }
        Err(e) => {
            spinner.stop(format!("Build failed ({})", e.code()));
            Err(e.into())
        }
    }
}

fn print_next_steps(result: &BuildResult) -> Result<()> {
    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in result.next_steps.iter().enumerate() {
        println!("  {}  {}", format!("{}.", i + 1).cyan(), step);
    }

    println!();
    println!(
        "  Your server will be running at {}",
        format!("http://localhost:{}", DEFAULT_PORT).green()
    );
    println!();

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CreateArgs {
        CreateArgs {
            name: Some("my-api".to_string()),
            yes: true,
            ..CreateArgs::default()
        }
    }

    #[test]
    fn test_orm_defaults_to_first_offered() {
        assert_eq!(select_orm(&args(), DatabaseType::Mongodb).unwrap(), Orm::Prisma);
        assert_eq!(select_orm(&args(), DatabaseType::None).unwrap(), Orm::None);
    }

    #[test]
    fn test_incompatible_orm_rejected() {
        let args = CreateArgs {
            orm: Some(Orm::Drizzle),
            ..args()
        };
        assert!(select_orm(&args, DatabaseType::Mongodb).is_err());
    }

    #[test]
    fn test_coming_soon_framework_rejected() {
        let args = CreateArgs {
            framework: Some(Framework::Nestjs),
            ..args()
        };
        assert!(select_framework(&args, ApplicationType::Backend).is_err());
    }

    #[test]
    fn test_flags_win_over_defaults() {
        assert!(confirm_flag(Some(true), true, "Use Docker?", false).unwrap());
        assert!(!confirm_flag(None, true, "Use Docker?", false).unwrap());
        assert!(confirm_flag(None, true, "Init git?", true).unwrap());
    }

    #[test]
    fn test_summary_lists_choices() {
        let config = ProjectConfig {
            project_name: "my-api".to_string(),
            application_type: ApplicationType::Backend,
            framework: Framework::Express,
            database_type: DatabaseType::Postgresql,
            orm: Orm::Drizzle,
            use_docker: true,
            use_auth: false,
            package_manager: PackageManager::Bun,
            init_git: true,
            install_deps: false,
        };
        let text = summary(&config, Path::new("/work/my-api"));
        assert!(text.contains("Database:        drizzle"));
        assert!(text.contains("Docker:          Yes"));
        assert!(text.contains("Package Mgr:     bun"));
    }
}
