//! better-ts-stack - Scaffold TypeScript backend and full-stack projects

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tsstack_core::tui::CreateArgs;
use tsstack_core::{ApplicationType, BuildError, DatabaseType, Framework, Orm, PackageManager};

#[derive(Parser, Debug)]
#[command(name = "better-ts-stack")]
#[command(about = "CLI for scaffolding TypeScript backend and full-stack projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log build stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name (`.` to build into the current directory)
    pub name: Option<String>,

    /// Application type
    #[arg(long, value_enum)]
    pub app: Option<ApplicationType>,

    /// Framework for the base template
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,

    /// Database engine
    #[arg(long, value_enum)]
    pub database: Option<DatabaseType>,

    /// ORM or ODM for the chosen database
    #[arg(long, value_enum)]
    pub orm: Option<Orm>,

    /// Package manager used for install and run commands
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Add Docker support
    #[arg(long)]
    pub docker: bool,

    /// Add authentication
    #[arg(long)]
    pub auth: bool,

    /// Skip git initialization
    #[arg(long = "no-git")]
    pub no_git: bool,

    /// Install dependencies after generation
    #[arg(long)]
    pub install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Leave partially generated files in place when a build fails
    #[arg(long = "keep-on-failure")]
    pub keep_on_failure: bool,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

/// An unset switch leaves the choice to the prompt
fn flag(set: bool, value: bool) -> Option<bool> {
    set.then_some(value)
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            name: args.name,
            application_type: args.app,
            framework: args.framework,
            database_type: args.database,
            orm: args.orm,
            package_manager: args.package_manager,
            docker: flag(args.docker, true),
            auth: flag(args.auth, true),
            git: flag(args.no_git, false),
            install: flag(args.install, true),
            yes: args.yes,
            keep_on_failure: args.keep_on_failure,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    // No subcommand provided, default to create behavior (interactive mode)
    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        None => CliCreateArgs::default(),
    };

    let result = tsstack_core::run(create_args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(_) => Ok(()),
        Err(err) => match err.downcast_ref::<BuildError>() {
            Some(build_err) => {
                eprintln!();
                eprintln!("Error: {}", build_err);
                eprintln!("Code: {}", build_err.code());
                std::process::exit(build_err.exit_code());
            }
            None => Err(err),
        },
    }
}
