//! Project configuration: the finished set of user choices for one build

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// npm's limit on package name length
const MAX_PROJECT_NAME_LEN: usize = 214;

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid project name pattern"));

/// Kind of application being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    Backend,
    Fullstack,
}

impl ApplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::Backend => "backend",
            ApplicationType::Fullstack => "fullstack",
        }
    }

    /// Directory under the template root holding this application type's base templates
    pub fn template_dir(&self) -> &'static str {
        match self {
            ApplicationType::Backend => "backend",
            ApplicationType::Fullstack => "frontend",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationType::Backend => "Backend API (Express/NestJS)",
            ApplicationType::Fullstack => "Full-stack App (Next.js)",
        }
    }
}

/// Web framework for the base template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Nestjs,
    Nextjs,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Express => "express",
            Framework::Nestjs => "nestjs",
            Framework::Nextjs => "nextjs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Framework::Express => "Express",
            Framework::Nestjs => "NestJS",
            Framework::Nextjs => "Next.js 16 (App Router)",
        }
    }

    /// Application type this framework belongs to
    pub fn application_type(&self) -> ApplicationType {
        match self {
            Framework::Express | Framework::Nestjs => ApplicationType::Backend,
            Framework::Nextjs => ApplicationType::Fullstack,
        }
    }

    /// Frameworks listed for an application type
    pub fn for_application(app: ApplicationType) -> &'static [Framework] {
        match app {
            ApplicationType::Backend => &[Framework::Express, Framework::Nestjs],
            ApplicationType::Fullstack => &[Framework::Nextjs],
        }
    }

    /// Listed in prompts but without a bundled template yet
    pub fn is_coming_soon(&self) -> bool {
        matches!(self, Framework::Nestjs)
    }
}

/// Database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    None,
    Mongodb,
    Postgresql,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::None => "none",
            DatabaseType::Mongodb => "mongodb",
            DatabaseType::Postgresql => "postgresql",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatabaseType::None => "None (Skip database setup)",
            DatabaseType::Mongodb => "MongoDB",
            DatabaseType::Postgresql => "PostgreSQL",
        }
    }

    /// ORMs offered for this engine, in prompt order
    pub fn orms(&self) -> &'static [Orm] {
        match self {
            DatabaseType::None => &[],
            DatabaseType::Mongodb => &[Orm::Prisma, Orm::Mongoose],
            DatabaseType::Postgresql => &[Orm::Prisma, Orm::Drizzle],
        }
    }
}

/// ORM/ODM choice. Also serves as the derived database identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orm {
    None,
    Prisma,
    Mongoose,
    Drizzle,
}

impl Orm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orm::None => "none",
            Orm::Prisma => "prisma",
            Orm::Mongoose => "mongoose",
            Orm::Drizzle => "drizzle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orm::None => "None",
            Orm::Prisma => "Prisma (Type-safe ORM)",
            Orm::Mongoose => "Mongoose (MongoDB ODM)",
            Orm::Drizzle => "Drizzle (Lightweight ORM)",
        }
    }

    /// Whether the module ships one variant per framework.
    /// Mongoose is framework-agnostic and lives in a single module.
    pub fn is_framework_specific(&self) -> bool {
        matches!(self, Orm::Prisma | Orm::Drizzle)
    }
}

/// Package manager used for install and script invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn install_command(&self) -> String {
        format!("{} install", self.as_str())
    }

    /// Prefix for running a package.json script
    pub fn run_command(&self) -> String {
        format!("{} run", self.as_str())
    }

    /// Verb used to execute compiled output (the `runner` template helper)
    pub fn runner(&self) -> &'static str {
        match self {
            PackageManager::Npm => "node",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(ApplicationType, Framework, DatabaseType, Orm, PackageManager);

/// Reasons a set of choices cannot be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Project name is required")]
    EmptyProjectName,

    #[error(
        "Project name must be \".\" for current directory, or lowercase with only letters, numbers, and hyphens"
    )]
    InvalidProjectName,

    #[error("Project name cannot start or end with a hyphen")]
    HyphenatedProjectName,

    #[error("Project name must be 214 characters or less (npm package name limit)")]
    ProjectNameTooLong,

    #[error("Framework '{framework}' is not available for {application} applications")]
    FrameworkMismatch {
        framework: Framework,
        application: ApplicationType,
    },

    #[error("ORM '{orm}' is not available for database '{database}'")]
    OrmMismatch { orm: Orm, database: DatabaseType },

    #[error("Authentication for full-stack apps requires a database")]
    AuthRequiresDatabase,
}

/// Validate a project name against npm package naming rules
pub fn validate_project_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyProjectName);
    }
    if name == "." {
        return Ok(());
    }
    if !PROJECT_NAME_RE.is_match(name) {
        return Err(ConfigError::InvalidProjectName);
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(ConfigError::HyphenatedProjectName);
    }
    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(ConfigError::ProjectNameTooLong);
    }
    Ok(())
}

/// The finalized user decision set, constructed once per invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    pub application_type: ApplicationType,
    pub framework: Framework,
    pub database_type: DatabaseType,
    pub orm: Orm,
    pub use_docker: bool,
    pub use_auth: bool,
    pub package_manager: PackageManager,
    pub init_git: bool,
    pub install_deps: bool,
}

impl ProjectConfig {
    /// Derived database identifier. `none` whenever the database type is `none`,
    /// whatever ORM value is left over from earlier choices.
    pub fn database(&self) -> Orm {
        if self.database_type == DatabaseType::None {
            Orm::None
        } else {
            self.orm
        }
    }

    /// Framework name used for module variants and display.
    /// Non-backend apps always use Next.js.
    pub fn effective_framework(&self) -> Framework {
        match self.application_type {
            ApplicationType::Backend => self.framework,
            ApplicationType::Fullstack => Framework::Nextjs,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_project_name(&self.project_name)?;

        if self.framework.application_type() != self.application_type {
            return Err(ConfigError::FrameworkMismatch {
                framework: self.framework,
                application: self.application_type,
            });
        }

        if self.database_type != DatabaseType::None
            && self.orm != Orm::None
            && !self.database_type.orms().contains(&self.orm)
        {
            return Err(ConfigError::OrmMismatch {
                orm: self.orm,
                database: self.database_type,
            });
        }

        if self.use_auth
            && self.application_type == ApplicationType::Fullstack
            && self.database() == Orm::None
        {
            return Err(ConfigError::AuthRequiresDatabase);
        }

        Ok(())
    }
}
