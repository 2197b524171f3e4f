//! Module selection: maps project choices to an ordered list of modules

use super::manifest::ModuleType;
use crate::project::{ApplicationType, Framework, Orm, ProjectConfig};
use std::fmt;
use std::path::PathBuf;

/// Optional feature modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Docker,
    Auth,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Docker => "docker",
            Feature::Auth => "auth",
        }
    }
}

/// Identifier of a module, tagged with the kind of module it names.
///
/// The tag decides which template root the module lives under, so the
/// registry never has to guess from the shape of a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// A base template, e.g. `backend/express`
    Base {
        application: ApplicationType,
        framework: Framework,
    },
    /// A database integration, e.g. `prisma/express` or `mongoose`
    Database {
        orm: Orm,
        framework: Option<Framework>,
    },
    /// An optional feature, e.g. `docker` or `auth/express`
    Feature {
        feature: Feature,
        framework: Option<Framework>,
    },
}

impl ModuleId {
    pub fn module_type(&self) -> ModuleType {
        match self {
            ModuleId::Base { .. } => ModuleType::Base,
            ModuleId::Database { .. } => ModuleType::Database,
            ModuleId::Feature { .. } => ModuleType::Feature,
        }
    }

    /// Path of the module directory relative to the root for its kind
    pub fn relative_path(&self) -> PathBuf {
        let (head, framework) = match self {
            ModuleId::Base {
                application,
                framework,
            } => (application.template_dir(), Some(framework)),
            ModuleId::Database { orm, framework } => (orm.as_str(), framework.as_ref()),
            ModuleId::Feature { feature, framework } => (feature.as_str(), framework.as_ref()),
        };

        let mut path = PathBuf::from(head);
        if let Some(framework) = framework {
            path.push(framework.as_str());
        }
        path
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<_> = self
            .relative_path()
            .iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        write!(f, "{}", segments.join("/"))
    }
}

/// Selected modules in merge order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSelection {
    pub base: ModuleId,
    pub modules: Vec<ModuleId>,
}

impl ModuleSelection {
    /// All modules, base first
    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        std::iter::once(&self.base).chain(self.modules.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Determine which modules to include.
///
/// Order is fixed: base, database, docker, auth. Later modules override
/// earlier ones during merge and copy, so this order is part of the contract.
pub fn select_modules(config: &ProjectConfig) -> ModuleSelection {
    let framework = config.effective_framework();

    let base = ModuleId::Base {
        application: config.application_type,
        framework: config.framework,
    };

    let mut modules = Vec::new();

    let database = config.database();
    if database != Orm::None {
        modules.push(ModuleId::Database {
            orm: database,
            framework: database.is_framework_specific().then_some(framework),
        });
    }

    if config.use_docker {
        modules.push(ModuleId::Feature {
            feature: Feature::Docker,
            framework: None,
        });
    }

    if config.use_auth {
        modules.push(ModuleId::Feature {
            feature: Feature::Auth,
            framework: Some(framework),
        });
    }

    ModuleSelection { base, modules }
}
