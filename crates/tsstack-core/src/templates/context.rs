//! Template context: the variables and helpers visible to every render pass

use crate::project::{DatabaseType, Framework, Orm, PackageManager, ProjectConfig};
use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, JsonValue, RenderContext,
    RenderError, ScopedJson,
};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Port generated projects listen on
pub const DEFAULT_PORT: u16 = 3000;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid camel-case pattern"));
static WORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("valid separator pattern"));

pub fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

pub fn uppercase(s: &str) -> String {
    s.to_uppercase()
}

/// `MyProject` / `my_project` / `my project` -> `my-project`
pub fn kebab_case(s: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(s, "${1}-${2}");
    WORD_SEPARATORS.replace_all(&split, "-").to_lowercase()
}

handlebars_helper!(lowercase_helper: |s: str| lowercase(s));
handlebars_helper!(uppercase_helper: |s: str| uppercase(s));
handlebars_helper!(kebab_case_helper: |s: str| kebab_case(s));
handlebars_helper!(eq_helper: |a: Json, b: Json| a == b);

/// `{{runner}}`: the verb that executes compiled output for the chosen package manager
#[derive(Debug, Clone, Copy)]
struct RunnerHelper(&'static str);

impl HelperDef for RunnerHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        Ok(ScopedJson::Derived(JsonValue::from(self.0)))
    }
}

/// Named helpers available to templates.
///
/// Passed explicitly to each render so no render observes registrations
/// made by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperTable {
    runner: &'static str,
}

impl HelperTable {
    pub const NAMES: [&'static str; 5] = ["lowercase", "uppercase", "kebabCase", "eq", "runner"];

    pub fn new(package_manager: PackageManager) -> Self {
        Self {
            runner: package_manager.runner(),
        }
    }

    pub fn runner(&self) -> &'static str {
        self.runner
    }

    /// Register every helper on a registry
    pub fn install(&self, registry: &mut Handlebars<'_>) {
        registry.register_helper("lowercase", Box::new(lowercase_helper));
        registry.register_helper("uppercase", Box::new(uppercase_helper));
        registry.register_helper("kebabCase", Box::new(kebab_case_helper));
        registry.register_helper("eq", Box::new(eq_helper));
        registry.register_helper("runner", Box::new(RunnerHelper(self.runner)));
    }
}

/// Variables available in templates. Serialized field names are what
/// templates reference, e.g. `{{projectName}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    pub project_name: String,
    pub package_manager: PackageManager,
    pub database: Orm,
    pub database_type: DatabaseType,
    pub framework: Framework,
    pub port: u16,
    pub use_docker: bool,
    pub use_auth: bool,
    #[serde(skip)]
    pub helpers: HelperTable,
}

/// Build the context for one build
pub fn build_template_context(config: &ProjectConfig) -> TemplateContext {
    TemplateContext {
        project_name: config.project_name.clone(),
        package_manager: config.package_manager,
        database: config.database(),
        database_type: config.database_type,
        framework: config.effective_framework(),
        port: DEFAULT_PORT,
        use_docker: config.use_docker,
        use_auth: config.use_auth,
        helpers: HelperTable::new(config.package_manager),
    }
}
