//! Folding module manifests into one merged configuration

use crate::error::{BuildError, Result};
use crate::templates::context::TemplateContext;
use crate::templates::manifest::{ModuleManifest, StringMap};
use crate::templates::render::render;
use serde::Serialize;

/// Combined dependencies, scripts and environment variables of all modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedConfig {
    pub dependencies: StringMap,
    pub dev_dependencies: StringMap,
    /// Scripts with template expressions already substituted
    pub scripts: StringMap,
    pub env_vars: StringMap,
}

/// Substitute template expressions in every script of one module
pub fn process_script_variables(
    module: &ModuleManifest,
    context: &TemplateContext,
) -> Result<StringMap> {
    module
        .scripts
        .iter()
        .map(|(name, command)| {
            render(command, context, &context.helpers)
                .map(|rendered| (name.clone(), rendered))
                .map_err(|e| BuildError::TemplateScript {
                    module: module.id.clone(),
                    script: name.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Merge manifests in selection order; later modules override earlier ones.
///
/// A key keeps the position of its first declaration and the value of its
/// last. Any script that fails to render aborts the whole merge.
pub fn merge_configurations<'a, I>(modules: I, context: &TemplateContext) -> Result<MergedConfig>
where
    I: IntoIterator<Item = &'a ModuleManifest>,
{
    let mut merged = MergedConfig::default();

    for module in modules {
        merge_map(&mut merged.dependencies, &module.dependencies);
        merge_map(&mut merged.dev_dependencies, &module.dev_dependencies);
        merged
            .scripts
            .extend(process_script_variables(module, context)?);
        merge_map(&mut merged.env_vars, &module.env_vars);
    }

    Ok(merged)
}

fn merge_map(into: &mut StringMap, from: &StringMap) {
    into.extend(from.iter().map(|(k, v)| (k.clone(), v.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::express_config;
    use crate::templates::context::build_template_context;
    use crate::templates::manifest::ModuleType;

    fn manifest(id: &str) -> ModuleManifest {
        ModuleManifest {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            module_type: ModuleType::Feature,
            dependencies: StringMap::new(),
            dev_dependencies: StringMap::new(),
            scripts: StringMap::new(),
            env_vars: StringMap::new(),
            template_files: Vec::new(),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> StringMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_last_module_wins() {
        let context = build_template_context(&express_config());
        let mut base = manifest("backend/express");
        base.dependencies = map(&[("express", "^4.0.0"), ("zod", "^3.0.0")]);
        base.dev_dependencies = map(&[("typescript", "^5.0.0")]);
        base.env_vars = map(&[("PORT", "3000"), ("NODE_ENV", "development")]);

        let mut feature = manifest("docker");
        feature.dependencies = map(&[("express", "^5.0.0")]);
        feature.dev_dependencies = map(&[("typescript", "^5.7.0")]);
        feature.env_vars = map(&[("PORT", "8080")]);

        let merged = merge_configurations([&base, &feature], &context).unwrap();

        assert_eq!(merged.dependencies["express"], "^5.0.0");
        assert_eq!(merged.dependencies["zod"], "^3.0.0");
        assert_eq!(merged.dev_dependencies["typescript"], "^5.7.0");
        assert_eq!(merged.env_vars["PORT"], "8080");

        // Overridden keys keep their first position
        let keys: Vec<_> = merged.env_vars.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["PORT", "NODE_ENV"]);
    }

    #[test]
    fn test_scripts_are_rendered() {
        let context = build_template_context(&express_config());
        let mut docker = manifest("docker");
        docker.scripts = map(&[
            ("docker:up", "docker compose -p {{projectName}} up -d"),
            ("start", "{{runner}} dist/index.js"),
        ]);

        let merged = merge_configurations([&docker], &context).unwrap();

        assert_eq!(merged.scripts["docker:up"], "docker compose -p my-api up -d");
        assert_eq!(merged.scripts["start"], "node dist/index.js");
    }

    #[test]
    fn test_plain_scripts_unchanged() {
        let context = build_template_context(&express_config());
        let mut base = manifest("backend/express");
        let command = "tsx watch src/index.ts --clear-screen=false && echo 'done' > /dev/null";
        base.scripts = map(&[("dev", command)]);

        let merged = merge_configurations([&base], &context).unwrap();
        assert_eq!(merged.scripts["dev"], command);
    }

    #[test]
    fn test_bad_script_aborts_merge() {
        let context = build_template_context(&express_config());
        let mut base = manifest("backend/express");
        base.scripts = map(&[("dev", "tsx watch src/index.ts")]);
        let mut broken = manifest("docker");
        broken.scripts = map(&[("docker:up", "docker compose -p {{projectName up")]);

        let err = merge_configurations([&base, &broken], &context).unwrap_err();

        match err {
            BuildError::TemplateScript { module, script, .. } => {
                assert_eq!(module, "docker");
                assert_eq!(script, "docker:up");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_is_deterministic() {
        let context = build_template_context(&express_config());
        let mut a = manifest("a");
        a.dependencies = map(&[("x", "1"), ("y", "1")]);
        let mut b = manifest("b");
        b.dependencies = map(&[("z", "2"), ("x", "2")]);

        let first = merge_configurations([&a, &b], &context).unwrap();
        let second = merge_configurations([&a, &b], &context).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
