//! Handlebars rendering of scripts and template files

use super::context::{HelperTable, TemplateContext};
use crate::error::{BuildError, Result};
use handlebars::Handlebars;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix marking files that are rendered then renamed without it
pub const TEMPLATE_EXTENSION: &str = ".hbs";

/// Render `content` against `context` in a single substitution pass.
///
/// Every call gets its own registry with `helpers` installed, and output is not
/// HTML-escaped: rendered content is source code and shell commands.
pub fn render(
    content: &str,
    context: &TemplateContext,
    helpers: &HelperTable,
) -> std::result::Result<String, handlebars::RenderError> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    helpers.install(&mut registry);
    registry.render_template(content, context)
}

/// Output path for a template file: the marker extension is stripped
pub fn output_path(file: &Path) -> PathBuf {
    let raw = file.as_os_str().to_string_lossy();
    match raw.strip_suffix(TEMPLATE_EXTENSION) {
        Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
        _ => file.to_path_buf(),
    }
}

/// Render every declared template file under `target_dir`, in order.
///
/// Paths that do not exist are skipped. Returns the number of files rendered.
pub async fn process_template_files(
    target_dir: &Path,
    context: &TemplateContext,
    template_files: &[String],
) -> Result<usize> {
    let mut rendered = 0;
    for template_file in template_files {
        if process_template_file(&target_dir.join(template_file), context).await? {
            rendered += 1;
        }
    }
    Ok(rendered)
}

/// Render one file in place. Returns `false` when the file is absent.
pub async fn process_template_file(file: &Path, context: &TemplateContext) -> Result<bool> {
    if !fs::try_exists(file).await.unwrap_or(false) {
        tracing::debug!(file = %file.display(), "template file not present, skipping");
        return Ok(false);
    }

    let write_error = |source| BuildError::TemplateWrite {
        file: file.to_path_buf(),
        source,
    };

    let content = fs::read_to_string(file).await.map_err(write_error)?;

    let rendered =
        render(&content, context, &context.helpers).map_err(|e| BuildError::TemplateSyntax {
            file: file.to_path_buf(),
            reason: e.to_string(),
        })?;

    let output = output_path(file);
    fs::write(&output, rendered).await.map_err(write_error)?;

    if output != file {
        fs::remove_file(file).await.map_err(write_error)?;
        tracing::debug!(from = %file.display(), to = %output.display(), "rendered template");
    } else {
        tracing::debug!(file = %file.display(), "rendered template in place");
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::express_config;
    use crate::project::{PackageManager, ProjectConfig};
    use crate::templates::context::build_template_context;
    use tempfile::TempDir;

    fn context() -> TemplateContext {
        build_template_context(&ProjectConfig {
            project_name: "shop-api".to_string(),
            package_manager: PackageManager::Pnpm,
            ..express_config()
        })
    }

    #[test]
    fn test_render_variables_and_helpers() {
        let ctx = context();
        let out = render(
            "{{uppercase projectName}} on {{port}} via {{runner}} ({{kebabCase \"MyService\"}})",
            &ctx,
            &ctx.helpers,
        )
        .unwrap();
        assert_eq!(out, "SHOP-API on 3000 via pnpm (my-service)");
    }

    #[test]
    fn test_render_eq_subexpression() {
        let ctx = context();
        let out = render(
            "{{#if (eq packageManager \"pnpm\")}}yes{{else}}no{{/if}}",
            &ctx,
            &ctx.helpers,
        )
        .unwrap();
        assert_eq!(out, "yes");
    }

    #[test]
    fn test_render_does_not_escape() {
        let ctx = context();
        let out = render("const a = \"{{projectName}}\" && '<b>'", &ctx, &ctx.helpers).unwrap();
        assert_eq!(out, "const a = \"shop-api\" && '<b>'");
    }

    #[test]
    fn test_render_unterminated_expression_fails() {
        let ctx = context();
        assert!(render("echo {{projectName", &ctx, &ctx.helpers).is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/p/src/index.ts.hbs")),
            PathBuf::from("/p/src/index.ts")
        );
        assert_eq!(
            output_path(Path::new("/p/README.md")),
            PathBuf::from("/p/README.md")
        );
    }

    #[tokio::test]
    async fn test_marked_file_is_rendered_and_removed() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(
            temp.path().join("src/index.ts.hbs"),
            "console.log('{{projectName}}');\n",
        )
        .unwrap();

        let count = process_template_files(
            temp.path(),
            &context(),
            &["src/index.ts.hbs".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert!(!temp.path().join("src/index.ts.hbs").exists());
        assert_eq!(
            std::fs::read_to_string(temp.path().join("src/index.ts")).unwrap(),
            "console.log('shop-api');\n"
        );
    }

    #[tokio::test]
    async fn test_unmarked_file_rendered_in_place() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "# {{projectName}}").unwrap();

        process_template_files(temp.path(), &context(), &["README.md".to_string()])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "# shop-api"
        );
    }

    #[tokio::test]
    async fn test_missing_template_file_is_skipped() {
        let temp = TempDir::new().unwrap();

        let count = process_template_files(
            temp.path(),
            &context(),
            &["docker-compose.yml.hbs".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(count, 0);
        assert!(!temp.path().join("docker-compose.yml").exists());
    }

    #[tokio::test]
    async fn test_syntax_error_names_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bad.ts.hbs"), "{{#if useAuth}}never closed").unwrap();

        let err = process_template_files(temp.path(), &context(), &["bad.ts.hbs".to_string()])
            .await
            .unwrap_err();

        match err {
            BuildError::TemplateSyntax { file, .. } => assert!(file.ends_with("bad.ts.hbs")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_template_is_write_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("config.ts.hbs")).unwrap();

        let err = process_template_files(temp.path(), &context(), &["config.ts.hbs".to_string()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("config.ts.hbs"));
        match err {
            BuildError::TemplateWrite { file, .. } => assert!(file.ends_with("config.ts.hbs")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
