use tempfile::TempDir;
use tsstack_core::templates::registry::bundled_template_root;
use tsstack_core::templates::TEMPLATE_EXTENSION;
use tsstack_core::{
    select_modules, ApplicationType, DatabaseType, Framework, ModuleRegistry, PackageManager,
    ProjectBuilder, ProjectConfig,
};

/// Every choice combination the prompts can produce
fn all_configs() -> Vec<ProjectConfig> {
    let mut configs = Vec::new();

    for app in [ApplicationType::Backend, ApplicationType::Fullstack] {
        for framework in Framework::for_application(app) {
            if framework.is_coming_soon() {
                continue;
            }
            for database_type in [
                DatabaseType::None,
                DatabaseType::Mongodb,
                DatabaseType::Postgresql,
            ] {
                let orms = match database_type.orms() {
                    [] => vec![tsstack_core::Orm::None],
                    orms => orms.to_vec(),
                };
                for orm in orms {
                    for use_docker in [false, true] {
                        for use_auth in [false, true] {
                            let config = ProjectConfig {
                                project_name: "bundled-app".to_string(),
                                application_type: app,
                                framework: *framework,
                                database_type,
                                orm,
                                use_docker,
                                use_auth,
                                package_manager: PackageManager::Npm,
                                init_git: false,
                                install_deps: false,
                            };
                            if config.validate().is_ok() {
                                configs.push(config);
                            }
                        }
                    }
                }
            }
        }
    }

    configs
}

#[tokio::test]
async fn test_every_selection_resolves() {
    let registry = ModuleRegistry::new(bundled_template_root());
    let configs = all_configs();
    assert!(configs.len() > 30);

    for config in &configs {
        let selection = select_modules(config);
        let modules = registry
            .load_selection(&selection)
            .await
            .unwrap_or_else(|e| panic!("{:?}: {}", selection, e));
        assert_eq!(modules.len(), selection.len());
    }
}

#[tokio::test]
async fn test_every_combination_builds() {
    let builder = ProjectBuilder::new(ModuleRegistry::new(bundled_template_root()));

    for config in all_configs() {
        let out = TempDir::new().unwrap();
        let target = out.path().join(&config.project_name);

        let result = builder
            .build(&config, &target)
            .await
            .unwrap_or_else(|e| panic!("{:?}: {} ({})", config, e, e.code()));
        assert!(result.success);

        let leftovers: Vec<_> = walkdir::WalkDir::new(&target)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy();
                name.ends_with(TEMPLATE_EXTENSION) || name == "config.json"
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        assert!(leftovers.is_empty(), "{:?}: {:?}", config, leftovers);

        let package: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(target.join("package.json")).unwrap())
                .unwrap();
        assert_eq!(package["name"], "bundled-app");

        if config.use_auth {
            let env = std::fs::read_to_string(target.join(".env.example")).unwrap();
            let secret = match config.framework {
                Framework::Nextjs => "AUTH_SECRET=",
                _ => "JWT_SECRET=",
            };
            assert!(env.contains(secret), "{:?}: {}", config, env);
            assert!(result.next_steps.iter().any(|s| s.contains(secret.trim_end_matches('='))));
        }
        assert!(package["scripts"]["dev"].is_string());
    }
}
