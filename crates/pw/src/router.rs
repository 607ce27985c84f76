//! Bridge from `pageway.toml` settings to the router.
//!
//! Components are plain renderable identifiers in the CLI, so the router is
//! instantiated with `C = String` and every reference from the config file is
//! a registry key.

use std::path::Path;

use pw_config::{CliSettings, Config, ConfigError};
use pw_router::{ComponentRegistry, Dispatcher, ResolverConfig, RoleSource};
use pw_sitemap::ComponentRef;

use crate::output::Output;

/// Load the configuration used by every command.
pub(crate) fn load_config(
    path: Option<&Path>,
    cli_settings: Option<&CliSettings>,
) -> Result<Config, ConfigError> {
    let config = Config::load(path, cli_settings)?;
    match &config.config_path {
        Some(path) => tracing::info!(
            path = %path.display(),
            pages = config.pages.len(),
            components = config.components.len(),
            "Configuration loaded"
        ),
        None => tracing::info!("No pageway.toml found, using defaults"),
    }
    Ok(config)
}

/// Build the resolver configuration described by `config`.
pub(crate) fn resolver_config(config: &Config) -> ResolverConfig<String> {
    let router = &config.router;
    let components: ComponentRegistry<String> = config
        .components
        .iter()
        .map(|(key, component)| (key.as_str(), component.clone()))
        .collect();

    ResolverConfig {
        components,
        layout: router.layout.as_deref().map(ComponentRef::key),
        failover_component: router.failover_component.as_deref().map(ComponentRef::key),
        roles: router.roles.clone().map(RoleSource::Fixed),
        roles_dont_match_component: router
            .roles_dont_match_component
            .as_deref()
            .map(ComponentRef::key),
        roles_dont_match_layout: router
            .roles_dont_match_layout
            .as_deref()
            .map(ComponentRef::key),
    }
}

/// Build a dispatcher for the configured sitemap.
pub(crate) fn dispatcher(config: &Config) -> Dispatcher<String> {
    Dispatcher::new(&config.pages, resolver_config(config))
}

/// Warn about registry keys the configuration references but never defines.
pub(crate) fn warn_unknown_keys(output: &Output, config: &Config) {
    let unknown = config.unknown_component_keys();
    if !unknown.is_empty() {
        output.warning(&format!(
            "Warning: unknown component keys: {}",
            unknown.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pw_router::Layout;
    use pw_sitemap::PageNode;

    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        for (key, component) in [
            ("Home", "pages::Home"),
            ("Admin", "pages::Admin"),
            ("Main", "layouts::Main"),
            ("Denied", "pages::Denied"),
            ("NotFound", "pages::NotFound"),
        ] {
            config
                .components
                .insert(key.to_owned(), component.to_owned());
        }
        config.router.layout = Some("Main".to_owned());
        config.router.failover_component = Some("NotFound".to_owned());
        config.router.roles = Some(vec!["user".to_owned()]);
        config.router.roles_dont_match_component = Some("Denied".to_owned());
        config.pages = vec![
            PageNode::new("Home", "/")
                .with_component("Home")
                .with_items(vec![
                    PageNode::new("Admin", "/admin")
                        .with_component("Admin")
                        .with_roles(["admin"]),
                ]),
        ];
        config
    }

    #[test]
    fn test_resolver_config_maps_router_keys() {
        let resolver = resolver_config(&config());

        assert_eq!(resolver.components.len(), 5);
        assert_eq!(resolver.layout, Some(ComponentRef::key("Main")));
        assert_eq!(resolver.failover(), Some(&"pages::NotFound".to_owned()));
        assert_eq!(
            resolver.roles_dont_match_component,
            Some(ComponentRef::key("Denied"))
        );
        assert_eq!(resolver.roles_dont_match_layout, None);
        assert!(matches!(resolver.roles, Some(RoleSource::Fixed(ref r)) if r == &["user"]));
    }

    #[test]
    fn test_dispatcher_resolves_registry_ids() {
        let dispatcher = dispatcher(&config());

        let instruction = dispatcher.dispatch("/").unwrap().unwrap();

        assert_eq!(instruction.resolution.component, "pages::Home");
        assert_eq!(
            instruction.resolution.layout,
            Layout::Wrap("layouts::Main".to_owned())
        );
    }

    #[test]
    fn test_dispatcher_applies_role_override() {
        let dispatcher = dispatcher(&config());

        let instruction = dispatcher.dispatch("/admin").unwrap().unwrap();

        assert!(instruction.resolution.roles_dont_match);
        assert_eq!(instruction.resolution.component, "pages::Denied");
    }

    #[test]
    fn test_load_config_applies_role_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("pageway.toml");
        std::fs::write(&path, "[router]\nroles = [\"user\"]\n").unwrap();
        let settings = CliSettings {
            roles: Some(vec!["admin".to_owned()]),
        };

        let config = load_config(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.router.roles, Some(vec!["admin".to_owned()]));
    }

    #[test]
    fn test_load_config_rejects_empty_role_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("pageway.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            roles: Some(vec![String::new()]),
        };

        let err = load_config(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_config_has_no_roles() {
        let resolver = resolver_config(&Config::default());

        assert!(resolver.components.is_empty());
        assert!(resolver.roles.is_none());
        assert!(resolver.failover().is_none());
    }
}
