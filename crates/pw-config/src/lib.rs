//! Configuration management for pageway.
//!
//! Parses `pageway.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The page tree is declared inline under `[[pages]]` or kept in a separate
//! YAML file referenced by `sitemap_file` (resolved relative to the config
//! file). Component, layout and failover references in the file are registry
//! keys resolved through `[components]`.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use pw_sitemap::{ComponentRef, PageNode};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the fixed role set of the current user.
    pub roles: Option<Vec<String>>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pageway.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolver settings.
    pub router: RouterConfig,
    /// Component registry: key to renderable identifier.
    pub components: BTreeMap<String, String>,
    /// Inline page tree.
    pub pages: Vec<PageNode<String>>,
    /// Optional YAML sitemap file, relative to the config file.
    sitemap_file: Option<String>,

    /// Resolved sitemap file path (set after loading).
    #[serde(skip)]
    pub sitemap_path: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Resolver settings. All values are registry keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Default layout key.
    pub layout: Option<String>,
    /// Failover component key.
    pub failover_component: Option<String>,
    /// Fixed role set of the current user.
    pub roles: Option<Vec<String>>,
    /// Component key rendered on role mismatch.
    pub roles_dont_match_component: Option<String>,
    /// Layout key used on role mismatch.
    pub roles_dont_match_layout: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// YAML sitemap parsing error.
    #[error("Sitemap parse error in {}: {source}", path.display())]
    Yaml {
        /// Sitemap file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require an optional string field to be non-empty when set.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pageway.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(roles) = &settings.roles {
            self.router.roles = Some(roles.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.load_sitemap_file(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Replace inline pages with the referenced YAML sitemap, if any.
    fn load_sitemap_file(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let Some(file) = &self.sitemap_file else {
            return Ok(());
        };
        if !self.pages.is_empty() {
            return Err(ConfigError::Validation(
                "sitemap_file and inline [[pages]] are mutually exclusive".to_owned(),
            ));
        }

        let path = config_dir.join(file);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        self.pages = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?;
        self.sitemap_path = Some(path);

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_router()?;
        validate_pages(&self.pages, "pages")?;
        Ok(())
    }

    /// Validate router configuration.
    fn validate_router(&self) -> Result<(), ConfigError> {
        let router = &self.router;
        require_non_empty(router.layout.as_deref(), "router.layout")?;
        require_non_empty(
            router.failover_component.as_deref(),
            "router.failover_component",
        )?;
        require_non_empty(
            router.roles_dont_match_component.as_deref(),
            "router.roles_dont_match_component",
        )?;
        require_non_empty(
            router.roles_dont_match_layout.as_deref(),
            "router.roles_dont_match_layout",
        )?;
        if let Some(roles) = &router.roles
            && roles.iter().any(String::is_empty)
        {
            return Err(ConfigError::Validation(
                "router.roles cannot contain empty roles".to_owned(),
            ));
        }
        Ok(())
    }

    /// Registry keys referenced by the configuration but missing from
    /// `[components]`, sorted and deduplicated.
    ///
    /// Missing keys are not an error: they resolve to nothing and trigger
    /// the failover path at navigation time.
    #[must_use]
    pub fn unknown_component_keys(&self) -> Vec<String> {
        let router = &self.router;
        let mut referenced: Vec<&str> = [
            router.layout.as_deref(),
            router.failover_component.as_deref(),
            router.roles_dont_match_component.as_deref(),
            router.roles_dont_match_layout.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        collect_page_keys(&self.pages, &mut referenced);

        let mut unknown: Vec<String> = referenced
            .into_iter()
            .filter(|key| !self.components.contains_key(*key))
            .map(str::to_owned)
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

/// Validate a sibling group of pages and their descendants.
fn validate_pages(pages: &[PageNode<String>], field: &str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (i, page) in pages.iter().enumerate() {
        let field = format!("{field}[{i}]");
        if page.url.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{field}.url cannot be empty"
            )));
        }
        if !seen.insert(page.url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{field}.url {:?} duplicates a sibling url",
                page.url
            )));
        }
        if let Some(mask) = &page.url_mask
            && !mask.is_empty()
            && !mask.starts_with('/')
        {
            return Err(ConfigError::Validation(format!(
                "{field}.url_mask must start with /"
            )));
        }
        if let Some(items) = &page.items {
            validate_pages(items, &format!("{field}.items"))?;
        }
    }
    Ok(())
}

fn collect_page_keys<'a>(pages: &'a [PageNode<String>], keys: &mut Vec<&'a str>) {
    for page in pages {
        keys.extend(
            [page.component.as_ref(), page.layout.as_ref()]
                .into_iter()
                .flatten()
                .filter_map(ComponentRef::as_key),
        );
        if let Some(items) = &page.items {
            collect_page_keys(items, keys);
        }
    }
}
