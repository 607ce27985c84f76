//! Per-navigation request dispatch.
//!
//! Provides [`Dispatcher`], which owns the flattened [`PageTable`] for the
//! current sitemap and turns navigated paths into [`RenderInstruction`]s.
//!
//! # Thread Safety
//!
//! `Dispatcher` is designed for concurrent access without external locking:
//! - Uses an internal `RwLock` holding `Arc` snapshots of the table and the
//!   resolver configuration
//! - `dispatch()` only clones the `Arc`s and works on immutable data
//! - `replace_site_map()` builds the new table before taking the write lock,
//!   so readers see either the old or the new complete table
//!
//! # Example
//!
//! ```
//! use pw_router::{ComponentRegistry, Dispatcher, ResolverConfig};
//! use pw_sitemap::PageNode;
//!
//! let site_map = vec![PageNode::new("Home", "/").with_component("Home")];
//! let config = ResolverConfig::default()
//!     .with_components(ComponentRegistry::new().with("Home", "home"));
//! let dispatcher = Dispatcher::new(&site_map, config);
//!
//! let instruction = dispatcher.dispatch("/")?.expect("route");
//! assert_eq!(instruction.resolution.component, "home");
//! # Ok::<(), pw_router::DispatchError>(())
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use pw_sitemap::{BreadcrumbItem, FlatPage, NavItem, PageNode, PageTable, Params};

use crate::resolver::{FailoverSlot, Layout, ResolveError, Resolution, ResolverConfig, resolve};

/// Error returned when a navigation cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The matched page has no resolvable component and no failover exists.
    #[error("Cannot render {path}: {source}")]
    Unresolved {
        /// Navigated path.
        path: String,
        /// Underlying resolution failure.
        #[source]
        source: ResolveError,
    },
}

/// Read-only context handed to the rendering collaborator.
#[derive(Debug)]
pub struct RenderContext<C> {
    table: Arc<PageTable<C>>,
    page_index: Option<usize>,
    /// Navigated path.
    pub path: String,
    /// Parameters captured by the matched page's url mask.
    pub params: Params,
}

impl<C> RenderContext<C> {
    /// Matched page, `None` for not-found instructions.
    #[must_use]
    pub fn page(&self) -> Option<&FlatPage<C>> {
        self.page_index.and_then(|i| self.table.get(i))
    }

    /// Index of the matched page in the table.
    #[must_use]
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    /// Full page table the page was matched in.
    #[must_use]
    pub fn table(&self) -> &PageTable<C> {
        &self.table
    }

    /// Navigation menu for the table.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.table.navigation()
    }

    /// Ancestors of the matched page, root-first.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        self.table.breadcrumbs(&self.path)
    }
}

/// Resolved component/layout pair plus context for one navigation.
#[derive(Debug)]
pub struct RenderInstruction<C> {
    pub resolution: Resolution<C>,
    pub context: RenderContext<C>,
}

impl<C> RenderInstruction<C> {
    /// True when no page matched and the failover component is rendered.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.context.page_index.is_none()
    }
}

struct Snapshot<C> {
    table: Arc<PageTable<C>>,
    config: Arc<ResolverConfig<C>>,
}

/// Dispatches navigated paths against the current sitemap.
pub struct Dispatcher<C> {
    current: RwLock<Snapshot<C>>,
}

impl<C: Clone> Dispatcher<C> {
    /// Flatten `site_map` and create a dispatcher over it.
    #[must_use]
    pub fn new(site_map: &[PageNode<C>], config: ResolverConfig<C>) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                table: Arc::new(PageTable::new(site_map)),
                config: Arc::new(config),
            }),
        }
    }

    /// Current page table snapshot.
    #[must_use]
    pub fn table(&self) -> Arc<PageTable<C>> {
        self.snapshot().0
    }

    /// Current resolver configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<ResolverConfig<C>> {
        self.snapshot().1
    }

    /// Rebuild the page table from a new sitemap and swap it in.
    ///
    /// In-flight dispatches keep the snapshot they started with.
    pub fn replace_site_map(&self, site_map: &[PageNode<C>]) {
        let table = Arc::new(PageTable::new(site_map));
        tracing::debug!(pages = table.len(), "Replacing page table");
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .table = table;
    }

    /// Swap the resolver configuration, keeping the current page table.
    pub fn replace_config(&self, config: ResolverConfig<C>) {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .config = Arc::new(config);
    }

    /// Resolve the render instruction for a navigated path.
    ///
    /// Returns `Ok(None)` when no page matches and no failover component is
    /// configured: nothing is rendered for the path.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Unresolved`] when the matched page has no
    /// resolvable component and no failover component is configured.
    pub fn dispatch(&self, path: &str) -> Result<Option<RenderInstruction<C>>, DispatchError> {
        let (table, config) = self.snapshot();

        let matched = table
            .match_path(path)
            .map(|matched| (matched.index, matched.params));
        let Some((index, params)) = matched else {
            return Ok(Self::not_found(table, &config, path));
        };

        let page = &table.pages()[index];
        let resolution = match resolve(page, &config) {
            Ok(resolution) => resolution,
            Err(source) => {
                tracing::error!(path, url = %page.url, "No component to render");
                return Err(DispatchError::Unresolved {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        if let Some(slot) = resolution.failover_for {
            tracing::warn!(path, url = %page.url, slot = %slot, "Failover substituted");
        }
        if resolution.roles_dont_match {
            tracing::debug!(path, url = %page.url, "Roles don't match");
        }

        Ok(Some(RenderInstruction {
            resolution,
            context: RenderContext {
                table,
                page_index: Some(index),
                path: path.to_owned(),
                params,
            },
        }))
    }

    fn not_found(
        table: Arc<PageTable<C>>,
        config: &ResolverConfig<C>,
        path: &str,
    ) -> Option<RenderInstruction<C>> {
        let Some(failover) = config.failover() else {
            tracing::debug!(path, "No page matched and no failover configured");
            return None;
        };

        tracing::debug!(path, "No page matched, rendering failover");
        Some(RenderInstruction {
            resolution: Resolution {
                component: failover.clone(),
                layout: Layout::Passthrough,
                roles_dont_match: false,
                failover_for: Some(FailoverSlot::Page),
            },
            context: RenderContext {
                table,
                page_index: None,
                path: path.to_owned(),
                params: Params::new(),
            },
        })
    }
}

impl<C> Dispatcher<C> {
    fn snapshot(&self) -> (Arc<PageTable<C>>, Arc<ResolverConfig<C>>) {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        (Arc::clone(&current.table), Arc::clone(&current.config))
    }
}

#[cfg(test)]
mod tests {
    // Ensure Dispatcher is Send + Sync for use with Arc
    static_assertions::assert_impl_all!(super::Dispatcher<String>: Send, Sync);

    use std::thread;

    use pretty_assertions::assert_eq;
    use pw_sitemap::ComponentRef;

    use super::*;
    use crate::registry::ComponentRegistry;
    use crate::roles::RoleSource;

    fn site_map() -> Vec<PageNode<String>> {
        vec![
            PageNode::new("Home", "/")
                .with_component("Home")
                .with_items(vec![
                    PageNode::new("About", "/about").with_component("About"),
                    PageNode::new("Admin", "/admin")
                        .with_component("Admin")
                        .with_roles(["admin"]),
                    PageNode::new("User", "/user")
                        .with_url_mask("/user/:id")
                        .with_component("User"),
                    PageNode::new("Broken", "/broken"),
                ]),
        ]
    }

    fn components() -> ComponentRegistry<String> {
        ["Home", "About", "Admin", "User", "Denied", "NotFound", "Main"]
            .into_iter()
            .map(|key| (key, format!("{key}Component")))
            .collect()
    }

    fn dispatcher(config: ResolverConfig<String>) -> Dispatcher<String> {
        Dispatcher::new(&site_map(), config.with_components(components()))
    }

    #[test]
    fn test_dispatch_matched_page() {
        let dispatcher = dispatcher(ResolverConfig::default().with_layout("Main"));

        let instruction = dispatcher.dispatch("/about").unwrap().unwrap();

        assert_eq!(instruction.resolution.component, "AboutComponent");
        assert_eq!(
            instruction.resolution.layout,
            Layout::Wrap("MainComponent".to_owned())
        );
        assert!(!instruction.is_not_found());
        assert_eq!(instruction.context.page().map(|p| p.level), Some(2));
        assert_eq!(instruction.context.page_index(), Some(1));
        assert_eq!(instruction.context.table().len(), 5);
    }

    #[test]
    fn test_dispatch_passes_mask_params() {
        let dispatcher = dispatcher(ResolverConfig::default());

        let instruction = dispatcher.dispatch("/user/42").unwrap().unwrap();

        assert_eq!(instruction.resolution.component, "UserComponent");
        assert_eq!(
            instruction.context.params.get("id").map(String::as_str),
            Some("42")
        );
    }

    #[test]
    fn test_dispatch_not_found_with_failover() {
        let dispatcher = dispatcher(ResolverConfig::default().with_failover_component("NotFound"));

        let instruction = dispatcher.dispatch("/missing").unwrap().unwrap();

        assert!(instruction.is_not_found());
        assert!(instruction.context.page().is_none());
        assert_eq!(
            instruction.resolution,
            Resolution {
                component: "NotFoundComponent".to_owned(),
                layout: Layout::Passthrough,
                roles_dont_match: false,
                failover_for: Some(FailoverSlot::Page),
            }
        );
    }

    #[test]
    fn test_dispatch_not_found_without_failover_renders_nothing() {
        let dispatcher = dispatcher(ResolverConfig::default());

        let instruction = dispatcher.dispatch("/missing").unwrap();

        assert!(instruction.is_none());
    }

    #[test]
    fn test_dispatch_unresolved_component_is_error() {
        let dispatcher = dispatcher(ResolverConfig::default());

        let err = dispatcher.dispatch("/broken").unwrap_err();

        assert!(matches!(&err, DispatchError::Unresolved { path, .. } if path == "/broken"));
        assert!(err.to_string().contains("/broken"));
    }

    #[test]
    fn test_dispatch_unresolved_does_not_affect_other_paths() {
        let dispatcher = dispatcher(ResolverConfig::default());

        assert!(dispatcher.dispatch("/broken").is_err());
        assert!(dispatcher.dispatch("/about").unwrap().is_some());
    }

    #[test]
    fn test_dispatch_role_mismatch_uses_denied_component() {
        let dispatcher = dispatcher(
            ResolverConfig::default()
                .with_roles(RoleSource::fixed(["user"]))
                .with_roles_dont_match_component("Denied"),
        );

        let instruction = dispatcher.dispatch("/admin").unwrap().unwrap();

        assert_eq!(instruction.resolution.component, "DeniedComponent");
        assert!(instruction.resolution.roles_dont_match);
    }

    #[test]
    fn test_dispatch_breadcrumbs_and_navigation() {
        let dispatcher = dispatcher(ResolverConfig::default());

        let instruction = dispatcher.dispatch("/about").unwrap().unwrap();

        let breadcrumbs = instruction.context.breadcrumbs();
        assert_eq!(breadcrumbs.len(), 1);
        assert_eq!(breadcrumbs[0].name, "Home");
        assert_eq!(instruction.context.navigation()[0].children.len(), 4);
    }

    #[test]
    fn test_replace_site_map_swaps_table() {
        let dispatcher = dispatcher(ResolverConfig::default());
        let before = dispatcher.table();

        dispatcher.replace_site_map(&[PageNode::new("Contact", "/contact")
            .with_component(ComponentRef::Direct("ContactComponent".to_owned()))]);

        assert_eq!(before.len(), 5);
        assert_eq!(dispatcher.table().len(), 1);
        assert!(dispatcher.dispatch("/about").unwrap().is_none());
        let instruction = dispatcher.dispatch("/contact").unwrap().unwrap();
        assert_eq!(instruction.resolution.component, "ContactComponent");
    }

    #[test]
    fn test_instruction_keeps_snapshot_after_replace() {
        let dispatcher = dispatcher(ResolverConfig::default());
        let instruction = dispatcher.dispatch("/about").unwrap().unwrap();

        dispatcher.replace_site_map(&[]);

        assert_eq!(instruction.context.page().map(|p| p.name.as_str()), Some("About"));
        assert!(dispatcher.table().is_empty());
    }

    #[test]
    fn test_replace_config_keeps_table() {
        let dispatcher = dispatcher(ResolverConfig::default());
        let table = dispatcher.table();

        dispatcher.replace_config(
            ResolverConfig::default()
                .with_components(components())
                .with_failover_component("NotFound"),
        );

        assert!(Arc::ptr_eq(&table, &dispatcher.table()));
        assert!(dispatcher.config().failover().is_some());
        assert!(dispatcher.dispatch("/missing").unwrap().is_some());
    }

    #[test]
    fn test_concurrent_dispatch_sees_complete_tables() {
        let dispatcher = dispatcher(ResolverConfig::default());
        let replacement = vec![
            PageNode::new("Home", "/")
                .with_component("Home")
                .with_items(vec![PageNode::new("About", "/about").with_component("About")]),
        ];

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let instruction = dispatcher.dispatch("/about").unwrap().unwrap();
                        let len = instruction.context.table().len();
                        assert!(len == 5 || len == 2, "unexpected table size {len}");
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..50 {
                    dispatcher.replace_site_map(&replacement);
                    dispatcher.replace_site_map(&site_map());
                }
            });
        });
    }
}
