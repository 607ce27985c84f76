//! Component and layout resolution.
//!
//! Given a matched [`FlatPage`] and a [`ResolverConfig`], decides which
//! component renders the page and which layout wraps it.
//!
//! # Rules
//!
//! - Roles are evaluated only for pages that declare required roles
//! - Component: role-mismatch override (when roles mismatch and configured),
//!   else the page component; an unresolved result falls back to the failover
//!   component, and without one resolution fails
//! - Layout: the first configured of role-mismatch layout (when roles
//!   mismatch), page layout, default layout; an unresolved candidate degrades
//!   to [`Layout::Passthrough`] instead of failing

use std::fmt;

use pw_sitemap::{ComponentRef, FlatPage};
use serde::Serialize;

use crate::registry::ComponentRegistry;
use crate::roles::{RoleSource, roles_dont_match};

/// Layout wrapping a rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "component", rename_all = "lowercase")]
pub enum Layout<C> {
    /// Render the page unwrapped.
    Passthrough,
    /// Wrap the page in this layout component.
    Wrap(C),
}

impl<C> Layout<C> {
    /// Wrapping component, `None` for the passthrough layout.
    #[must_use]
    pub fn component(&self) -> Option<&C> {
        match self {
            Self::Passthrough => None,
            Self::Wrap(component) => Some(component),
        }
    }
}

/// Slot for which a failover substitution happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailoverSlot {
    /// The page component was replaced by the failover component.
    Page,
    /// A configured layout could not be resolved and passthrough was used.
    Layout,
}

impl fmt::Display for FailoverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Page => "page",
            Self::Layout => "layout",
        })
    }
}

/// Outcome of resolving a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution<C> {
    /// Component rendering the page content.
    pub component: C,
    /// Layout wrapping the component.
    pub layout: Layout<C>,
    /// True when the page requires roles the current user lacks.
    pub roles_dont_match: bool,
    /// Slot that received a failover substitution, if any. A page failover
    /// takes precedence over a layout failover.
    pub failover_for: Option<FailoverSlot>,
}

/// Error returned when a page cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Neither the page, an override nor the failover yields a component.
    #[error("No component resolved for page {url:?} and no failover component configured")]
    UnresolvedComponent {
        /// Url of the page being resolved.
        url: String,
    },
}

/// Global resolution settings.
#[derive(Clone, Debug)]
pub struct ResolverConfig<C> {
    /// Registry used for key lookups.
    pub components: ComponentRegistry<C>,
    /// Default layout for pages without their own.
    pub layout: Option<ComponentRef<C>>,
    /// Component used when the page component cannot be resolved.
    pub failover_component: Option<ComponentRef<C>>,
    /// Roles held by the current user.
    pub roles: Option<RoleSource>,
    /// Component replacing the page component on role mismatch.
    pub roles_dont_match_component: Option<ComponentRef<C>>,
    /// Layout used on role mismatch.
    pub roles_dont_match_layout: Option<ComponentRef<C>>,
}

impl<C> Default for ResolverConfig<C> {
    fn default() -> Self {
        Self {
            components: ComponentRegistry::new(),
            layout: None,
            failover_component: None,
            roles: None,
            roles_dont_match_component: None,
            roles_dont_match_layout: None,
        }
    }
}

impl<C> ResolverConfig<C> {
    #[must_use]
    pub fn with_components(mut self, components: ComponentRegistry<C>) -> Self {
        self.components = components;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<ComponentRef<C>>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    #[must_use]
    pub fn with_failover_component(mut self, component: impl Into<ComponentRef<C>>) -> Self {
        self.failover_component = Some(component.into());
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: RoleSource) -> Self {
        self.roles = Some(roles);
        self
    }

    #[must_use]
    pub fn with_roles_dont_match_component(
        mut self,
        component: impl Into<ComponentRef<C>>,
    ) -> Self {
        self.roles_dont_match_component = Some(component.into());
        self
    }

    #[must_use]
    pub fn with_roles_dont_match_layout(mut self, layout: impl Into<ComponentRef<C>>) -> Self {
        self.roles_dont_match_layout = Some(layout.into());
        self
    }

    /// Resolved failover component, if one is configured and resolvable.
    #[must_use]
    pub fn failover(&self) -> Option<&C> {
        self.components.lookup(self.failover_component.as_ref())
    }
}

/// Resolve the component and layout for a page.
///
/// # Errors
///
/// Returns [`ResolveError::UnresolvedComponent`] when no component can be
/// resolved and no failover component is configured.
pub fn resolve<C: Clone>(
    page: &FlatPage<C>,
    config: &ResolverConfig<C>,
) -> Result<Resolution<C>, ResolveError> {
    let registry = &config.components;
    let roles_dont_match = roles_dont_match(&page.roles, config.roles.as_ref());

    let override_component = config
        .roles_dont_match_component
        .as_ref()
        .filter(|_| roles_dont_match);
    let component = registry.lookup(override_component.or(page.component.as_ref()));

    let mut failover_for = None;
    let component = match component {
        Some(component) => component.clone(),
        None => {
            let failover =
                config
                    .failover()
                    .ok_or_else(|| ResolveError::UnresolvedComponent {
                        url: page.url.clone(),
                    })?;
            failover_for = Some(FailoverSlot::Page);
            failover.clone()
        }
    };

    let layout_candidate = config
        .roles_dont_match_layout
        .as_ref()
        .filter(|_| roles_dont_match)
        .or(page.layout.as_ref())
        .or(config.layout.as_ref());
    let layout = match layout_candidate {
        None => Layout::Passthrough,
        Some(candidate) => match registry.lookup(Some(candidate)) {
            Some(layout) => Layout::Wrap(layout.clone()),
            None => {
                failover_for.get_or_insert(FailoverSlot::Layout);
                Layout::Passthrough
            }
        },
    };

    Ok(Resolution {
        component,
        layout,
        roles_dont_match,
        failover_for,
    })
}
