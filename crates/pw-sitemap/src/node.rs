//! Caller-authored sitemap tree.
//!
//! A sitemap is an ordered sequence of [`PageNode`]s, each of which may carry
//! nested sub-pages in `items`. Optional fields stay optional here; defaults
//! are applied when the tree is flattened.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a renderable component or layout.
///
/// Sitemaps may name components by registry key (useful for string-based
/// configuration) or hand over a reference supplied by the host framework.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentRef<C> {
    /// Key into the components registry.
    Key(String),
    /// Renderable reference used as-is.
    Direct(C),
}

impl<C> ComponentRef<C> {
    /// Create a registry key reference.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Registry key, if this is a key reference.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Direct(_) => None,
        }
    }
}

impl<C> From<&str> for ComponentRef<C> {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl<C> From<String> for ComponentRef<C> {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// A page declaration in the sitemap tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageNode<C> {
    /// Display name.
    pub name: String,
    /// Optional subtitle shown next to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Page url. Unique within its sibling scope.
    pub url: String,
    /// Path pattern overriding exact `url` matching (e.g. `/users/:id`).
    #[serde(
        default,
        alias = "urlMask",
        alias = "urlmask",
        skip_serializing_if = "Option::is_none"
    )]
    pub url_mask: Option<String>,
    /// Content component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef<C>>,
    /// Wrapping layout component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ComponentRef<C>>,
    /// Whether the page is shown in navigation menus (default: true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Roles required to access the page. Absent or empty means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Opaque payload passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Nested sub-pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PageNode<C>>>,
}

impl<C> PageNode<C> {
    /// Create a page with the given name and url and no other fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtitle: None,
            url: url.into(),
            url_mask: None,
            component: None,
            layout: None,
            visible: None,
            roles: None,
            options: None,
            items: None,
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_url_mask(mut self, mask: impl Into<String>) -> Self {
        self.url_mask = Some(mask.into());
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<ComponentRef<C>>) -> Self {
        self.component = Some(component.into());
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<ComponentRef<C>>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<PageNode<C>>) -> Self {
        self.items = Some(items);
        self
    }

    /// Number of nodes in this subtree, including the node itself.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self
            .items
            .iter()
            .flatten()
            .map(PageNode::count)
            .sum::<usize>()
    }
}
