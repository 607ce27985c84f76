//! Sitemap flattening.
//!
//! Converts the caller's page tree into an ordered flat list. The walk is
//! pre-order: a page always precedes its descendants and sibling order is
//! preserved. Each record carries its depth (`level`, 1 for top-level pages)
//! and a value summary of its immediate ancestor rather than a reference to
//! it, so records never form back-edges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{ComponentRef, PageNode};

/// Summary of a page's immediate ancestor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    /// Ancestor display name.
    pub name: String,
    /// Ancestor url.
    pub url: String,
    /// Ancestor url mask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_mask: Option<String>,
}

/// A flattened page record with defaults applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatPage<C> {
    /// Immediate ancestor, `None` for top-level pages.
    pub parent: Option<ParentRef>,
    /// Depth in the tree: `1 + number of ancestors`.
    pub level: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef<C>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ComponentRef<C>>,
    pub visible: bool,
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Declared sub-pages, cloned from the source node.
    ///
    /// Each record owns a copy of its whole subtree, so total size grows with
    /// depth times subtree size. Use [`PageTable::children`](crate::PageTable::children)
    /// to walk the hierarchy without these copies.
    pub items: Vec<PageNode<C>>,
}

impl<C: Clone> FlatPage<C> {
    fn from_node(node: &PageNode<C>, level: usize, parent: Option<ParentRef>) -> Self {
        Self {
            parent,
            level,
            name: node.name.clone(),
            subtitle: node.subtitle.clone(),
            url: node.url.clone(),
            url_mask: node.url_mask.clone(),
            component: node.component.clone(),
            layout: node.layout.clone(),
            visible: node.visible.unwrap_or(true),
            roles: node.roles.clone().unwrap_or_default(),
            options: node.options.clone(),
            items: node.items.clone().unwrap_or_default(),
        }
    }
}

impl<C> FlatPage<C> {
    /// Summary used as the `parent` of this page's children.
    #[must_use]
    pub fn summary(&self) -> ParentRef {
        ParentRef {
            name: self.name.clone(),
            url: self.url.clone(),
            url_mask: self.url_mask.clone(),
        }
    }

    /// Non-empty url mask, if any.
    #[must_use]
    pub fn mask(&self) -> Option<&str> {
        self.url_mask.as_deref().filter(|mask| !mask.is_empty())
    }

    /// True if access to the page is restricted to a role set.
    #[must_use]
    pub fn requires_roles(&self) -> bool {
        !self.roles.is_empty()
    }
}

/// Flattened pages together with parent indices.
pub(crate) struct Flattened<C> {
    pub(crate) pages: Vec<FlatPage<C>>,
    pub(crate) parents: Vec<Option<usize>>,
}

/// Flatten a sitemap into pre-order page records.
///
/// The output length equals the number of nodes in the tree and its order is
/// a strict function of the input order.
#[must_use]
pub fn flatten<C: Clone>(site_map: &[PageNode<C>]) -> Vec<FlatPage<C>> {
    flatten_indexed(site_map).pages
}

pub(crate) fn flatten_indexed<C: Clone>(site_map: &[PageNode<C>]) -> Flattened<C> {
    let mut out = Flattened {
        pages: Vec::new(),
        parents: Vec::new(),
    };
    add_level(&mut out, 1, None, site_map);
    out
}

fn add_level<C: Clone>(
    out: &mut Flattened<C>,
    level: usize,
    parent: Option<usize>,
    nodes: &[PageNode<C>],
) {
    for node in nodes {
        let parent_ref = parent.map(|idx| out.pages[idx].summary());
        let idx = out.pages.len();
        out.pages.push(FlatPage::from_node(node, level, parent_ref));
        out.parents.push(parent);

        if let Some(items) = &node.items {
            add_level(out, level + 1, Some(idx), items);
        }
    }
}
