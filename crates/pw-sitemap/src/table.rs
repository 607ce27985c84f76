//! Flattened page table.
//!
//! Provides [`PageTable`], the immutable routing table built from a sitemap.
//! Pages are stored in flattened (pre-order) order with parent/children
//! relationships tracked by indices, so consumers can rebuild the hierarchy
//! for menus and breadcrumbs without flattening again.
//!
//! # Architecture
//!
//! - Url masks are compiled once at construction
//! - Lookups scan pages in order (first match wins)
//! - O(d) breadcrumb building where d is the page depth

use serde::Serialize;

use crate::flatten::{FlatPage, flatten_indexed};
use crate::lookup::match_page;
use crate::node::PageNode;
use crate::pattern::{Params, UrlPattern};

/// Navigation menu item with children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display name.
    pub name: String,
    /// Subtitle shown next to the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Link target.
    pub url: String,
    /// Depth in the sitemap.
    pub level: usize,
    /// Visible child items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display name.
    pub name: String,
    /// Link target.
    pub url: String,
}

/// A page matched against a navigated path.
#[derive(Debug)]
pub struct PageMatch<'a, C> {
    /// Index of the page in the table.
    pub index: usize,
    /// The matched page.
    pub page: &'a FlatPage<C>,
    /// Parameters captured by the page's url mask.
    pub params: Params,
}

/// Immutable flattened routing table.
///
/// Built once per sitemap and never mutated; a changed sitemap produces a new
/// table.
#[derive(Debug)]
pub struct PageTable<C> {
    pages: Vec<FlatPage<C>>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    patterns: Vec<Option<UrlPattern>>,
}

impl<C> Default for PageTable<C> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
            patterns: Vec::new(),
        }
    }
}

impl<C: Clone> PageTable<C> {
    /// Flatten a sitemap and index the result.
    #[must_use]
    pub fn new(site_map: &[PageNode<C>]) -> Self {
        let flattened = flatten_indexed(site_map);

        let mut children = vec![Vec::new(); flattened.pages.len()];
        let mut roots = Vec::new();
        for (idx, parent) in flattened.parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(idx),
                None => roots.push(idx),
            }
        }

        let patterns = flattened
            .pages
            .iter()
            .map(|page| page.mask().map(UrlPattern::parse))
            .collect();

        tracing::debug!(
            pages = flattened.pages.len(),
            roots = roots.len(),
            "Built page table"
        );

        Self {
            pages: flattened.pages,
            parents: flattened.parents,
            children,
            roots,
            patterns,
        }
    }
}

impl<C> PageTable<C> {
    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in flattened order.
    #[must_use]
    pub fn pages(&self) -> &[FlatPage<C>] {
        &self.pages
    }

    /// Page at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FlatPage<C>> {
        self.pages.get(index)
    }

    /// Top-level pages in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &FlatPage<C>> {
        self.roots.iter().map(|&i| &self.pages[i])
    }

    /// Direct children of the page at `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &FlatPage<C>> {
        self.children
            .get(index)
            .into_iter()
            .flatten()
            .map(|&i| &self.pages[i])
    }

    /// Parent of the page at `index`.
    #[must_use]
    pub fn parent(&self, index: usize) -> Option<&FlatPage<C>> {
        self.parents
            .get(index)
            .copied()
            .flatten()
            .map(|i| &self.pages[i])
    }

    /// Find the first page matching `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FlatPage<C>> {
        self.match_path(path).map(|matched| matched.page)
    }

    /// Find the first page matching `path` with its index and mask parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<PageMatch<'_, C>> {
        self.pages
            .iter()
            .zip(&self.patterns)
            .enumerate()
            .find_map(|(index, (page, pattern))| {
                match_page(page, pattern.as_ref(), path).map(|params| PageMatch {
                    index,
                    page,
                    params,
                })
            })
    }

    /// Build the navigation menu.
    ///
    /// Hidden pages are left out together with their subtrees.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.roots
            .iter()
            .filter_map(|&idx| self.build_nav_item(idx))
            .collect()
    }

    fn build_nav_item(&self, idx: usize) -> Option<NavItem> {
        let page = &self.pages[idx];
        if !page.visible {
            return None;
        }

        let children = self.children[idx]
            .iter()
            .filter_map(|&child| self.build_nav_item(child))
            .collect();

        Some(NavItem {
            name: page.name.clone(),
            subtitle: page.subtitle.clone(),
            url: page.url.clone(),
            level: page.level,
            children,
        })
    }

    /// Build breadcrumbs for the page matching `path`.
    ///
    /// Returns the ancestors root-first; the matched page itself is not
    /// included. Unknown paths yield no breadcrumbs.
    #[must_use]
    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbItem> {
        let Some(matched) = self.match_path(path) else {
            return Vec::new();
        };

        let mut breadcrumbs = Vec::new();
        let mut current = self.parents[matched.index];
        while let Some(i) = current {
            let page = &self.pages[i];
            breadcrumbs.push(BreadcrumbItem {
                name: page.name.clone(),
                url: page.url.clone(),
            });
            current = self.parents[i];
        }

        breadcrumbs.reverse();
        breadcrumbs
    }
}
