//! Sitemap flattening and page lookup for pageway.
//!
//! This crate provides:
//! - [`PageNode`]: the caller-authored, hierarchical sitemap declaration
//! - [`flatten`]: pre-order flattening into [`FlatPage`] records with level
//!   and parent linkage
//! - [`find_page`]: first-match page lookup by navigated path
//! - [`PageTable`]: the immutable routing table with compiled url masks,
//!   navigation menu and breadcrumb building
//!
//! The component type `C` is chosen by the host: any renderable reference
//! works, as long as it can be cloned.
//!
//! # Quick Start
//!
//! ```
//! use pw_sitemap::{PageNode, PageTable};
//!
//! let site_map: Vec<PageNode<String>> = vec![
//!     PageNode::new("Home", "/")
//!         .with_component("Home")
//!         .with_items(vec![PageNode::new("About", "/about").with_component("About")]),
//! ];
//!
//! let table = PageTable::new(&site_map);
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.find("/about").map(|page| page.level), Some(2));
//! ```

mod flatten;
mod lookup;
mod node;
mod pattern;
mod table;

pub use flatten::{FlatPage, ParentRef, flatten};
pub use lookup::{PARAM_DELIMITER, find_page, url_matches};
pub use node::{ComponentRef, PageNode};
pub use pattern::{Params, SPLAT_KEY, UrlPattern};
pub use table::{BreadcrumbItem, NavItem, PageMatch, PageTable};
