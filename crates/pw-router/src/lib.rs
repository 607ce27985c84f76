//! Component/layout resolution and request dispatch for pageway.
//!
//! This crate provides:
//! - [`ComponentRegistry`]: key to component lookup shared by all slots
//! - [`RoleSource`] and [`roles_dont_match`]: role-based access evaluation
//! - [`resolve`]: picks the component and layout for a matched page,
//!   applying role overrides and failover rules
//! - [`Dispatcher`]: owns the flattened page table and produces a
//!   [`RenderInstruction`] for every navigated path
//!
//! Rendering itself is left to the host: the dispatcher hands over already
//! resolved `(component, layout, context)` tuples.
//!
//! # Quick Start
//!
//! ```
//! use pw_router::{ComponentRegistry, Dispatcher, Layout, ResolverConfig, RoleSource};
//! use pw_sitemap::PageNode;
//!
//! let site_map = vec![
//!     PageNode::new("Home", "/")
//!         .with_component("Home")
//!         .with_items(vec![
//!             PageNode::new("Admin", "/admin")
//!                 .with_component("Admin")
//!                 .with_roles(["admin"]),
//!         ]),
//! ];
//!
//! let components = ComponentRegistry::new()
//!     .with("Home", "home")
//!     .with("Admin", "admin")
//!     .with("Denied", "denied")
//!     .with("Main", "main-layout");
//! let config = ResolverConfig::default()
//!     .with_components(components)
//!     .with_layout("Main")
//!     .with_roles(RoleSource::fixed(["user"]))
//!     .with_roles_dont_match_component("Denied");
//!
//! let dispatcher = Dispatcher::new(&site_map, config);
//! let instruction = dispatcher.dispatch("/admin")?.expect("route");
//!
//! assert_eq!(instruction.resolution.component, "denied");
//! assert_eq!(instruction.resolution.layout, Layout::Wrap("main-layout"));
//! assert!(instruction.resolution.roles_dont_match);
//! # Ok::<(), pw_router::DispatchError>(())
//! ```

mod dispatcher;
mod registry;
mod resolver;
mod roles;

pub use dispatcher::{DispatchError, Dispatcher, RenderContext, RenderInstruction};
pub use registry::ComponentRegistry;
pub use resolver::{
    FailoverSlot, Layout, ResolveError, Resolution, ResolverConfig, resolve,
};
pub use roles::{RoleProducer, RoleSource, roles_dont_match};
