//! CLI command implementations.

pub(crate) mod nav;
pub(crate) mod resolve;
pub(crate) mod routes;

pub(crate) use nav::NavArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use routes::RoutesArgs;
