//! Role-based access evaluation.
//!
//! The current role set is injected through [`RoleSource`], either as a fixed
//! list or as a producer invoked on every evaluation. Producers are only
//! called for pages that actually require roles.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Synchronous producer of the current role set.
pub type RoleProducer = dyn Fn() -> Vec<String> + Send + Sync;

/// Source of the roles held by the current user.
#[derive(Clone)]
pub enum RoleSource {
    /// Fixed role set.
    Fixed(Vec<String>),
    /// Role set computed on demand.
    Dynamic(Arc<RoleProducer>),
}

impl RoleSource {
    /// Create a fixed role source.
    #[must_use]
    pub fn fixed<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(roles.into_iter().map(Into::into).collect())
    }

    /// Create a role source backed by a producer.
    #[must_use]
    pub fn dynamic(producer: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(producer))
    }

    /// Current role set. Invokes the producer for dynamic sources.
    #[must_use]
    pub fn current(&self) -> Cow<'_, [String]> {
        match self {
            Self::Fixed(roles) => Cow::Borrowed(roles),
            Self::Dynamic(producer) => Cow::Owned(producer()),
        }
    }
}

impl fmt::Debug for RoleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(roles) => f.debug_tuple("Fixed").field(roles).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Decide whether the current roles fail a page's role requirement.
///
/// A page without required roles is unrestricted and never mismatches, and
/// the source is not consulted. Otherwise the roles mismatch when the current
/// set shares no role with the required set.
#[must_use]
pub fn roles_dont_match(required: &[String], source: Option<&RoleSource>) -> bool {
    if required.is_empty() {
        return false;
    }
    let Some(source) = source else {
        return true;
    };
    !source.current().iter().any(|role| required.contains(role))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|r| (*r).to_owned()).collect()
    }

    #[test]
    fn test_disjoint_roles_dont_match() {
        let source = RoleSource::fixed(["user"]);

        assert!(roles_dont_match(&roles(&["admin"]), Some(&source)));
    }

    #[test]
    fn test_overlapping_roles_match() {
        let source = RoleSource::fixed(["admin", "user"]);

        assert!(!roles_dont_match(&roles(&["admin"]), Some(&source)));
    }

    #[test]
    fn test_unrestricted_page_always_matches() {
        let source = RoleSource::fixed(["user"]);

        assert!(!roles_dont_match(&[], Some(&source)));
        assert!(!roles_dont_match(&[], None));
    }

    #[test]
    fn test_missing_source_dont_match_restricted_page() {
        assert!(roles_dont_match(&roles(&["admin"]), None));
    }

    #[test]
    fn test_dynamic_source_evaluated_on_each_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = RoleSource::dynamic(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec!["admin".to_owned()]
        });

        assert!(!roles_dont_match(&roles(&["admin"]), Some(&source)));
        assert!(roles_dont_match(&roles(&["editor"]), Some(&source)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dynamic_source_not_called_for_unrestricted_page() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = RoleSource::dynamic(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });

        assert!(!roles_dont_match(&[], Some(&source)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_hides_producer() {
        let source = RoleSource::dynamic(Vec::new);

        assert_eq!(format!("{source:?}"), "Dynamic(..)");
    }
}
