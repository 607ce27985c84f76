//! Registry of renderable components.
//!
//! Maps string keys to component references so sitemaps can name components
//! indirectly. [`ComponentRegistry::lookup`] is the single place where a
//! [`ComponentRef`] is turned into a concrete component.

use std::collections::HashMap;

use pw_sitemap::ComponentRef;

/// Registry mapping keys to components.
#[derive(Clone, Debug)]
pub struct ComponentRegistry<C> {
    components: HashMap<String, C>,
}

impl<C> Default for ComponentRegistry<C> {
    fn default() -> Self {
        Self {
            components: HashMap::new(),
        }
    }
}

impl<C> ComponentRegistry<C> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `key`, returning the one it replaced.
    pub fn register(&mut self, key: impl Into<String>, component: C) -> Option<C> {
        let key = key.into();
        let previous = self.components.insert(key.clone(), component);
        if previous.is_some() {
            tracing::warn!(key = %key, "Component key registered twice, keeping the latest");
        }
        previous
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, component: C) -> Self {
        self.register(key, component);
        self
    }

    /// Component registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&C> {
        self.components.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Resolve a component reference.
    ///
    /// Keys are looked up in the registry, direct references pass through
    /// unchanged, and a missing reference or unknown key yields `None`.
    #[must_use]
    pub fn lookup<'a>(&'a self, reference: Option<&'a ComponentRef<C>>) -> Option<&'a C> {
        match reference? {
            ComponentRef::Key(key) => self.components.get(key),
            ComponentRef::Direct(component) => Some(component),
        }
    }
}

impl<C, K: Into<String>> FromIterator<(K, C)> for ComponentRegistry<C> {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (key, component) in iter {
            registry.register(key, component);
        }
        registry
    }
}
