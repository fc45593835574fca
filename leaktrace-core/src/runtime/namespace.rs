//! Namespace classification.

use crate::config::NamespaceConfig;

/// Namespace of the tracer's own types. It and its sub-namespaces are
/// always excluded from traversal.
pub const TRACER_NAMESPACE: &str = "leaktrace";

/// How the tracer treats a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceClass {
    /// Ordinary namespace, fully traversed.
    Normal,
    /// Objects of types declared here are never visited.
    Excluded,
    /// Slots declared by types here are never read.
    Restricted,
}

/// Prefix-based namespace classifier built from [`NamespaceConfig`].
#[derive(Debug, Clone, Default)]
pub struct NamespaceFilter {
    excluded: Vec<String>,
    restricted: Vec<String>,
}

impl NamespaceFilter {
    pub fn new(config: &NamespaceConfig) -> Self {
        Self {
            excluded: config.excluded.clone(),
            restricted: config.restricted.clone(),
        }
    }

    pub fn classify(&self, namespace: &str) -> NamespaceClass {
        if self.is_excluded(namespace) {
            NamespaceClass::Excluded
        } else if self.is_restricted(namespace) {
            NamespaceClass::Restricted
        } else {
            NamespaceClass::Normal
        }
    }

    #[inline]
    pub fn is_excluded(&self, namespace: &str) -> bool {
        is_tracer_namespace(namespace) || has_prefix(&self.excluded, namespace)
    }

    #[inline]
    pub fn is_restricted(&self, namespace: &str) -> bool {
        has_prefix(&self.restricted, namespace)
    }

    /// Matching restricted prefix for `namespace`, if any.
    pub fn restricted_prefix(&self, namespace: &str) -> Option<&str> {
        self.restricted
            .iter()
            .find(|p| namespace.starts_with(p.as_str()))
            .map(String::as_str)
    }
}

/// `leaktrace` itself or a dotted sub-namespace such as `leaktrace.core`.
fn is_tracer_namespace(namespace: &str) -> bool {
    match namespace.strip_prefix(TRACER_NAMESPACE) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

fn has_prefix(prefixes: &[String], namespace: &str) -> bool {
    prefixes.iter().any(|p| namespace.starts_with(p.as_str()))
}
