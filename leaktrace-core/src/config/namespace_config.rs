//! Namespace classification configuration.

use serde::{Deserialize, Serialize};

/// Namespace prefixes the tracer treats specially.
///
/// Both lists hold prefixes matched against a type's namespace. The tracer's
/// own namespace is always excluded in addition to `excluded`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Objects whose runtime type lives here are neither visited nor expanded.
    pub excluded: Vec<String>,
    /// Slots declared by types living here are skipped with a diagnostic.
    pub restricted: Vec<String>,
}
