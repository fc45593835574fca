//! Run status: counters plus non-fatal access diagnostics.

use std::fmt;

use crate::errors::{AccessError, LeakTraceErrorCode};

/// A slot the tracer could not read. Traversal continued past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDiagnostic {
    /// `<declaring type>#<slot>` of the unreadable slot.
    pub slot_path: String,
    /// Runtime type of the object holding the slot, `None` for static slots.
    pub holder_type: Option<String>,
    pub error: AccessError,
}

impl AccessDiagnostic {
    pub fn new(holder_type: Option<String>, error: AccessError) -> Self {
        Self {
            slot_path: error.slot_path(),
            holder_type,
            error,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

impl fmt::Display for AccessDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.holder_type {
            Some(holder) => write!(f, "[{}] {} (in {})", self.error_code(), self.error, holder),
            None => write!(f, "[{}] {}", self.error_code(), self.error),
        }
    }
}

/// Outcome of one tracer run.
///
/// Accumulates non-fatal diagnostics so a single inaccessible slot never
/// hides the rest of the graph.
#[derive(Debug, Clone, Default)]
pub struct RunStatus {
    pub diagnostics: Vec<AccessDiagnostic>,
    /// Distinct objects visited (first visits).
    pub objects_visited: usize,
    /// Visitor calls for already-visited objects.
    pub repeat_visits: usize,
    /// Edges pushed onto the traversal queue (roots excluded).
    pub edges_enqueued: usize,
    /// Edges dropped because the object's type is in an excluded namespace.
    pub excluded_skipped: usize,
}

impl RunStatus {
    pub fn add_diagnostic(&mut self, diagnostic: AccessDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Returns true if no slot access failed.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }
}
