//! Fatal tracer errors.

use super::error_code::{self, LeakTraceErrorCode};
use super::ConfigError;

/// Caller misuse that stops a run before any object is visited.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Trace requires at least one root")]
    EmptyRoots,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LeakTraceErrorCode for TraceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoots => error_code::EMPTY_ROOTS,
            Self::Config(e) => e.error_code(),
        }
    }
}
