//! Slot access errors.

use super::error_code::{self, LeakTraceErrorCode};

/// A storage slot could not be read during traversal.
///
/// These are recoverable: the tracer records them in the run status and
/// keeps exploring the rest of the holder object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Cannot read {declaring_type}#{slot}: {reason}")]
    AccessDenied {
        declaring_type: String,
        slot: String,
        reason: String,
    },

    #[error("Cannot read {declaring_type}#{slot}: namespace '{namespace}' is restricted")]
    RestrictedNamespace {
        declaring_type: String,
        slot: String,
        namespace: String,
    },
}

impl AccessError {
    /// Fully qualified `<type>#<slot>` of the slot that failed.
    pub fn slot_path(&self) -> String {
        match self {
            Self::AccessDenied {
                declaring_type,
                slot,
                ..
            }
            | Self::RestrictedNamespace {
                declaring_type,
                slot,
                ..
            } => format!("{declaring_type}#{slot}"),
        }
    }
}

impl LeakTraceErrorCode for AccessError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => error_code::ACCESS_DENIED,
            Self::RestrictedNamespace { .. } => error_code::RESTRICTED_NAMESPACE,
        }
    }
}
