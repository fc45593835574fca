//! Stable string codes attached to every leaktrace error.

pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
pub const RESTRICTED_NAMESPACE: &str = "RESTRICTED_NAMESPACE";
pub const EMPTY_ROOTS: &str = "EMPTY_ROOTS";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

/// Maps an error to a machine-readable code for harnesses and log filters.
pub trait LeakTraceErrorCode {
    fn error_code(&self) -> &'static str;
}
