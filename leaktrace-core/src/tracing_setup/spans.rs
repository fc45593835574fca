//! Span definitions for tracer operations.

/// Create the span wrapping one tracer run.
#[macro_export]
macro_rules! trace_run_span {
    ($roots:expr, $skip_weak_or_soft:expr) => {
        tracing::debug_span!(
            "leaktrace.run",
            roots = $roots,
            skip_weak_or_soft = $skip_weak_or_soft
        )
    };
}

/// Create the span wrapping an instance-count check.
#[macro_export]
macro_rules! leak_check_span {
    ($expectations:expr) => {
        tracing::debug_span!("leaktrace.leak_check", expectations = $expectations)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RUN: &str = "leaktrace.run";
    pub const LEAK_CHECK: &str = "leaktrace.leak_check";
}
