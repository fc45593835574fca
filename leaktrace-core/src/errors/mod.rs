//! Error handling for leaktrace.
//! One error enum per subsystem, `thiserror` only.

pub mod access_error;
pub mod config_error;
pub mod error_code;
pub mod trace_error;

pub use access_error::AccessError;
pub use config_error::ConfigError;
pub use error_code::LeakTraceErrorCode;
pub use trace_error::TraceError;
