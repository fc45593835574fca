//! Configuration system for leaktrace.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod namespace_config;
pub mod trace_config;

pub use namespace_config::NamespaceConfig;
pub use trace_config::{ConfigOverrides, TraceConfig, CONFIG_FILE_NAME};
