//! Top-level tracer configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::NamespaceConfig;
use crate::errors::ConfigError;

/// Name of the project-level config file looked up by [`TraceConfig::load`].
pub const CONFIG_FILE_NAME: &str = "leaktrace.toml";

/// Tracer configuration.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`LEAKTRACE_*`)
/// 3. Project config (`leaktrace.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraceConfig {
    /// Do not follow the referent slot of weak/soft reference wrappers. Default: true.
    pub skip_weak_or_soft: Option<bool>,
    /// Initial bucket count of the visited set. Default: 1024.
    pub initial_set_capacity: Option<usize>,
    /// Initial slot count of the traversal queue. Default: 256.
    pub initial_queue_capacity: Option<usize>,
    /// Maximum characters of a value description in reports. Default: 100.
    pub report_value_max_len: Option<usize>,
    pub namespaces: NamespaceConfig,
}

/// Programmatic overrides, usually coming from a harness' own flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub skip_weak_or_soft: Option<bool>,
    pub report_value_max_len: Option<usize>,
    pub extra_excluded: Vec<String>,
}

impl TraceConfig {
    /// Returns the effective weak/soft skipping flag, defaulting to true.
    pub fn effective_skip_weak_or_soft(&self) -> bool {
        self.skip_weak_or_soft.unwrap_or(true)
    }

    /// Returns the effective initial visited-set capacity, defaulting to 1024.
    pub fn effective_initial_set_capacity(&self) -> usize {
        self.initial_set_capacity.unwrap_or(1024)
    }

    /// Returns the effective initial queue capacity, defaulting to 256.
    pub fn effective_initial_queue_capacity(&self) -> usize {
        self.initial_queue_capacity.unwrap_or(256)
    }

    /// Returns the effective report truncation length, defaulting to 100.
    pub fn effective_report_value_max_len(&self) -> usize {
        self.report_value_max_len.unwrap_or(100)
    }

    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: TraceConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &TraceConfig) -> Result<(), ConfigError> {
        let positive = [
            ("initial_set_capacity", config.initial_set_capacity),
            ("initial_queue_capacity", config.initial_queue_capacity),
            ("report_value_max_len", config.report_value_max_len),
        ];
        for (field, value) in positive {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        let prefixes = config
            .namespaces
            .excluded
            .iter()
            .chain(&config.namespaces.restricted);
        for prefix in prefixes {
            if prefix.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "namespaces".to_string(),
                    message: "namespace prefixes must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut TraceConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TraceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut TraceConfig, other: &TraceConfig) {
        if other.skip_weak_or_soft.is_some() {
            base.skip_weak_or_soft = other.skip_weak_or_soft;
        }
        if other.initial_set_capacity.is_some() {
            base.initial_set_capacity = other.initial_set_capacity;
        }
        if other.initial_queue_capacity.is_some() {
            base.initial_queue_capacity = other.initial_queue_capacity;
        }
        if other.report_value_max_len.is_some() {
            base.report_value_max_len = other.report_value_max_len;
        }
        if !other.namespaces.excluded.is_empty() {
            base.namespaces.excluded = other.namespaces.excluded.clone();
        }
        if !other.namespaces.restricted.is_empty() {
            base.namespaces.restricted = other.namespaces.restricted.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `LEAKTRACE_SKIP_WEAK_OR_SOFT`, `LEAKTRACE_EXCLUDED_NAMESPACES`, etc.
    fn apply_env_overrides(config: &mut TraceConfig) {
        if let Ok(val) = std::env::var("LEAKTRACE_SKIP_WEAK_OR_SOFT") {
            if let Ok(v) = val.parse::<bool>() {
                config.skip_weak_or_soft = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEAKTRACE_INITIAL_SET_CAPACITY") {
            if let Ok(v) = val.parse::<usize>() {
                config.initial_set_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEAKTRACE_INITIAL_QUEUE_CAPACITY") {
            if let Ok(v) = val.parse::<usize>() {
                config.initial_queue_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEAKTRACE_REPORT_VALUE_MAX_LEN") {
            if let Ok(v) = val.parse::<usize>() {
                config.report_value_max_len = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEAKTRACE_EXCLUDED_NAMESPACES") {
            let prefixes = split_list(&val);
            if !prefixes.is_empty() {
                config.namespaces.excluded = prefixes;
            }
        }
        if let Ok(val) = std::env::var("LEAKTRACE_RESTRICTED_NAMESPACES") {
            let prefixes = split_list(&val);
            if !prefixes.is_empty() {
                config.namespaces.restricted = prefixes;
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut TraceConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.skip_weak_or_soft {
            config.skip_weak_or_soft = Some(v);
        }
        if let Some(v) = overrides.report_value_max_len {
            config.report_value_max_len = Some(v);
        }
        for prefix in &overrides.extra_excluded {
            if !config.namespaces.excluded.contains(prefix) {
                config.namespaces.excluded.push(prefix.clone());
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config = TraceConfig::default();
        assert!(config.effective_skip_weak_or_soft());
        assert_eq!(config.effective_initial_set_capacity(), 1024);
        assert_eq!(config.effective_initial_queue_capacity(), 256);
        assert_eq!(config.effective_report_value_max_len(), 100);
    }

    #[test]
    fn from_toml_reads_namespaces() {
        let config = TraceConfig::from_toml(
            r#"
skip_weak_or_soft = false

[namespaces]
excluded = ["jdk.internal"]
restricted = ["sun."]
"#,
        )
        .unwrap();
        assert!(!config.effective_skip_weak_or_soft());
        assert_eq!(config.namespaces.excluded, vec!["jdk.internal".to_string()]);
        assert_eq!(config.namespaces.restricted, vec!["sun.".to_string()]);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = TraceConfig::from_toml("initial_queue_capacity = 0").unwrap_err();
        match err {
            ConfigError::ValidationFailed { field, .. } => {
                assert_eq!(field, "initial_queue_capacity")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_prefix_is_rejected() {
        let err = TraceConfig::from_toml("[namespaces]\nexcluded = [\"  \"]").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn toml_roundtrip_keeps_values() {
        let config = TraceConfig {
            report_value_max_len: Some(40),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        let back = TraceConfig::from_toml(&text).unwrap();
        assert_eq!(back.report_value_max_len, Some(40));
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list(" a, ,b ,"),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
