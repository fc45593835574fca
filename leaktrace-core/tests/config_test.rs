//! Tests for layered tracer configuration.

use std::sync::Mutex;

use leaktrace_core::config::{ConfigOverrides, TraceConfig, CONFIG_FILE_NAME};
use leaktrace_core::errors::{ConfigError, LeakTraceErrorCode};

/// Serializes tests that touch `LEAKTRACE_*` environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_leaktrace_env_vars() {
    for key in [
        "LEAKTRACE_SKIP_WEAK_OR_SOFT",
        "LEAKTRACE_INITIAL_SET_CAPACITY",
        "LEAKTRACE_INITIAL_QUEUE_CAPACITY",
        "LEAKTRACE_REPORT_VALUE_MAX_LEN",
        "LEAKTRACE_EXCLUDED_NAMESPACES",
        "LEAKTRACE_RESTRICTED_NAMESPACES",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_three_layer_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_leaktrace_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"
skip_weak_or_soft = false
initial_set_capacity = 64
report_value_max_len = 20

[namespaces]
excluded = ["jdk.internal"]
"#,
    )
    .unwrap();

    std::env::set_var("LEAKTRACE_INITIAL_SET_CAPACITY", "4096");
    std::env::set_var("LEAKTRACE_REPORT_VALUE_MAX_LEN", "50");

    let overrides = ConfigOverrides {
        report_value_max_len: Some(80),
        extra_excluded: vec!["sys.reflect".to_string()],
        ..Default::default()
    };
    let config = TraceConfig::load(dir.path(), Some(&overrides)).unwrap();

    // file only
    assert!(!config.effective_skip_weak_or_soft());
    // env beats file
    assert_eq!(config.effective_initial_set_capacity(), 4096);
    // overrides beat env
    assert_eq!(config.effective_report_value_max_len(), 80);
    assert_eq!(
        config.namespaces.excluded,
        vec!["jdk.internal".to_string(), "sys.reflect".to_string()]
    );
    // untouched everywhere
    assert_eq!(config.effective_initial_queue_capacity(), 256);

    clear_leaktrace_env_vars();
}

#[test]
fn test_load_without_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_leaktrace_env_vars();

    let dir = tempdir();
    let config = TraceConfig::load(dir.path(), None).unwrap();

    assert!(config.effective_skip_weak_or_soft());
    assert_eq!(config.effective_initial_set_capacity(), 1024);
    assert_eq!(config.effective_initial_queue_capacity(), 256);
    assert_eq!(config.effective_report_value_max_len(), 100);
    assert!(config.namespaces.excluded.is_empty());
    assert!(config.namespaces.restricted.is_empty());
}

#[test]
fn test_env_namespace_lists_are_comma_separated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_leaktrace_env_vars();

    std::env::set_var("LEAKTRACE_RESTRICTED_NAMESPACES", "sun., jdk.internal ,");
    std::env::set_var("LEAKTRACE_SKIP_WEAK_OR_SOFT", "not-a-bool");

    let dir = tempdir();
    let config = TraceConfig::load(dir.path(), None).unwrap();

    assert_eq!(
        config.namespaces.restricted,
        vec!["sun.".to_string(), "jdk.internal".to_string()]
    );
    // unparseable values are ignored
    assert!(config.effective_skip_weak_or_soft());

    clear_leaktrace_env_vars();
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_leaktrace_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "skip_weak_or_soft = [[").unwrap();

    let err = TraceConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_env_zero_capacity_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_leaktrace_env_vars();

    std::env::set_var("LEAKTRACE_INITIAL_QUEUE_CAPACITY", "0");
    let dir = tempdir();
    let err = TraceConfig::load(dir.path(), None).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "initial_queue_capacity"),
        other => panic!("unexpected error: {other}"),
    }

    clear_leaktrace_env_vars();
}
