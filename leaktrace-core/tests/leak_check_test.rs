//! Instance-count checks against the editor leak fixture.

use leaktrace_core::config::{NamespaceConfig, TraceConfig};
use leaktrace_core::errors::TraceError;
use leaktrace_core::leak_check::{check_instance_counts, InstanceExpectation};
use test_fixtures::load_heap;

#[test]
fn test_leaked_editor_is_reported_with_backlinks() {
    let loaded = load_heap("editor_leak.json");
    let expectations = [
        InstanceExpectation::new("ui.Editor", 0),
        InstanceExpectation::new("ui.Document", 1),
        InstanceExpectation::new("ui.Listener", 1).including_subtypes(),
    ];

    let outcome = check_instance_counts(
        &loaded.heap,
        &loaded.roots,
        &expectations,
        &TraceConfig::default(),
    )
    .unwrap();

    assert!(!outcome.is_ok());
    assert_eq!(outcome.mismatches.len(), 1);
    let mismatch = &outcome.mismatches[0];
    assert_eq!(mismatch.type_name, "ui.Editor");
    assert_eq!(mismatch.expected, 0);
    assert_eq!(mismatch.actual, 1);

    let expected_report = "\
1 instance of ui.Editor:
- 0: Editor(closed)
    ui.Listener[1] = Editor(closed)
    app.Registry#listeners = ui.Listener[]@3
    app.Workbench#registry = Registry
    app.Workbench = Workbench
";
    assert_eq!(mismatch.report, expected_report);

    let message = outcome.failure_message();
    assert!(message.starts_with("Expected 0 instance(s) of ui.Editor, found 1\n"));
    assert!(message.ends_with(expected_report));
}

#[test]
fn test_weakly_cached_editor_counts_only_when_weak_refs_followed() {
    let loaded = load_heap("editor_leak.json");
    let expectations = [InstanceExpectation::new("ui.Editor", 1)];

    let skipping = TraceConfig::default();
    let outcome =
        check_instance_counts(&loaded.heap, &loaded.roots, &expectations, &skipping).unwrap();
    assert!(outcome.is_ok(), "{}", outcome.failure_message());
    assert!(outcome.failure_message().is_empty());

    let following = TraceConfig::from_toml("skip_weak_or_soft = false").unwrap();
    let outcome =
        check_instance_counts(&loaded.heap, &loaded.roots, &expectations, &following).unwrap();
    assert_eq!(outcome.mismatches.len(), 1);
    assert_eq!(outcome.mismatches[0].actual, 2);
    assert!(outcome.mismatches[0]
        .report
        .contains("lang.ref.WeakReference#referent = Editor(cached)"));
}

#[test]
fn test_outcome_carries_run_status() {
    let loaded = load_heap("editor_leak.json");
    let outcome = check_instance_counts(
        &loaded.heap,
        &loaded.roots,
        &[InstanceExpectation::new("lang.String", 1)],
        &TraceConfig::default(),
    )
    .unwrap();

    assert!(outcome.is_ok());
    assert!(outcome.status.is_clean());
    // workbench, registry, listeners, editor, weak ref, document, string
    assert_eq!(outcome.status.objects_visited, 7);
}

#[test]
fn test_empty_roots_propagate() {
    let loaded = load_heap("editor_leak.json");
    let result = check_instance_counts(
        &loaded.heap,
        &[],
        &[InstanceExpectation::new("ui.Editor", 0)],
        &TraceConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_dropping_the_registry_link_fixes_the_leak() {
    let mut loaded = load_heap("editor_leak.json");
    let registry = loaded.object("registry");
    let registry_ty = loaded.type_ref("app.Registry");
    loaded.heap.clear_slot(registry, &registry_ty, "listeners");

    let outcome = check_instance_counts(
        &loaded.heap,
        &loaded.roots,
        &[
            InstanceExpectation::new("ui.Editor", 0),
            InstanceExpectation::new("ui.Document", 0),
        ],
        &TraceConfig::default(),
    )
    .unwrap();

    assert!(outcome.is_ok(), "{}", outcome.failure_message());
}

#[test]
fn test_blank_excluded_prefix_cannot_pass_silently() {
    let loaded = load_heap("editor_leak.json");
    let config = TraceConfig {
        namespaces: NamespaceConfig {
            excluded: vec![String::new()],
            restricted: Vec::new(),
        },
        ..Default::default()
    };
    let result = check_instance_counts(
        &loaded.heap,
        &loaded.roots,
        &[InstanceExpectation::new("ui.Editor", 0)],
        &config,
    );
    assert!(matches!(result, Err(TraceError::Config(_))));
}
