use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::tempdir;

use super::common::{MockExtension, Widgets, test_catalog, write_module};
use crate::api::ApiFault;
use crate::config::ApiConfig;
use crate::extension::attributes::AttributeMap;
use crate::extension::catalog::ExtensionCatalog;
use crate::extension::error::ExtensionError;
use crate::extension::manager::{ExtensionManager, within_load_timeout};
use crate::extension::records::ActionExtension;
use crate::extension::traits::ExtensionDescriptor;
use crate::service::ResourceContext;

const TIMEOUT: Duration = Duration::from_secs(10);

fn manager_with(extensions: Vec<Arc<dyn ExtensionDescriptor>>) -> ExtensionManager {
    let mut manager = ExtensionManager::empty("");
    for extension in extensions {
        manager.add_extension(extension).unwrap();
    }
    manager
}

#[tokio::test]
async fn test_loading_is_sorted_and_deterministic() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "sprockets.toml", &["Sprockets"]);
    std::fs::write(dir.path().join("gadgets.json"), r#"{"exports": ["Gadgets"]}"#).unwrap();
    write_module(dir.path(), "widgets.toml", &["Widgets"]);

    let path = dir.path().to_string_lossy().into_owned();
    let catalog = test_catalog();

    let first = ExtensionManager::new(path.clone(), &catalog, TIMEOUT).await.unwrap();
    let second = ExtensionManager::new(path, &catalog, TIMEOUT).await.unwrap();

    assert_eq!(first.aliases(), ["gadgets", "sprockets", "widgets"]);
    assert_eq!(first.aliases(), second.aliases());
}

#[tokio::test]
async fn test_search_path_order_and_missing_directory() {
    let first = tempdir().expect("Failed to create temp directory");
    let second = tempdir().expect("Failed to create temp directory");
    write_module(first.path(), "widgets.toml", &["Widgets"]);
    write_module(second.path(), "gadgets.toml", &["Gadgets"]);

    let path = format!(
        "{}:/definitely/not/here:{}",
        first.path().display(),
        second.path().display()
    );
    let manager = ExtensionManager::new(path, &test_catalog(), TIMEOUT).await.unwrap();
    assert_eq!(manager.aliases(), ["widgets", "gadgets"]);
}

#[tokio::test]
async fn test_duplicate_alias_is_fatal() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "widgets.toml", &["Widgets"]);
    write_module(dir.path(), "widgetsagain.toml", &["Widgetsagain"]);

    let result = ExtensionManager::new(
        dir.path().to_string_lossy().into_owned(),
        &test_catalog(),
        TIMEOUT,
    )
    .await;

    match result {
        Err(ExtensionError::DuplicatedExtension { alias }) => assert_eq!(alias, "widgets"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("duplicate alias must not produce a manager"),
    }
}

#[tokio::test]
async fn test_bad_modules_are_skipped() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "widgets.toml", &["Widgets"]);
    // Exports the wrong class
    write_module(dir.path(), "gadgets.toml", &["Gizmo"]);
    // Exported but unknown to the catalog
    write_module(dir.path(), "unknown.toml", &["Unknown"]);
    // Not parseable
    std::fs::write(dir.path().join("broken.toml"), "exports = [").unwrap();
    // Private and non-module files
    write_module(dir.path(), "_private.toml", &["_private"]);
    std::fs::write(dir.path().join("README.md"), "# docs").unwrap();
    // Fails validation
    write_module(dir.path(), "nameless.toml", &["Nameless"]);

    let manager = ExtensionManager::new(
        dir.path().to_string_lossy().into_owned(),
        &test_catalog(),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(manager.aliases(), ["widgets"]);
    assert!(!manager.contains("nameless"));
}

#[test]
fn test_add_extension_rejects_empty_alias_silently() {
    let mut manager = ExtensionManager::empty("");
    manager
        .add_extension(Arc::new(MockExtension::new("")))
        .unwrap();
    assert!(manager.is_empty());

    manager
        .add_extension(Arc::new(MockExtension::new("a")))
        .unwrap();
    let err = manager
        .add_extension(Arc::new(MockExtension::new("a")))
        .unwrap_err();
    assert!(matches!(err, ExtensionError::DuplicatedExtension { .. }));
    assert_eq!(manager.len(), 1);
}

#[test]
fn test_dependent_extension_wins() {
    // `b` requires `a` but is registered first
    let b = MockExtension::new("b")
        .requiring(&["a"])
        .extending(json!({"vnfs": {"x": {"default": "from-b"}}}));
    let a = MockExtension::new("a").extending(json!({"vnfs": {"x": {"default": "from-a"}, "y": {}}}));
    let manager = manager_with(vec![Arc::new(b), Arc::new(a)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);

    assert_eq!(report.processed, ["a", "b"]);
    assert!(report.unprocessed.is_empty());
    assert_eq!(attr_map.attribute("vnfs", "x").unwrap()["default"], "from-b");
    assert!(attr_map.attribute("vnfs", "y").is_some());
}

#[test]
fn test_cycle_leaves_extensions_unprocessed() {
    let a = MockExtension::new("a")
        .requiring(&["b"])
        .extending(json!({"vnfs": {"from_a": {}}}));
    let b = MockExtension::new("b")
        .requiring(&["a"])
        .extending(json!({"vnfs": {"from_b": {}}}));
    let c = MockExtension::new("c").extending(json!({"vnfs": {"from_c": {}}}));
    let manager = manager_with(vec![Arc::new(a), Arc::new(b), Arc::new(c)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);

    assert_eq!(report.processed, ["c"]);
    assert_eq!(report.unprocessed, ["a", "b"]);
    assert!(attr_map.attribute("vnfs", "from_c").is_some());
    assert!(attr_map.attribute("vnfs", "from_a").is_none());
    assert!(attr_map.attribute("vnfs", "from_b").is_none());
}

#[test]
fn test_missing_requirement_is_unprocessed() {
    let a = MockExtension::new("a")
        .requiring(&["not-loaded"])
        .extending(json!({"vnfs": {"x": {}}}));
    let manager = manager_with(vec![Arc::new(a)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);
    assert!(report.processed.is_empty());
    assert_eq!(report.unprocessed, ["a"]);
    assert!(attr_map.is_empty());
}

#[test]
fn test_resource_only_extension_satisfies_requirements() {
    // `widgets` only declares descriptive accessors
    let b = MockExtension::new("b")
        .requiring(&["widgets"])
        .extending(json!({"vnfs": {"x": {}}}));
    let manager = manager_with(vec![Arc::new(b), Arc::new(Widgets)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);

    assert_eq!(report.processed, ["widgets", "b"]);
    assert!(report.unprocessed.is_empty());
    assert!(attr_map.attribute("vnfs", "x").is_some());
}

#[test]
fn test_opted_out_extension_does_not_satisfy_requirements() {
    let b = MockExtension::new("b")
        .requiring(&["plain"])
        .extending(json!({"vnfs": {"x": {}}}));
    // No extended attributes, so it opts out of the merge
    let plain = MockExtension::new("plain");
    let manager = manager_with(vec![Arc::new(b), Arc::new(plain)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);

    assert!(report.processed.is_empty());
    assert_eq!(report.unprocessed, ["b"]);
}

#[test]
fn test_failing_extension_still_counts_as_processed() {
    let a = MockExtension::new("a").failing();
    let b = MockExtension::new("b")
        .requiring(&["a"])
        .extending(json!({"vims": {"auth_url": {"allow_post": true}}}));
    let manager = manager_with(vec![Arc::new(a), Arc::new(b)]);

    let mut attr_map = AttributeMap::new();
    let report = manager.extend_resources("1.0", &mut attr_map);
    assert_eq!(report.processed, ["a", "b"]);
    assert!(attr_map.attribute("vims", "auth_url").is_some());
}

#[test]
fn test_update_hooks_run_once_with_final_map() {
    let a = MockExtension::new("a").extending(json!({"vnfs": {"x": {}}}));
    let b = MockExtension::new("b")
        .requiring(&["a"])
        .extending(json!({"vnfs": {"y": {}}}));
    // Takes no part in the merge
    let plain = MockExtension::new("plain");

    let a_updates = Arc::clone(&a.updates);
    let b_updates = Arc::clone(&b.updates);
    let plain_updates = Arc::clone(&plain.updates);
    let a_seen = Arc::clone(&a.seen);
    let manager = manager_with(vec![Arc::new(b), Arc::new(a), Arc::new(plain)]);

    let mut attr_map = AttributeMap::new();
    manager.extend_resources("1.0", &mut attr_map);

    assert_eq!(a_updates.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(b_updates.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(plain_updates.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(a_seen.lock().unwrap().as_ref(), Some(&attr_map));
}

#[test]
fn test_aggregation_keeps_load_order() {
    struct WithActions(&'static str);

    impl ExtensionDescriptor for WithActions {
        fn name(&self) -> &str {
            self.0
        }
        fn alias(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            ""
        }
        fn namespace(&self) -> &str {
            ""
        }
        fn updated(&self) -> &str {
            ""
        }
        fn actions(&self) -> Vec<ActionExtension> {
            vec![ActionExtension::new(
                "vnfs",
                self.0,
                Arc::new(
                    |_: &serde_json::Value, _: &crate::api::ApiRequest, _: &str| {
                        Err::<crate::api::ApiResponse, _>(ApiFault::Internal("unused".into()))
                    },
                ),
            )]
        }
    }

    let manager = Arc::new(manager_with(vec![
        Arc::new(WithActions("zeta")),
        Arc::new(WithActions("alpha")),
    ]));

    let names: Vec<String> = manager.get_actions().into_iter().map(|a| a.action_name).collect();
    assert_eq!(names, ["zeta", "alpha"]);

    let resources = manager.get_resources(&ResourceContext::default());
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].collection, "extensions");
    assert!(manager.get_request_extensions().is_empty());
}

#[tokio::test]
async fn test_get_instance_builds_once() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "widgets.toml", &["Widgets"]);
    let builtin = dir.path().to_string_lossy().into_owned();

    let first = ExtensionManager::get_instance(&ApiConfig::default(), &builtin, &test_catalog())
        .await
        .unwrap();
    let second = ExtensionManager::get_instance(&ApiConfig::default(), "/elsewhere", &ExtensionCatalog::new())
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.aliases(), ["widgets"]);
}

#[tokio::test]
async fn test_stalled_discovery_times_out() {
    let timeout = Duration::from_millis(20);
    let result = within_load_timeout(timeout, std::future::pending()).await;
    match result {
        Err(ExtensionError::LoadTimeout { timeout: reported }) => assert_eq!(reported, timeout),
        other => panic!("expected a load timeout, got {:?}", other),
    }

    let finished = within_load_timeout(timeout, async { Ok(()) }).await;
    assert!(finished.is_ok());

    let failed = within_load_timeout(timeout, async {
        Err(ExtensionError::DuplicatedExtension {
            alias: "a".to_string(),
        })
    })
    .await;
    assert!(matches!(failed, Err(ExtensionError::DuplicatedExtension { .. })));
}
