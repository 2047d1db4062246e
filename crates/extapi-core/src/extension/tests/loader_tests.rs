use std::path::Path;

use tempfile::tempdir;

use super::common::{test_catalog, write_module};
use crate::config::ConfigFormat;
use crate::extension::error::ExtensionError;
use crate::extension::loader::{ExtensionLoader, ModuleFile, expected_class_name, split_search_path};
use crate::extension::traits::ExtensionDescriptor;

#[test]
fn test_expected_class_name() {
    assert_eq!(expected_class_name("widgets"), "Widgets");
    assert_eq!(expected_class_name("vnfm"), "Vnfm");
    assert_eq!(expected_class_name("Already"), "Already");
    assert_eq!(expected_class_name(""), "");
}

#[test]
fn test_module_file_classification() {
    let module = ModuleFile::from_path(Path::new("/ext/widgets.toml")).unwrap();
    assert_eq!(module.module_name, "widgets");
    assert_eq!(module.format, ConfigFormat::Toml);
    assert_eq!(module.class_name(), "Widgets");

    assert!(ModuleFile::from_path(Path::new("/ext/widgets.JSON")).is_some());
    assert!(ModuleFile::from_path(Path::new("/ext/_hidden.toml")).is_none());
    assert!(ModuleFile::from_path(Path::new("/ext/notes.txt")).is_none());
    assert!(ModuleFile::from_path(Path::new("/ext/noext")).is_none());
}

#[test]
fn test_split_search_path_drops_empty_entries() {
    let dirs = split_search_path("/a::/b:");
    assert_eq!(dirs, vec![Path::new("/a").to_path_buf(), Path::new("/b").to_path_buf()]);
}

#[tokio::test]
async fn test_discover_sorts_entries_and_skips_directories() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "b.toml", &["B"]);
    std::fs::write(dir.path().join("a.yaml"), "exports:\n  - A\n").unwrap();
    std::fs::create_dir(dir.path().join("c.toml")).unwrap();

    let catalog = test_catalog();
    let loader = ExtensionLoader::new(&catalog);
    let modules = loader.discover(&dir.path().to_string_lossy()).await;
    let names: Vec<&str> = modules.iter().map(|m| m.module_name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);

    let manifest = loader.read_module(&modules[0]).await.unwrap();
    assert_eq!(manifest.exports, ["A"]);
}

#[tokio::test]
async fn test_load_errors() {
    let dir = tempdir().expect("Failed to create temp directory");
    write_module(dir.path(), "gadgets.toml", &["Other"]);
    write_module(dir.path(), "mystery.toml", &["Mystery"]);
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    let catalog = test_catalog();
    let loader = ExtensionLoader::new(&catalog);
    let load = |name: &str| ModuleFile::from_path(&dir.path().join(name)).unwrap();

    assert!(matches!(
        loader.load(&load("gadgets.toml")).await,
        Err(ExtensionError::ClassNotExported { .. })
    ));
    assert!(matches!(
        loader.load(&load("mystery.toml")).await,
        Err(ExtensionError::ClassNotRegistered { .. })
    ));
    assert!(matches!(
        loader.load(&load("broken.json")).await,
        Err(ExtensionError::ModuleParse { .. })
    ));

    write_module(dir.path(), "widgets.toml", &["Helper", "Widgets"]);
    let extension = loader.load(&load("widgets.toml")).await.unwrap();
    assert_eq!(extension.alias(), "widgets");
}
