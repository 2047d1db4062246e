use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::extension::attributes::AttributeMap;
use crate::extension::catalog::ExtensionCatalog;
use crate::extension::error::ExtensionError;
use crate::extension::traits::ExtensionDescriptor;

/// Configurable extension for manager tests
pub struct MockExtension {
    pub name: String,
    pub alias: String,
    pub requires: Vec<String>,
    pub extended: Option<Value>,
    pub fails: bool,
    pub updates: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Option<AttributeMap>>>,
}

impl MockExtension {
    pub fn new(alias: &str) -> Self {
        Self {
            name: format!("Mock {}", alias),
            alias: alias.to_string(),
            requires: Vec::new(),
            extended: None,
            fails: false,
            updates: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(None)),
        }
    }

    /// Contribute `attrs` (resource → attribute → properties)
    pub fn extending(mut self, attrs: Value) -> Self {
        self.extended = Some(attrs);
        self
    }

    pub fn requiring(mut self, aliases: &[&str]) -> Self {
        self.requires = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self.extended = Some(json!({}));
        self
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl ExtensionDescriptor for MockExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> &str {
        &self.alias
    }

    fn description(&self) -> &str {
        "mock extension"
    }

    fn namespace(&self) -> &str {
        "http://example.org/ext/mock/api/v1.0"
    }

    fn updated(&self) -> &str {
        "2024-01-01T00:00:00-00:00"
    }

    fn extends_resources(&self) -> bool {
        self.extended.is_some()
    }

    fn extended_resources(&self, _version: &str) -> Result<AttributeMap, ExtensionError> {
        if self.fails {
            return Err(ExtensionError::ExtendedResources {
                alias: self.alias.clone(),
                message: "backend unavailable".to_string(),
            });
        }
        let value = self.extended.clone().unwrap_or_else(|| json!({}));
        Ok(AttributeMap::from_json(value).expect("mock attributes are well formed"))
    }

    fn required_extensions(&self) -> Vec<String> {
        self.requires.clone()
    }

    fn update_attributes_map(&self, extended: &AttributeMap) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() = Some(extended.clone());
    }
}

macro_rules! unit_extension {
    ($ty:ident, $name:expr, $alias:expr) => {
        pub struct $ty;

        impl ExtensionDescriptor for $ty {
            fn name(&self) -> &str {
                $name
            }
            fn alias(&self) -> &str {
                $alias
            }
            fn description(&self) -> &str {
                "test extension"
            }
            fn namespace(&self) -> &str {
                "http://example.org/ext/test/api/v1.0"
            }
            fn updated(&self) -> &str {
                "2024-01-01T00:00:00-00:00"
            }
        }
    };
}

unit_extension!(Widgets, "Widgets", "widgets");
unit_extension!(Gadgets, "Gadgets", "gadgets");
unit_extension!(Sprockets, "Sprockets", "sprockets");
// Same alias as `Widgets`
unit_extension!(Widgetsagain, "Widgets Again", "widgets");
// Fails validation
unit_extension!(Nameless, "", "nameless");

/// Catalog with every test class registered
pub fn test_catalog() -> ExtensionCatalog {
    let mut catalog = ExtensionCatalog::new();
    catalog
        .register("Widgets", || Box::new(Widgets))
        .register("Gadgets", || Box::new(Gadgets))
        .register("Sprockets", || Box::new(Sprockets))
        .register("Widgetsagain", || Box::new(Widgetsagain))
        .register("Nameless", || Box::new(Nameless));
    catalog
}

/// Write a TOML module manifest exporting `classes`
pub fn write_module(dir: &Path, file_name: &str, classes: &[&str]) {
    let exports = classes
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(dir.join(file_name), format!("exports = [{}]\n", exports))
        .expect("Failed to write module manifest");
}
