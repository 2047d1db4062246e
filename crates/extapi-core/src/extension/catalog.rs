use std::collections::BTreeMap;

use crate::extension::error::ExtensionError;
use crate::extension::traits::ExtensionDescriptor;

/// Constructor of an extension class
pub type ExtensionFactory = fn() -> Box<dyn ExtensionDescriptor>;

/// Extension classes known to the process, by class name.
///
/// Module manifests on the extensions path only name the classes they
/// export; the constructors are registered here at startup.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCatalog {
    classes: BTreeMap<String, ExtensionFactory>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, class: impl Into<String>, factory: ExtensionFactory) -> &mut Self {
        let class = class.into();
        if self.classes.insert(class.clone(), factory).is_some() {
            log::warn!("Extension class '{}' registered twice, keeping the last", class);
        }
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Registered class names in sorted order
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Instantiate `class` with its no-argument constructor
    pub fn instantiate(&self, class: &str) -> Result<Box<dyn ExtensionDescriptor>, ExtensionError> {
        self.classes
            .get(class)
            .map(|factory| factory())
            .ok_or_else(|| ExtensionError::ClassNotRegistered {
                class: class.to_string(),
            })
    }
}
