use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::kernel::constants;
use crate::service::error::ServiceError;
use crate::service::traits::ServicePlugin;

/// Service plugins by type
#[derive(Default)]
pub struct ServicePluginRegistry {
    plugins: BTreeMap<String, Arc<dyn ServicePlugin>>,
}

impl ServicePluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `plugin` under its `plugin_type()`
    pub fn register(&mut self, plugin: Arc<dyn ServicePlugin>) -> Result<(), ServiceError> {
        let plugin_type = plugin.plugin_type().to_string();
        if self.plugins.contains_key(&plugin_type) {
            return Err(ServiceError::DuplicatePlugin(plugin_type));
        }
        log::debug!("Registered service plugin {}", plugin_type);
        self.plugins.insert(plugin_type, plugin);
        Ok(())
    }

    pub fn get(&self, plugin_type: &str) -> Result<Arc<dyn ServicePlugin>, ServiceError> {
        self.plugins
            .get(plugin_type)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownServicePlugin(plugin_type.to_string()))
    }

    /// The core plugin
    pub fn core(&self) -> Result<Arc<dyn ServicePlugin>, ServiceError> {
        self.get(constants::CORE)
    }

    pub fn contains(&self, plugin_type: &str) -> bool {
        self.plugins.contains_key(plugin_type)
    }

    pub fn plugin_types(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for ServicePluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePluginRegistry")
            .field("plugins", &self.plugin_types())
            .finish()
    }
}
