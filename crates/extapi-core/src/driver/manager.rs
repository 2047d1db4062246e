use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::driver::error::DriverError;
use crate::driver::{Driver, DriverCatalog};

/// The drivers of one namespace, by driver type
pub struct DriverManager {
    namespace: String,
    drivers: BTreeMap<String, Arc<dyn Driver>>,
}

impl DriverManager {
    /// Load `names` from `namespace`.
    ///
    /// Names unknown to the catalog are skipped with a warning. Two drivers
    /// reporting the same type is fatal.
    pub fn new<S: AsRef<str>>(
        namespace: impl Into<String>,
        names: &[S],
        catalog: &DriverCatalog,
    ) -> Result<Self, DriverError> {
        let mut manager = Self::empty(namespace);
        for name in names {
            let name = name.as_ref();
            let Some(driver) = catalog.instantiate(&manager.namespace, name) else {
                log::warn!(
                    "Could not load driver '{}' from namespace {}",
                    name,
                    manager.namespace
                );
                continue;
            };
            let driver_type = driver.driver_type().to_string();
            if let Some(existing) = manager.drivers.get(&driver_type) {
                log::error!(
                    "driver '{}' ignored because driver '{}' is already registered for driver '{}'",
                    name,
                    existing.name(),
                    driver_type
                );
                return Err(DriverError::DuplicateType { driver_type });
            }
            manager.drivers.insert(driver_type, Arc::from(driver));
        }
        log::info!(
            "Registered drivers from {}: {:?}",
            manager.namespace,
            manager.driver_types()
        );
        Ok(manager)
    }

    pub fn empty(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            drivers: BTreeMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Add a driver after loading; the type must be free
    pub fn register(
        &mut self,
        driver_type: impl Into<String>,
        driver: Arc<dyn Driver>,
    ) -> Result<(), DriverError> {
        let driver_type = driver_type.into();
        if let Some(existing) = self.drivers.get(&driver_type) {
            log::error!(
                "can't load driver '{}' because driver '{}' is already registered for driver '{}'",
                driver.name(),
                existing.name(),
                driver_type
            );
            return Err(DriverError::DuplicateType { driver_type });
        }
        self.drivers.insert(driver_type, driver);
        Ok(())
    }

    /// Call `method` on the driver registered for `driver_type`
    pub fn invoke(&self, driver_type: &str, method: &str, kwargs: &Value) -> Result<Value, DriverError> {
        let driver = self
            .get(driver_type)
            .ok_or_else(|| DriverError::UnknownType(driver_type.to_string()))?;
        driver.invoke(method, kwargs)
    }

    pub fn get(&self, driver_type: &str) -> Option<&Arc<dyn Driver>> {
        self.drivers.get(driver_type)
    }

    pub fn contains(&self, driver_type: &str) -> bool {
        self.drivers.contains_key(driver_type)
    }

    pub fn driver_types(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
