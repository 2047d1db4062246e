//! # extapi Drivers
//!
//! Named drivers loaded from a namespace and indexed by the type they report,
//! e.g. the VIM drivers (`openstack`, `kubernetes`) of the NFVO namespace.
//!
//! - [`Driver`]: a driver with a type and method-name based invocation.
//! - [`DriverCatalog`]: (namespace, name) → constructor, filled at startup.
//! - [`DriverManager`](manager::DriverManager): the loaded drivers of one namespace.
pub mod error;
pub mod manager;

use std::collections::BTreeMap;

use serde_json::Value;

pub use error::DriverError;
pub use manager::DriverManager;

/// A driver of some backend
pub trait Driver: Send + Sync {
    /// Type the driver is indexed by, e.g. `"openstack"`
    fn driver_type(&self) -> &str;

    /// Implementation name used in log messages
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Call `method` with keyword arguments given as a JSON object
    fn invoke(&self, method: &str, kwargs: &Value) -> Result<Value, DriverError>;
}

/// Constructor of a driver
pub type DriverFactory = fn() -> Box<dyn Driver>;

/// Drivers known to the process, by namespace and name
#[derive(Debug, Clone, Default)]
pub struct DriverCatalog {
    factories: BTreeMap<(String, String), DriverFactory>,
}

impl DriverCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        factory: DriverFactory,
    ) -> &mut Self {
        self.factories.insert((namespace.into(), name.into()), factory);
        self
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.factories
            .contains_key(&(namespace.to_string(), name.to_string()))
    }

    /// Names registered under `namespace`, sorted
    pub fn names(&self, namespace: &str) -> Vec<&str> {
        self.factories
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn instantiate(&self, namespace: &str, name: &str) -> Option<Box<dyn Driver>> {
        self.factories
            .get(&(namespace.to_string(), name.to_string()))
            .map(|factory| factory())
    }
}
