//! # extapi Service Plugins
//!
//! Service plugins own the data behind extension resources. This module holds
//! the plugin contract, the named registry the resource helper resolves
//! plugins from, a generic resource controller and an in-memory plugin.
//!
//! - [`ServicePlugin`](traits::ServicePlugin): CRUD and member actions over
//!   named resources.
//! - [`ServicePluginRegistry`]: plugin type → plugin; `CORE` names the core plugin.
//! - [`ServiceResourceController`]: the controller
//!   [`build_resource_info`](resource_helper::build_resource_info) binds to
//!   each collection.
//! - [`ResourceContext`]: what extensions need to build their resources.
pub mod controller;
pub mod error;
pub mod memory;
pub mod registry;
pub mod resource_helper;
pub mod traits;

use std::sync::Arc;

use crate::config::ApiConfig;

pub use controller::ServiceResourceController;
pub use error::ServiceError;
pub use memory::InMemoryServicePlugin;
pub use registry::ServicePluginRegistry;
pub use resource_helper::{ResourceOptions, build_plural_mappings, build_resource_info};
pub use traits::{ListQuery, Record, ServicePlugin};

/// Shared state handed to `ExtensionDescriptor::resources`
#[derive(Clone)]
pub struct ResourceContext {
    pub services: Arc<ServicePluginRegistry>,
    pub config: Arc<ApiConfig>,
}

impl ResourceContext {
    pub fn new(services: Arc<ServicePluginRegistry>, config: Arc<ApiConfig>) -> Self {
        Self { services, config }
    }
}

impl Default for ResourceContext {
    fn default() -> Self {
        Self::new(
            Arc::new(ServicePluginRegistry::new()),
            Arc::new(ApiConfig::default()),
        )
    }
}
