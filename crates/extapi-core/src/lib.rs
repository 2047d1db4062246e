//! # extapi core
//!
//! Extension loading, dependency-ordered attribute merging and request
//! routing for an OpenStack-style REST API server.
//!
//! Extensions are discovered from module manifests on a `:`-delimited search
//! path, instantiated from an [`ExtensionCatalog`](extension::ExtensionCatalog),
//! validated and registered by the [`ExtensionManager`]. The
//! [`ExtensionMiddleware`] turns their resources, actions and request
//! extensions into a route table and dispatches requests, falling back to the
//! wrapped base [`Application`](api::Application) when nothing matches.
pub mod api;
pub mod config;
pub mod driver;
pub mod extension;
pub mod kernel;
pub mod middleware;
pub mod service;

// Re-export key public types/traits for easier use by the binary and extensions
pub use api::{ApiFault, ApiRequest, ApiResponse, Application};
pub use config::ApiConfig;
pub use extension::{AttributeMap, ExtensionCatalog, ExtensionDescriptor, ExtensionManager};
pub use kernel::AppState;
pub use kernel::error::Error as KernelError;
pub use middleware::ExtensionMiddleware;
