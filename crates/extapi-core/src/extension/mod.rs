//! # extapi Extension System
//!
//! Discovers, validates and aggregates API extensions.
//!
//! ## Key Components
//!
//! - **[`ExtensionDescriptor`]**: the trait every extension implements. Five
//!   descriptive accessors are required; resources, actions, request
//!   extensions, extended attributes and dependencies are optional.
//! - **[`ExtensionCatalog`]**: class name → constructor, filled by explicit
//!   registration at startup.
//! - **[`loader`]**: scans the `:`-delimited extensions path for module
//!   manifests and instantiates the classes they export.
//! - **[`ExtensionManager`]**: registers extensions by alias, aggregates their
//!   declarations and merges extended attributes in dependency order.
//! - **[`records`]**: the resource, action and request extension records.
//! - **[`AttributeMap`]**: resource → attribute → properties.
//! - **[`ExtensionController`]**: the built-in `extensions` collection.
//! - **Error Handling**: [`ExtensionError`](error::ExtensionError).
pub mod attributes;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod loader;
pub mod manager;
pub mod records;
pub mod traits;

pub use attributes::{AttributeMap, AttributeProperties, ResourceAttributes};
pub use catalog::{ExtensionCatalog, ExtensionFactory};
pub use controller::ExtensionController;
pub use error::ExtensionError;
pub use manager::{ExtendReport, ExtensionManager};
pub use records::{
    ActionExtension, ActionHandler, ParentResource, RequestExtension, RequestHandler,
    ResourceExtension,
};
pub use traits::ExtensionDescriptor;

// Test module declaration
#[cfg(test)]
mod tests;
