use crate::extension::attributes::AttributeMap;
use crate::extension::error::ExtensionError;
use crate::extension::records::{ActionExtension, RequestExtension, ResourceExtension};
use crate::service::ResourceContext;

/// Contract every API extension implements.
///
/// Only the five descriptive accessors are required. Everything else has a
/// default that contributes nothing.
pub trait ExtensionDescriptor: Send + Sync {
    /// Human readable name, e.g. `"VNF Manager"`
    fn name(&self) -> &str;

    /// Unique short identifier, e.g. `"vnfm"`
    fn alias(&self) -> &str;

    /// Friendly description
    fn description(&self) -> &str;

    /// Namespace URI
    fn namespace(&self) -> &str;

    /// Last update timestamp, e.g. `"2013-11-19T10:00:00-00:00"`
    fn updated(&self) -> &str;

    /// New collections (nouns) exposed by this extension
    fn resources(&self, _ctx: &ResourceContext) -> Vec<ResourceExtension> {
        Vec::new()
    }

    /// Actions added to existing collections
    fn actions(&self) -> Vec<ActionExtension> {
        Vec::new()
    }

    /// Post-processors of core responses
    fn request_extensions(&self) -> Vec<RequestExtension> {
        Vec::new()
    }

    /// Whether this extension takes part in the attribute merge.
    ///
    /// Every extension does unless it opts out, contributing an empty map by
    /// default, so that a resource-only extension still satisfies the
    /// requirements of extensions merged after it.
    fn extends_resources(&self) -> bool {
        true
    }

    /// Resources or attributes this extension adds for API `version`
    fn extended_resources(&self, _version: &str) -> Result<AttributeMap, ExtensionError> {
        Ok(AttributeMap::new())
    }

    /// Aliases that must be merged before this extension
    fn required_extensions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Called once with the fully merged map after every extension contributed.
    ///
    /// Implementations keep their own copy behind interior mutability and
    /// typically call [`AttributeMap::absorb_extended`].
    fn update_attributes_map(&self, _extended: &AttributeMap) {}
}
