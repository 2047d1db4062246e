//! VNF manager extension: `vnfds` and `vnfs`, served by the VNFM service plugin.
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use extapi_core::extension::{AttributeMap, ExtensionDescriptor, ExtensionError, ResourceExtension};
use extapi_core::kernel::constants;
use extapi_core::service::{ResourceContext, ResourceOptions, build_plural_mappings, build_resource_info};
use serde_json::json;

/// Attributes of the VNFM collections
pub fn resource_attribute_map() -> AttributeMap {
    let map = json!({
        "vnfds": {
            "id": {"allow_post": false, "allow_put": false, "is_visible": true},
            "tenant_id": {"allow_post": true, "allow_put": false, "is_visible": true, "default": ""},
            "name": {"allow_post": true, "allow_put": true, "is_visible": true},
            "description": {"allow_post": true, "allow_put": true, "is_visible": true, "default": ""},
            "template_source": {"allow_post": false, "allow_put": false, "is_visible": true, "default": "onboarded"},
            "attributes": {"allow_post": true, "allow_put": false, "is_visible": true, "default": {}}
        },
        "vnfs": {
            "id": {"allow_post": false, "allow_put": false, "is_visible": true},
            "tenant_id": {"allow_post": true, "allow_put": false, "is_visible": true, "default": ""},
            "vnfd_id": {"allow_post": true, "allow_put": false, "is_visible": true},
            "vim_id": {"allow_post": true, "allow_put": false, "is_visible": true, "default": ""},
            "name": {"allow_post": true, "allow_put": true, "is_visible": true},
            "description": {"allow_post": true, "allow_put": true, "is_visible": true, "default": ""},
            "mgmt_url": {"allow_post": false, "allow_put": false, "is_visible": true, "default": null},
            "attributes": {"allow_post": true, "allow_put": true, "is_visible": true, "default": {}},
            "status": {"allow_post": false, "allow_put": false, "is_visible": true, "default": "PENDING_CREATE"}
        }
    });
    AttributeMap::from_json(map).unwrap_or_else(|e| {
        log::error!("Invalid VNFM attribute map: {}", e);
        AttributeMap::new()
    })
}

/// The VNFM extension.
///
/// Its attribute map absorbs what other extensions add to `vnfds`/`vnfs`, so
/// the controllers built afterwards accept the extended attributes.
pub struct Vnfm {
    attributes: RwLock<AttributeMap>,
}

impl Default for Vnfm {
    fn default() -> Self {
        Self {
            attributes: RwLock::new(resource_attribute_map()),
        }
    }
}

impl Vnfm {
    /// Current attribute map, including absorbed contributions
    pub fn attributes(&self) -> AttributeMap {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ExtensionDescriptor for Vnfm {
    fn name(&self) -> &str {
        "VNF Manager"
    }

    fn alias(&self) -> &str {
        "vnfm"
    }

    fn description(&self) -> &str {
        "Extension for VNF Manager"
    }

    fn namespace(&self) -> &str {
        "http://extapi.dev/ext/vnfm/api/v1.0"
    }

    fn updated(&self) -> &str {
        "2013-11-19T10:00:00-00:00"
    }

    fn resources(&self, ctx: &ResourceContext) -> Vec<ResourceExtension> {
        let map = self.attributes();
        let plural_mappings = build_plural_mappings(&BTreeMap::new(), &map);
        let options = ResourceOptions {
            allow_bulk: true,
            ..Default::default()
        };
        match build_resource_info(&plural_mappings, &map, Some(constants::VNFM), &options, ctx) {
            Ok(resources) => resources,
            Err(e) => {
                log::error!("VNFM resources unavailable: {}", e);
                Vec::new()
            }
        }
    }

    fn extended_resources(&self, version: &str) -> Result<AttributeMap, ExtensionError> {
        if version == constants::API_VERSION {
            Ok(resource_attribute_map())
        } else {
            Ok(AttributeMap::new())
        }
    }

    fn update_attributes_map(&self, extended: &AttributeMap) {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .absorb_extended(extended);
    }
}
