//! NFV orchestrator extension: `vims`, served by the NFVO service plugin.
use std::collections::BTreeMap;

use extapi_core::extension::{AttributeMap, ExtensionDescriptor, ExtensionError, ResourceExtension};
use extapi_core::kernel::constants;
use extapi_core::service::{ResourceContext, ResourceOptions, build_plural_mappings, build_resource_info};
use serde_json::json;

pub fn resource_attribute_map() -> AttributeMap {
    let map = json!({
        "vims": {
            "id": {"allow_post": false, "allow_put": false, "is_visible": true},
            "tenant_id": {"allow_post": true, "allow_put": false, "is_visible": true, "default": ""},
            "type": {"allow_post": true, "allow_put": false, "is_visible": true},
            "auth_url": {"allow_post": true, "allow_put": false, "is_visible": true},
            "auth_cred": {"allow_post": true, "allow_put": true, "is_visible": false},
            "vim_project": {"allow_post": true, "allow_put": true, "is_visible": true},
            "name": {"allow_post": true, "allow_put": true, "is_visible": true},
            "description": {"allow_post": true, "allow_put": true, "is_visible": true, "default": ""},
            "status": {"allow_post": false, "allow_put": false, "is_visible": true, "default": "PENDING"},
            "is_default": {"allow_post": true, "allow_put": true, "is_visible": true, "default": false}
        }
    });
    AttributeMap::from_json(map).unwrap_or_else(|e| {
        log::error!("Invalid NFVO attribute map: {}", e);
        AttributeMap::new()
    })
}

#[derive(Debug, Default)]
pub struct Nfvo;

impl ExtensionDescriptor for Nfvo {
    fn name(&self) -> &str {
        "NFV Orchestrator"
    }

    fn alias(&self) -> &str {
        "nfvo"
    }

    fn description(&self) -> &str {
        "Extension for NFV Orchestrator"
    }

    fn namespace(&self) -> &str {
        "http://extapi.dev/ext/nfvo/api/v1.0"
    }

    fn updated(&self) -> &str {
        "2015-12-21T10:00:00-00:00"
    }

    fn resources(&self, ctx: &ResourceContext) -> Vec<ResourceExtension> {
        let map = resource_attribute_map();
        let plural_mappings = build_plural_mappings(&BTreeMap::new(), &map);
        build_resource_info(
            &plural_mappings,
            &map,
            Some(constants::NFVO),
            &ResourceOptions::default(),
            ctx,
        )
        .unwrap_or_else(|e| {
            log::error!("NFVO resources unavailable: {}", e);
            Vec::new()
        })
    }

    fn extended_resources(&self, version: &str) -> Result<AttributeMap, ExtensionError> {
        if version == constants::API_VERSION {
            Ok(resource_attribute_map())
        } else {
            Ok(AttributeMap::new())
        }
    }
}
