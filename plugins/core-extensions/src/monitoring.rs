//! VNF monitoring: a `monitoring_policy` attribute on `vnfs`, a `heal` action
//! and an annotation of the API versions document.
use std::sync::Arc;

use extapi_core::api::{ApiFault, ApiRequest, ApiResponse};
use extapi_core::extension::{
    ActionExtension, AttributeMap, ExtensionDescriptor, ExtensionError, RequestExtension,
};
use extapi_core::kernel::constants;
use http::{Method, StatusCode};
use serde_json::{Value, json};

#[derive(Debug, Default)]
pub struct Monitoring;

fn heal(body: &Value, _request: &ApiRequest, id: &str) -> Result<ApiResponse, ApiFault> {
    let cause = body["heal"]
        .get("cause")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiFault::BadRequest("heal requires a 'cause'".to_string()))?;
    log::info!("Heal requested for vnf {}: {}", id, cause);
    Ok(ApiResponse::json(
        StatusCode::ACCEPTED,
        &json!({ "heal": { "vnf_id": id, "cause": cause, "status": "PENDING_HEAL" } }),
    ))
}

fn annotate_versions(_request: &ApiRequest, mut response: ApiResponse) -> Result<ApiResponse, ApiFault> {
    let Ok(mut body) = response.body_json() else {
        return Ok(response);
    };
    if let Some(document) = body.as_object_mut() {
        document.insert("monitoring".to_string(), json!({ "actions": ["heal"] }));
        response.set_json(&body);
    }
    Ok(response)
}

impl ExtensionDescriptor for Monitoring {
    fn name(&self) -> &str {
        "VNF Monitoring"
    }

    fn alias(&self) -> &str {
        "monitoring"
    }

    fn description(&self) -> &str {
        "Monitoring policies and healing of VNFs"
    }

    fn namespace(&self) -> &str {
        "http://extapi.dev/ext/monitoring/api/v1.0"
    }

    fn updated(&self) -> &str {
        "2016-06-06T10:00:00-00:00"
    }

    fn actions(&self) -> Vec<ActionExtension> {
        vec![ActionExtension::new("vnfs", "heal", Arc::new(heal))]
    }

    fn request_extensions(&self) -> Vec<RequestExtension> {
        vec![RequestExtension::new(Method::GET, "/", Arc::new(annotate_versions))]
    }

    fn extended_resources(&self, version: &str) -> Result<AttributeMap, ExtensionError> {
        if version != constants::API_VERSION {
            return Ok(AttributeMap::new());
        }
        AttributeMap::from_json(json!({
            "vnfs": {
                "monitoring_policy": {
                    "allow_post": true,
                    "allow_put": true,
                    "is_visible": true,
                    "default": null
                }
            }
        }))
        .map_err(|e| ExtensionError::ExtendedResources {
            alias: self.alias().to_string(),
            message: e.to_string(),
        })
    }

    fn required_extensions(&self) -> Vec<String> {
        vec!["vnfm".to_string()]
    }
}
