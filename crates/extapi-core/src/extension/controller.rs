use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Value, json};

use crate::api::{ApiFault, ApiRequest, ApiResponse, Controller, RouteParams};
use crate::extension::manager::ExtensionManager;
use crate::extension::traits::ExtensionDescriptor;

/// Serves the built-in `extensions` collection: the loaded extensions, by alias
pub struct ExtensionController {
    manager: Arc<ExtensionManager>,
}

impl ExtensionController {
    pub fn new(manager: Arc<ExtensionManager>) -> Self {
        Self { manager }
    }

    fn translate(extension: &dyn ExtensionDescriptor) -> Value {
        json!({
            "name": extension.name(),
            "alias": extension.alias(),
            "description": extension.description(),
            "namespace": extension.namespace(),
            "updated": extension.updated(),
            "links": [],
        })
    }

    fn index(&self) -> ApiResponse {
        let extensions: Vec<Value> = self
            .manager
            .extensions()
            .map(|ext| Self::translate(ext.as_ref()))
            .collect();
        ApiResponse::json(StatusCode::OK, &json!({ "extensions": extensions }))
    }

    fn show(&self, alias: &str) -> Result<ApiResponse, ApiFault> {
        let extension = self.manager.get(alias).ok_or_else(|| {
            ApiFault::NotFound(format!("Extension with alias {} does not exist", alias))
        })?;
        Ok(ApiResponse::json(
            StatusCode::OK,
            &json!({ "extension": Self::translate(extension.as_ref()) }),
        ))
    }
}

#[async_trait]
impl Controller for ExtensionController {
    async fn dispatch(
        &self,
        action: &str,
        _request: ApiRequest,
        params: &RouteParams,
    ) -> Result<ApiResponse, ApiFault> {
        match action {
            "index" => Ok(self.index()),
            "show" => {
                let alias = params.get("id").map(String::as_str).unwrap_or_default();
                self.show(alias)
            }
            _ => Err(ApiFault::NotFound("Resource not found.".to_string())),
        }
    }
}
