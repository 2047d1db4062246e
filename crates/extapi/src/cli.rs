use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{Value, json};

use extapi_core::kernel::constants;
use extapi_core::{ApiFault, ApiRequest, ApiResponse, Application};

/// The base application behind the extension middleware.
///
/// It only knows the API versions document at `GET /`; every other request
/// reaching it is answered with 404.
#[derive(Debug, Default)]
pub struct VersionsApp;

impl VersionsApp {
    pub fn versions() -> Value {
        json!({
            "versions": [{
                "id": format!("v{}", constants::API_VERSION),
                "status": "CURRENT",
                "links": [{"rel": "self", "href": format!("/v{}", constants::API_VERSION)}]
            }]
        })
    }
}

#[async_trait]
impl Application for VersionsApp {
    async fn call(&self, request: ApiRequest) -> ApiResponse {
        if request.method == Method::GET && request.path == "/" {
            return ApiResponse::json(StatusCode::OK, &Self::versions());
        }
        ApiFault::NotFound(format!("Resource {} not found", request.path)).into_response()
    }
}

/// Pretty JSON, falling back to compact output
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print status line and body of `response`
pub fn print_response(response: &ApiResponse) {
    println!("{}", response.status);
    if response.body.is_empty() {
        return;
    }
    match response.body_json() {
        Ok(body) => println!("{}", pretty(&body)),
        Err(_) => println!("{}", String::from_utf8_lossy(&response.body)),
    }
}
