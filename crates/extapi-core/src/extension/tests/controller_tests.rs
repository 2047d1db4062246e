use std::sync::Arc;

use http::{Method, StatusCode};

use super::common::{Gadgets, Widgets};
use crate::api::{ApiFault, ApiRequest, Controller, RouteParams};
use crate::extension::controller::ExtensionController;
use crate::extension::manager::ExtensionManager;

fn controller() -> ExtensionController {
    let mut manager = ExtensionManager::empty("");
    manager.add_extension(Arc::new(Widgets)).unwrap();
    manager.add_extension(Arc::new(Gadgets)).unwrap();
    ExtensionController::new(Arc::new(manager))
}

fn params(id: &str) -> RouteParams {
    let mut params = RouteParams::new();
    params.insert("id".to_string(), id.to_string());
    params
}

#[tokio::test]
async fn test_index_lists_extensions_in_load_order() {
    let response = controller()
        .dispatch("index", ApiRequest::new(Method::GET, "/extensions"), &RouteParams::new())
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let body = response.body_json().unwrap();
    let extensions = body["extensions"].as_array().unwrap();
    assert_eq!(extensions.len(), 2);
    assert_eq!(extensions[0]["alias"], "widgets");
    assert_eq!(extensions[0]["name"], "Widgets");
    assert_eq!(extensions[0]["links"], serde_json::json!([]));
    assert_eq!(extensions[1]["alias"], "gadgets");
}

#[tokio::test]
async fn test_show_by_alias() {
    let controller = controller();
    let response = controller
        .dispatch("show", ApiRequest::new(Method::GET, "/extensions/gadgets"), &params("gadgets"))
        .await
        .unwrap();
    let body = response.body_json().unwrap();
    assert_eq!(body["extension"]["alias"], "gadgets");
    assert_eq!(body["extension"]["updated"], "2024-01-01T00:00:00-00:00");

    let missing = controller
        .dispatch("show", ApiRequest::new(Method::GET, "/extensions/nope"), &params("nope"))
        .await
        .unwrap_err();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(missing.to_string().contains("nope"));
}

#[tokio::test]
async fn test_create_and_delete_are_not_found() {
    let controller = controller();
    for (action, method) in [("create", Method::POST), ("delete", Method::DELETE)] {
        let err = controller
            .dispatch(action, ApiRequest::new(method, "/extensions/widgets"), &params("widgets"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiFault::NotFound(_)));
    }
}
