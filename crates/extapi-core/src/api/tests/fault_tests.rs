use http::StatusCode;

use crate::api::ApiFault;

#[test]
fn test_fault_status_codes() {
    assert_eq!(ApiFault::not_found("Extension foo").status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiFault::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiFault::Conflict("x".into()).status(), StatusCode::CONFLICT);
    assert_eq!(
        ApiFault::Internal("x".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_fault_renders_json_error_body() {
    let response = ApiFault::not_found("Extension foo").into_response();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body = response.body_json().unwrap();
    assert_eq!(body["error"]["type"], "NotFound");
    assert_eq!(body["error"]["message"], "Extension foo could not be found");
    assert_eq!(body["error"]["code"], 404);
}
