use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::api::ApiResponse;

/// A failure while serving a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFault {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiFault {
    /// Not found (404) for a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiFault::NotFound(format!("{} could not be found", resource.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiFault::NotFound(_) => StatusCode::NOT_FOUND,
            ApiFault::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiFault::Conflict(_) => StatusCode::CONFLICT,
            ApiFault::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error type name used in the rendered body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiFault::NotFound(_) => "NotFound",
            ApiFault::BadRequest(_) => "BadRequest",
            ApiFault::Conflict(_) => "Conflict",
            ApiFault::Internal(_) => "InternalError",
        }
    }

    /// Render as `{"error": {"type", "message", "code"}}` with the matching status
    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let body = json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
                "code": status.as_u16(),
            }
        });
        ApiResponse::json(status, &body)
    }
}
