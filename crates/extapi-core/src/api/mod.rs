//! # extapi API Types
//!
//! The request/response model the middleware and controllers exchange.
//!
//! - [`ApiRequest`] / [`ApiResponse`]: a parsed request and the response
//!   produced for it, built on `http` primitives.
//! - [`ApiFault`]: request-time failures, rendered as JSON error bodies.
//! - [`Application`]: anything that turns a request into a response. The base
//!   application and [`ExtensionMiddleware`](crate::middleware::ExtensionMiddleware)
//!   both implement it.
//! - [`Controller`]: a resource controller, dispatched by action name.
pub mod fault;
pub mod request;
pub mod response;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use fault::ApiFault;
pub use request::{ApiRequest, RequestContext};
pub use response::ApiResponse;

/// Variables captured from a matched route template (`id`, `format`, parent ids, ...)
pub type RouteParams = BTreeMap<String, String>;

/// An application that serves requests
#[async_trait]
pub trait Application: Send + Sync {
    async fn call(&self, request: ApiRequest) -> ApiResponse;
}

#[async_trait]
impl<F> Application for F
where
    F: Fn(ApiRequest) -> ApiResponse + Send + Sync,
{
    async fn call(&self, request: ApiRequest) -> ApiResponse {
        self(request)
    }
}

/// A resource controller
///
/// `action` is one of `index`, `show`, `create`, `update`, `delete`, or the
/// name of a collection/member action declared by the resource.
#[async_trait]
pub trait Controller: Send + Sync {
    async fn dispatch(
        &self,
        action: &str,
        request: ApiRequest,
        params: &RouteParams,
    ) -> Result<ApiResponse, ApiFault>;
}

// Test module declaration
#[cfg(test)]
mod tests;
