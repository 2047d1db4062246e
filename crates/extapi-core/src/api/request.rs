use std::fmt;
use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::api::{ApiFault, Application};

/// Per-request state attached while the request travels through the stack
#[derive(Clone, Default)]
pub struct RequestContext {
    /// The application wrapped by the extension middleware, set on entry
    pub extended_app: Option<Arc<dyn Application>>,
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("extended_app", &self.extended_app.is_some())
            .finish()
    }
}

/// An incoming API request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub context: RequestContext,
}

impl ApiRequest {
    /// Build a request from a method and a URI path with an optional query string
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (uri.to_string(), None),
        };
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Vec::new(),
            context: RequestContext::default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach a JSON body and the matching content type
    pub fn with_json(mut self, value: &Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = serde_json::to_vec(value).unwrap_or_default();
        self
    }

    /// Parse the body as JSON
    pub fn json_body(&self) -> Result<Value, ApiFault> {
        if self.body.is_empty() {
            return Err(ApiFault::BadRequest("Request body is empty".to_string()));
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiFault::BadRequest(format!("Malformed request body: {}", e)))
    }

    /// Decoded `key=value` pairs of the query string, in order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query.as_deref() else {
            return Vec::new();
        };
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// Every value given for `key`
    pub fn query_values(&self, key: &str) -> Vec<String> {
        self.query_pairs()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }

    /// The first value given for `key`
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query_values(key).into_iter().next()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
