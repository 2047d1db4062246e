//! Declarations an extension hands to the manager: new resources, actions on
//! existing collections and request post-processors.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use serde_json::Value;

use crate::api::{ApiFault, ApiRequest, ApiResponse, Controller};
use crate::extension::attributes::ResourceAttributes;

/// Handles a named action posted to `/<collection>/{id}/action`
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        body: &Value,
        request: &ApiRequest,
        id: &str,
    ) -> Result<ApiResponse, ApiFault>;
}

#[async_trait]
impl<F> ActionHandler for F
where
    F: Fn(&Value, &ApiRequest, &str) -> Result<ApiResponse, ApiFault> + Send + Sync,
{
    async fn handle(
        &self,
        body: &Value,
        request: &ApiRequest,
        id: &str,
    ) -> Result<ApiResponse, ApiFault> {
        self(body, request, id)
    }
}

/// Post-processes the response the base application produced for a request
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(
        &self,
        request: &ApiRequest,
        response: ApiResponse,
    ) -> Result<ApiResponse, ApiFault>;
}

#[async_trait]
impl<F> RequestHandler for F
where
    F: Fn(&ApiRequest, ApiResponse) -> Result<ApiResponse, ApiFault> + Send + Sync,
{
    async fn handle(
        &self,
        request: &ApiRequest,
        response: ApiResponse,
    ) -> Result<ApiResponse, ApiFault> {
        self(request, response)
    }
}

/// Parent of a nested resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentResource {
    pub collection_name: String,
    pub member_name: String,
}

/// A new collection added by an extension
#[derive(Clone)]
pub struct ResourceExtension {
    pub collection: String,
    pub controller: Arc<dyn Controller>,
    pub parent: Option<ParentResource>,
    pub path_prefix: String,
    /// Collection action name → HTTP method
    pub collection_actions: BTreeMap<String, Method>,
    /// Member action name → HTTP method
    pub member_actions: BTreeMap<String, Method>,
    pub attr_map: ResourceAttributes,
}

impl ResourceExtension {
    pub fn new(collection: impl Into<String>, controller: Arc<dyn Controller>) -> Self {
        Self {
            collection: collection.into(),
            controller,
            parent: None,
            path_prefix: String::new(),
            collection_actions: BTreeMap::new(),
            member_actions: BTreeMap::new(),
            attr_map: ResourceAttributes::new(),
        }
    }

    pub fn with_parent(
        mut self,
        collection_name: impl Into<String>,
        member_name: impl Into<String>,
    ) -> Self {
        self.parent = Some(ParentResource {
            collection_name: collection_name.into(),
            member_name: member_name.into(),
        });
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_collection_action(mut self, action: impl Into<String>, method: Method) -> Self {
        self.collection_actions.insert(action.into(), method);
        self
    }

    pub fn with_member_action(mut self, action: impl Into<String>, method: Method) -> Self {
        self.member_actions.insert(action.into(), method);
        self
    }

    pub fn with_member_actions(mut self, actions: BTreeMap<String, Method>) -> Self {
        self.member_actions.extend(actions);
        self
    }

    pub fn with_attr_map(mut self, attr_map: ResourceAttributes) -> Self {
        self.attr_map = attr_map;
        self
    }
}

impl fmt::Debug for ResourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceExtension")
            .field("collection", &self.collection)
            .field("parent", &self.parent)
            .field("path_prefix", &self.path_prefix)
            .field("collection_actions", &self.collection_actions)
            .field("member_actions", &self.member_actions)
            .finish_non_exhaustive()
    }
}

/// An action added to an existing collection
#[derive(Clone)]
pub struct ActionExtension {
    pub collection: String,
    pub action_name: String,
    pub handler: Arc<dyn ActionHandler>,
}

impl ActionExtension {
    pub fn new(
        collection: impl Into<String>,
        action_name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Self {
        Self {
            collection: collection.into(),
            action_name: action_name.into(),
            handler,
        }
    }
}

impl fmt::Debug for ActionExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionExtension")
            .field("collection", &self.collection)
            .field("action_name", &self.action_name)
            .finish_non_exhaustive()
    }
}

/// A post-processor of the response to `method url_route`
#[derive(Clone)]
pub struct RequestExtension {
    pub method: Method,
    pub url_route: String,
    pub handler: Arc<dyn RequestHandler>,
}

impl RequestExtension {
    pub fn new(method: Method, url_route: impl Into<String>, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            method,
            url_route: url_route.into(),
            handler,
        }
    }

    /// `"<METHOD>-<route>"`; extensions sharing a key share one controller
    pub fn key(&self) -> String {
        format!("{}-{}", self.method, self.url_route)
    }
}

impl fmt::Debug for RequestExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExtension")
            .field("key", &self.key())
            .finish_non_exhaustive()
    }
}
