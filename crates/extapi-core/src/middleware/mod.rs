//! # extapi Extension Middleware
//!
//! Wraps a base [`Application`] and routes requests to extension
//! controllers.
//!
//! The route table is built once from the manager's aggregated resources,
//! actions and request extensions:
//!
//! - **Resources**: collection actions, then the standard collection/member
//!   routes, nested under the parent when one is declared.
//! - **Actions**: one [`ActionExtensionController`] per collection on
//!   `POST /<collection>/{id}/action`.
//! - **Request extensions**: one [`RequestExtensionController`] per
//!   `METHOD-route` key.
//!
//! Unmatched requests go to the base application unchanged.
pub mod controllers;
pub mod error;
pub mod mapper;

use std::sync::Arc;

use async_trait::async_trait;
use http::Method;

use crate::api::{ApiFault, ApiRequest, ApiResponse, Application};
use crate::extension::manager::ExtensionManager;
use crate::middleware::error::MiddlewareError;
use crate::service::ResourceContext;

pub use controllers::{ActionExtensionController, RequestExtensionController};
pub use mapper::{Mapper, Route, RouteMatch, RouteTarget};

pub struct ExtensionMiddleware {
    application: Arc<dyn Application>,
    ext_mgr: Arc<ExtensionManager>,
    mapper: Mapper,
}

impl ExtensionMiddleware {
    /// Build the route table for everything `ext_mgr` declares
    pub fn new(
        application: Arc<dyn Application>,
        ext_mgr: Arc<ExtensionManager>,
        ctx: &ResourceContext,
    ) -> Result<Self, MiddlewareError> {
        let mut mapper = Mapper::new();

        for resource in ext_mgr.get_resources(ctx) {
            let path_prefix = match &resource.parent {
                Some(parent) => format!(
                    "{}/{}/{{{}_id}}",
                    resource.path_prefix, parent.collection_name, parent.member_name
                ),
                None => resource.path_prefix.clone(),
            };

            log::debug!("Extended resource: {}", resource.collection);
            for (action, method) in &resource.collection_actions {
                let path = format!("{}/{}/{}", path_prefix, resource.collection, action);
                mapper.connect_with_format(
                    &path,
                    Some(method.clone()),
                    RouteTarget::Resource {
                        controller: Arc::clone(&resource.controller),
                        action: action.clone(),
                    },
                )?;
            }

            mapper.resource(
                &resource.collection,
                Arc::clone(&resource.controller),
                &resource.member_actions,
                &path_prefix,
            )?;
        }

        // Extended actions, one controller per collection in first-seen order
        let mut action_controllers: Vec<(String, ActionExtensionController)> = Vec::new();
        for action in ext_mgr.get_actions() {
            log::debug!("Extended action: {}", action.action_name);
            let position = match action_controllers
                .iter()
                .position(|(collection, _)| *collection == action.collection)
            {
                Some(position) => position,
                None => {
                    action_controllers.push((
                        action.collection.clone(),
                        ActionExtensionController::new(Arc::clone(&application)),
                    ));
                    action_controllers.len() - 1
                }
            };
            action_controllers[position]
                .1
                .add_action(action.action_name, action.handler);
        }
        for (collection, controller) in action_controllers {
            mapper.connect_with_format(
                &format!("/{}/{{id}}/action", collection),
                Some(Method::POST),
                RouteTarget::Action(Arc::new(controller)),
            )?;
        }

        // Extended requests, one controller per key
        let mut request_controllers: Vec<(String, Method, String, RequestExtensionController)> =
            Vec::new();
        for request_ext in ext_mgr.get_request_extensions() {
            let key = request_ext.key();
            log::debug!("Extended request: {}", key);
            let position = match request_controllers.iter().position(|(k, ..)| *k == key) {
                Some(position) => position,
                None => {
                    request_controllers.push((
                        key,
                        request_ext.method.clone(),
                        request_ext.url_route.clone(),
                        RequestExtensionController::new(Arc::clone(&application)),
                    ));
                    request_controllers.len() - 1
                }
            };
            request_controllers[position].3.add_handler(request_ext.handler);
        }
        for (_, method, url_route, controller) in request_controllers {
            mapper.connect_with_format(
                &url_route,
                Some(method),
                RouteTarget::Request(Arc::new(controller)),
            )?;
        }

        Ok(Self {
            application,
            ext_mgr,
            mapper,
        })
    }

    /// A constructor that wraps any base application around the shared manager
    pub fn factory(
        ext_mgr: Arc<ExtensionManager>,
        ctx: ResourceContext,
    ) -> impl Fn(Arc<dyn Application>) -> Result<ExtensionMiddleware, MiddlewareError> {
        move |application| ExtensionMiddleware::new(application, Arc::clone(&ext_mgr), &ctx)
    }

    pub fn extension_manager(&self) -> &Arc<ExtensionManager> {
        &self.ext_mgr
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let Some(matched) = self.mapper.match_route(&request.method, &request.path) else {
            return self.application.call(request).await;
        };

        let result = match &matched.route.target {
            RouteTarget::Resource { controller, action } => {
                controller.dispatch(action, request, &matched.params).await
            }
            RouteTarget::Action(controller) => {
                let id = matched.params.get("id").cloned().unwrap_or_default();
                controller.action(request, &id).await
            }
            RouteTarget::Request(controller) => controller.process(request).await,
        };
        result.unwrap_or_else(ApiFault::into_response)
    }
}

#[async_trait]
impl Application for ExtensionMiddleware {
    async fn call(&self, mut request: ApiRequest) -> ApiResponse {
        request.context.extended_app = Some(Arc::clone(&self.application));
        self.dispatch(request).await
    }
}
