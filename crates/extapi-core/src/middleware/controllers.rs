use std::fmt;
use std::sync::Arc;

use crate::api::{ApiFault, ApiRequest, ApiResponse, Application};
use crate::extension::records::{ActionHandler, RequestHandler};

/// Serves `POST /<collection>/{id}/action` for one collection
pub struct ActionExtensionController {
    application: Arc<dyn Application>,
    action_handlers: Vec<(String, Arc<dyn ActionHandler>)>,
}

impl ActionExtensionController {
    pub fn new(application: Arc<dyn Application>) -> Self {
        Self {
            application,
            action_handlers: Vec::new(),
        }
    }

    /// Register `handler` for bodies carrying `action_name`; a repeated name replaces the handler
    pub fn add_action(&mut self, action_name: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        let action_name = action_name.into();
        match self
            .action_handlers
            .iter_mut()
            .find(|(name, _)| *name == action_name)
        {
            Some(entry) => entry.1 = handler,
            None => self.action_handlers.push((action_name, handler)),
        }
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.action_handlers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Run the first handler whose action name is a key of the body.
    /// Without one the request goes to the wrapped application.
    pub async fn action(&self, request: ApiRequest, id: &str) -> Result<ApiResponse, ApiFault> {
        let body = request.json_body()?;
        for (action_name, handler) in &self.action_handlers {
            if body.get(action_name).is_some() {
                return handler.handle(&body, &request, id).await;
            }
        }
        Ok(self.application.call(request).await)
    }
}

impl fmt::Debug for ActionExtensionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionExtensionController")
            .field("actions", &self.action_names())
            .finish()
    }
}

/// Post-processes the wrapped application's response for one request extension key
pub struct RequestExtensionController {
    application: Arc<dyn Application>,
    handlers: Vec<Arc<dyn RequestHandler>>,
}

impl RequestExtensionController {
    pub fn new(application: Arc<dyn Application>) -> Self {
        Self {
            application,
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn RequestHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Call the wrapped application, then pass its response through every
    /// handler in registration order. The last handler's result is returned.
    pub async fn process(&self, request: ApiRequest) -> Result<ApiResponse, ApiFault> {
        let mut response = self.application.call(request.clone()).await;
        for handler in &self.handlers {
            response = handler.handle(&request, response).await?;
        }
        Ok(response)
    }
}

impl fmt::Debug for RequestExtensionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExtensionController")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
