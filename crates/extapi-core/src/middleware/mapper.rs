//! Route table of the extension middleware.
//!
//! Templates use `{name}` placeholders. A placeholder matches within one
//! path segment, dots included. `{format}` only matches a name from
//! [`FORMATS`], so `/vnfs/{id}.{format}` splits `/vnfs/abc.json` into
//! `id = abc` and `format = json` while `/vnfs/abc.def` stays unmatched.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use regex::Regex;

use crate::api::{Controller, RouteParams};
use crate::middleware::controllers::{ActionExtensionController, RequestExtensionController};
use crate::middleware::error::MiddlewareError;

/// Response formats accepted as a `.{format}` path suffix
pub const FORMATS: &[&str] = &["json", "xml"];

/// What a matched route dispatches to
#[derive(Clone)]
pub enum RouteTarget {
    /// A resource controller action (`index`, `show`, a member action, ...)
    Resource {
        controller: Arc<dyn Controller>,
        action: String,
    },
    /// `POST /<collection>/{id}/action`
    Action(Arc<ActionExtensionController>),
    /// A request extension route
    Request(Arc<RequestExtensionController>),
}

impl RouteTarget {
    /// Name of the action the target runs
    pub fn action(&self) -> &str {
        match self {
            RouteTarget::Resource { action, .. } => action,
            RouteTarget::Action(_) => "action",
            RouteTarget::Request(_) => "process",
        }
    }
}

impl fmt::Debug for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Resource { action, .. } => write!(f, "Resource({})", action),
            RouteTarget::Action(_) => write!(f, "Action"),
            RouteTarget::Request(_) => write!(f, "Request"),
        }
    }
}

/// A compiled route
#[derive(Debug, Clone)]
pub struct Route {
    pub template: String,
    pub method: Option<Method>,
    pub target: RouteTarget,
    regex: Regex,
}

impl Route {
    fn captures(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(path)?;
        let params = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();
        Some(params)
    }
}

/// A successful lookup
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: RouteParams,
}

/// Routes in registration order; the first match wins
#[derive(Debug, Default)]
pub struct Mapper {
    routes: Vec<Route>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one route. `method` of `None` matches any method.
    pub fn connect(
        &mut self,
        template: &str,
        method: Option<Method>,
        target: RouteTarget,
    ) -> Result<(), MiddlewareError> {
        let regex = compile_template(template)?;
        self.routes.push(Route {
            template: template.to_string(),
            method,
            target,
            regex,
        });
        Ok(())
    }

    /// Add the `.{format}` variant of `template`, then `template` itself
    pub fn connect_with_format(
        &mut self,
        template: &str,
        method: Option<Method>,
        target: RouteTarget,
    ) -> Result<(), MiddlewareError> {
        self.connect(&format!("{}.{{format}}", template), method.clone(), target.clone())?;
        self.connect(template, method, target)
    }

    /// Standard routes of a collection.
    ///
    /// Under `<prefix>/<collection>`: member actions on `{id}/<action>`,
    /// `index` (GET) and `create` (POST), then `show` (GET), `update` (PUT)
    /// and `delete` (DELETE) on `{id}`. Every route has a format variant.
    pub fn resource(
        &mut self,
        collection: &str,
        controller: Arc<dyn Controller>,
        member_actions: &BTreeMap<String, Method>,
        path_prefix: &str,
    ) -> Result<(), MiddlewareError> {
        let collection_path = format!("{}/{}", path_prefix, collection);
        let member_path = format!("{}/{{id}}", collection_path);
        let target = |action: &str| RouteTarget::Resource {
            controller: Arc::clone(&controller),
            action: action.to_string(),
        };

        for (action, method) in member_actions {
            self.connect_with_format(
                &format!("{}/{}", member_path, action),
                Some(method.clone()),
                target(action),
            )?;
        }
        self.connect_with_format(&collection_path, Some(Method::GET), target("index"))?;
        self.connect_with_format(&collection_path, Some(Method::POST), target("create"))?;
        self.connect_with_format(&member_path, Some(Method::GET), target("show"))?;
        self.connect_with_format(&member_path, Some(Method::PUT), target("update"))?;
        self.connect_with_format(&member_path, Some(Method::DELETE), target("delete"))?;
        Ok(())
    }

    /// First route matching `method` and `path`
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method.as_ref().is_none_or(|m| m == method))
            .find_map(|route| route.captures(path).map(|params| RouteMatch { route, params }))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Turn a `{name}` template into an anchored regex
pub fn compile_template(template: &str) -> Result<Regex, MiddlewareError> {
    let invalid = |message: String| MiddlewareError::InvalidRoute {
        template: template.to_string(),
        message,
    };

    let mut pattern = String::from("^");
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
        let name = &after[..close];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(format!("invalid variable name '{}'", name)));
        }
        if name == "format" {
            pattern.push_str(&format!("(?P<format>{})", FORMATS.join("|")));
        } else {
            pattern.push_str(&format!("(?P<{}>[^/]+?)", name));
        }
        rest = &after[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    Regex::new(&pattern).map_err(|e| invalid(e.to_string()))
}
