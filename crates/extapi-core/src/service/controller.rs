//! Generic resource controller over a [`ServicePlugin`].
//!
//! Request bodies are checked against the resource's attribute properties:
//!
//! - `allow_post` / `allow_put`: whether the attribute may be set on create / update
//! - `default`: filled in on create when the attribute is missing
//! - `is_visible`: `false` hides the attribute from responses
//!
//! A create without a `default` for an attribute that allows POST requires it.
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::api::{ApiFault, ApiRequest, ApiResponse, Controller, RouteParams};
use crate::extension::attributes::ResourceAttributes;
use crate::service::traits::{ListQuery, Record, ServicePlugin};

/// Query parameters with a meaning of their own, never used as filters
const RESERVED_QUERY_KEYS: &[&str] = &["fields", "limit", "marker", "sort_key", "sort_dir", "page_reverse"];

pub struct ServiceResourceController {
    collection: String,
    resource: String,
    plugin: Arc<dyn ServicePlugin>,
    attr_info: ResourceAttributes,
    member_actions: BTreeMap<String, Method>,
    allow_bulk: bool,
    allow_pagination: bool,
    allow_sorting: bool,
    pagination_max_limit: Option<usize>,
}

impl ServiceResourceController {
    pub fn new(
        collection: impl Into<String>,
        resource: impl Into<String>,
        plugin: Arc<dyn ServicePlugin>,
        attr_info: ResourceAttributes,
    ) -> Self {
        Self {
            collection: collection.into(),
            resource: resource.into(),
            plugin,
            attr_info,
            member_actions: BTreeMap::new(),
            allow_bulk: false,
            allow_pagination: false,
            allow_sorting: false,
            pagination_max_limit: None,
        }
    }

    pub fn with_member_actions(mut self, member_actions: BTreeMap<String, Method>) -> Self {
        self.member_actions = member_actions;
        self
    }

    pub fn with_bulk(mut self, allow_bulk: bool) -> Self {
        self.allow_bulk = allow_bulk;
        self
    }

    pub fn with_pagination(mut self, allow_pagination: bool, max_limit: Option<usize>) -> Self {
        self.allow_pagination = allow_pagination;
        self.pagination_max_limit = max_limit;
        self
    }

    pub fn with_sorting(mut self, allow_sorting: bool) -> Self {
        self.allow_sorting = allow_sorting;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn property(&self, attribute: &str, property: &str) -> Option<&Value> {
        self.attr_info.get(attribute).and_then(|props| props.get(property))
    }

    fn flag(&self, attribute: &str, property: &str) -> bool {
        self.property(attribute, property)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Drop hidden attributes, then keep only `fields` when any were requested
    fn view(&self, mut record: Record, fields: &[String]) -> Value {
        record.retain(|key, _| {
            let hidden = self
                .property(key, "is_visible")
                .and_then(Value::as_bool)
                .is_some_and(|visible| !visible);
            !hidden && (fields.is_empty() || fields.iter().any(|f| f == key))
        });
        Value::Object(record)
    }

    fn required_id<'p>(&self, params: &'p RouteParams) -> Result<&'p str, ApiFault> {
        params
            .get("id")
            .map(String::as_str)
            .ok_or_else(|| ApiFault::BadRequest(format!("Missing {} id", self.resource)))
    }

    fn prepare_create(&self, item: &Value) -> Result<Record, ApiFault> {
        let mut body = item.as_object().cloned().ok_or_else(|| {
            ApiFault::BadRequest(format!("Body of {} must be an object", self.resource))
        })?;

        if !self.attr_info.is_empty() {
            let unknown: Vec<&str> = body
                .keys()
                .filter(|key| !self.attr_info.contains_key(*key))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                return Err(ApiFault::BadRequest(format!(
                    "Unrecognized attribute(s) '{}'",
                    unknown.join(", ")
                )));
            }
        }

        for (attribute, props) in &self.attr_info {
            let allow_post = self.flag(attribute, "allow_post");
            if body.contains_key(attribute) {
                if !allow_post {
                    return Err(ApiFault::BadRequest(format!(
                        "Attribute '{}' not allowed in POST",
                        attribute
                    )));
                }
                continue;
            }
            match props.get("default") {
                Some(default) => {
                    body.insert(attribute.clone(), default.clone());
                }
                None if allow_post => {
                    return Err(ApiFault::BadRequest(format!(
                        "Failed to parse request. Required attribute '{}' not specified",
                        attribute
                    )));
                }
                None => {}
            }
        }
        Ok(body)
    }

    fn prepare_update(&self, item: &Value) -> Result<Record, ApiFault> {
        let body = item.as_object().cloned().ok_or_else(|| {
            ApiFault::BadRequest(format!("Body of {} must be an object", self.resource))
        })?;
        for attribute in body.keys() {
            if self.attr_info.contains_key(attribute) && !self.flag(attribute, "allow_put") {
                return Err(ApiFault::BadRequest(format!(
                    "Cannot update read-only attribute {}",
                    attribute
                )));
            }
        }
        Ok(body)
    }

    async fn index(&self, request: &ApiRequest) -> Result<ApiResponse, ApiFault> {
        let pairs = request.query_pairs();
        let fields: Vec<String> = request.query_values("fields");
        let filters = pairs
            .iter()
            .filter(|(key, _)| !RESERVED_QUERY_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();

        let mut records = self
            .plugin
            .list(&self.resource, &ListQuery { filters })
            .await?;

        if self.allow_sorting {
            self.sort(&mut records, request)?;
        }

        let mut body = serde_json::Map::new();
        if self.allow_pagination {
            let (page, links) = self.paginate(records, request)?;
            records = page;
            if !links.is_empty() {
                body.insert(format!("{}_links", self.collection), Value::Array(links));
            }
        }

        let items: Vec<Value> = records
            .into_iter()
            .map(|record| self.view(record, &fields))
            .collect();
        body.insert(self.collection.clone(), Value::Array(items));
        Ok(ApiResponse::json(StatusCode::OK, &Value::Object(body)))
    }

    fn sort(&self, records: &mut [Record], request: &ApiRequest) -> Result<(), ApiFault> {
        let keys = request.query_values("sort_key");
        if keys.is_empty() {
            return Ok(());
        }
        let dirs = request.query_values("sort_dir");
        if !dirs.is_empty() && dirs.len() != keys.len() {
            return Err(ApiFault::BadRequest(
                "The number of sort_keys and sort_dirs must be same".to_string(),
            ));
        }

        let mut order = Vec::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            if !self.attr_info.is_empty() && !self.attr_info.contains_key(key) {
                return Err(ApiFault::BadRequest(format!("{} is an invalid attribute for sort_key", key)));
            }
            let ascending = match dirs.get(index).map(String::as_str) {
                None | Some("asc") => true,
                Some("desc") => false,
                Some(other) => {
                    return Err(ApiFault::BadRequest(format!(
                        "{} is an invalid value for sort_dir, valid values are 'asc' and 'desc'",
                        other
                    )));
                }
            };
            order.push((key.clone(), ascending));
        }

        records.sort_by(|a, b| {
            for (key, ascending) in &order {
                let ordering = compare_values(a.get(key), b.get(key));
                let ordering = if *ascending { ordering } else { ordering.reverse() };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }

    fn paginate(&self, records: Vec<Record>, request: &ApiRequest) -> Result<(Vec<Record>, Vec<Value>), ApiFault> {
        let limit = match request.query_value("limit") {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                ApiFault::BadRequest(format!("Limit must be a non-negative integer, got '{}'", raw))
            })?),
            None => None,
        };
        let limit = match (limit, self.pagination_max_limit) {
            (Some(0), max) | (None, max) => max,
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (Some(limit), None) => Some(limit),
        };

        let start = match request.query_value("marker") {
            Some(marker) => {
                let position = records
                    .iter()
                    .position(|r| r.get("id").and_then(Value::as_str) == Some(marker.as_str()))
                    .ok_or_else(|| ApiFault::not_found(format!("Marker {}", marker)))?;
                position + 1
            }
            None => 0,
        };

        let Some(limit) = limit else {
            return Ok((records.into_iter().skip(start).collect(), Vec::new()));
        };

        let total = records.len();
        let page: Vec<Record> = records.into_iter().skip(start).take(limit).collect();
        let mut links = Vec::new();
        if start + page.len() < total {
            if let Some(last_id) = page.last().and_then(|r| r.get("id")).and_then(Value::as_str) {
                links.push(json!({
                    "rel": "next",
                    "href": next_link(request, limit, last_id),
                }));
            }
        }
        Ok((page, links))
    }

    /// Delete the records a failed bulk create already wrote
    async fn rollback_bulk(&self, created: &[Record]) {
        for record in created.iter().rev() {
            let Some(id) = record.get("id").and_then(Value::as_str) else {
                continue;
            };
            if let Err(e) = self.plugin.delete(&self.resource, id).await {
                log::error!(
                    "Unable to roll back {} {} after a failed bulk create: {}",
                    self.resource,
                    id,
                    e
                );
            }
        }
    }

    async fn create(&self, request: &ApiRequest) -> Result<ApiResponse, ApiFault> {
        let body = request.json_body()?;

        if let Some(items) = body.get(&self.collection).and_then(Value::as_array) {
            if !self.allow_bulk {
                return Err(ApiFault::BadRequest("Bulk operation not supported".to_string()));
            }
            let mut prepared = Vec::with_capacity(items.len());
            for item in items {
                let inner = item.get(&self.resource).unwrap_or(item);
                prepared.push(self.prepare_create(inner)?);
            }
            let mut created: Vec<Record> = Vec::with_capacity(prepared.len());
            for record in prepared {
                match self.plugin.create(&self.resource, record).await {
                    Ok(record) => created.push(record),
                    Err(fault) => {
                        self.rollback_bulk(&created).await;
                        return Err(fault);
                    }
                }
            }
            let created: Vec<Value> = created.into_iter().map(|r| self.view(r, &[])).collect();
            return Ok(ApiResponse::json(
                StatusCode::CREATED,
                &json!({ self.collection.clone(): created }),
            ));
        }

        let item = body.get(&self.resource).ok_or_else(|| {
            ApiFault::BadRequest(format!("Unable to find '{}' in request body", self.resource))
        })?;
        let record = self.prepare_create(item)?;
        let record = self.plugin.create(&self.resource, record).await?;
        Ok(ApiResponse::json(
            StatusCode::CREATED,
            &json!({ self.resource.clone(): self.view(record, &[]) }),
        ))
    }

    async fn update(&self, request: &ApiRequest, id: &str) -> Result<ApiResponse, ApiFault> {
        let body = request.json_body()?;
        let item = body.get(&self.resource).ok_or_else(|| {
            ApiFault::BadRequest(format!("Unable to find '{}' in request body", self.resource))
        })?;
        let changes = self.prepare_update(item)?;
        let record = self.plugin.update(&self.resource, id, changes).await?;
        Ok(ApiResponse::json(
            StatusCode::OK,
            &json!({ self.resource.clone(): self.view(record, &[]) }),
        ))
    }
}

#[async_trait]
impl Controller for ServiceResourceController {
    async fn dispatch(
        &self,
        action: &str,
        request: ApiRequest,
        params: &RouteParams,
    ) -> Result<ApiResponse, ApiFault> {
        match action {
            "index" => self.index(&request).await,
            "create" => self.create(&request).await,
            "show" => {
                let id = self.required_id(params)?;
                let fields = request.query_values("fields");
                let record = self.plugin.show(&self.resource, id).await?;
                Ok(ApiResponse::json(
                    StatusCode::OK,
                    &json!({ self.resource.clone(): self.view(record, &fields) }),
                ))
            }
            "update" => {
                let id = self.required_id(params)?;
                self.update(&request, id).await
            }
            "delete" => {
                let id = self.required_id(params)?;
                self.plugin.delete(&self.resource, id).await?;
                Ok(ApiResponse::empty(StatusCode::NO_CONTENT))
            }
            member if self.member_actions.contains_key(member) => {
                let id = self.required_id(params)?;
                let body = request.json_body().ok();
                let result = self
                    .plugin
                    .member_action(&self.resource, member, id, body)
                    .await?;
                Ok(ApiResponse::json(StatusCode::OK, &result))
            }
            other => Err(ApiFault::NotFound(format!(
                "Action {} is not supported on {}",
                other, self.collection
            ))),
        }
    }
}

/// The request path and query with `limit` and `marker` replaced
fn next_link(request: &ApiRequest, limit: usize, marker: &str) -> String {
    let mut query: Vec<String> = request
        .query_pairs()
        .into_iter()
        .filter(|(key, _)| key != "limit" && key != "marker")
        .map(|(key, value)| format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value)))
        .collect();
    query.push(format!("limit={}", limit));
    query.push(format!("marker={}", urlencoding::encode(marker)));
    format!("{}?{}", request.path, query.join("&"))
}

/// Order JSON values: missing < null < bool < number < string, others by JSON text
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) if rank(a) == rank(b) => x.to_string().cmp(&y.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}
