use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::ApiFault;

/// One stored resource instance, keyed by attribute name
pub type Record = Map<String, Value>;

/// Equality filters of a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// `(attribute, value)`; a record matches when every filter matches
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Whether `record` satisfies every filter. Non-string values compare by their JSON text.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|(key, expected)| match record.get(key) {
            Some(Value::String(actual)) => actual == expected,
            Some(other) => other.to_string() == *expected,
            None => false,
        })
    }
}

/// A service plugin: the backend of one or more extension resources
#[async_trait]
pub trait ServicePlugin: Send + Sync {
    /// Registry key, e.g. `"VNFM"`
    fn plugin_type(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    async fn list(&self, resource: &str, query: &ListQuery) -> Result<Vec<Record>, ApiFault>;

    async fn show(&self, resource: &str, id: &str) -> Result<Record, ApiFault>;

    async fn create(&self, resource: &str, body: Record) -> Result<Record, ApiFault>;

    async fn update(&self, resource: &str, id: &str, body: Record) -> Result<Record, ApiFault>;

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ApiFault>;

    /// A member action such as `POST /vnfs/{id}/heal`
    async fn member_action(
        &self,
        resource: &str,
        action: &str,
        _id: &str,
        _body: Option<Value>,
    ) -> Result<Value, ApiFault> {
        Err(ApiFault::NotFound(format!(
            "Action {} is not supported on {}",
            action, resource
        )))
    }
}
