use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::ApiFault;
use crate::service::traits::{ListQuery, Record, ServicePlugin};

/// A service plugin keeping records in memory, in insertion order
pub struct InMemoryServicePlugin {
    plugin_type: String,
    records: RwLock<BTreeMap<String, Vec<Record>>>,
}

impl InMemoryServicePlugin {
    pub fn new(plugin_type: impl Into<String>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored records of `resource`
    pub async fn count(&self, resource: &str) -> usize {
        self.records
            .read()
            .await
            .get(resource)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn not_found(resource: &str, id: &str) -> ApiFault {
        ApiFault::not_found(format!("{} {}", resource, id))
    }
}

#[async_trait]
impl ServicePlugin for InMemoryServicePlugin {
    fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    fn description(&self) -> &str {
        "In-memory service plugin"
    }

    async fn list(&self, resource: &str, query: &ListQuery) -> Result<Vec<Record>, ApiFault> {
        let records = self.records.read().await;
        Ok(records
            .get(resource)
            .map(|items| items.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn show(&self, resource: &str, id: &str) -> Result<Record, ApiFault> {
        let records = self.records.read().await;
        records
            .get(resource)
            .and_then(|items| items.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .ok_or_else(|| Self::not_found(resource, id))
    }

    async fn create(&self, resource: &str, mut body: Record) -> Result<Record, ApiFault> {
        let mut records = self.records.write().await;
        let items = records.entry(resource.to_string()).or_default();

        let id = match body.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        if items.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(ApiFault::Conflict(format!("{} {} already exists", resource, id)));
        }
        body.insert("id".to_string(), Value::String(id));
        items.push(body.clone());
        Ok(body)
    }

    async fn update(&self, resource: &str, id: &str, body: Record) -> Result<Record, ApiFault> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(resource)
            .and_then(|items| items.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| Self::not_found(resource, id))?;
        for (key, value) in body {
            if key != "id" {
                record.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ApiFault> {
        let mut records = self.records.write().await;
        let items = records
            .get_mut(resource)
            .ok_or_else(|| Self::not_found(resource, id))?;
        let before = items.len();
        items.retain(|r| record_id(r) != Some(id));
        if items.len() == before {
            return Err(Self::not_found(resource, id));
        }
        Ok(())
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}
