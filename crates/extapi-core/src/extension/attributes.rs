use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties of one attribute (`allow_post`, `allow_put`, `default`, `is_visible`, ...)
pub type AttributeProperties = Map<String, Value>;

/// Attribute name → properties, for one resource
pub type ResourceAttributes = BTreeMap<String, AttributeProperties>;

/// Resource name → attribute name → attribute properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, ResourceAttributes>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a JSON document of the same shape
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceAttributes> {
        self.0.get(name)
    }

    pub fn resource_mut(&mut self, name: &str) -> Option<&mut ResourceAttributes> {
        self.0.get_mut(name)
    }

    pub fn contains_resource(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Properties of a single attribute
    pub fn attribute(&self, resource: &str, attribute: &str) -> Option<&AttributeProperties> {
        self.0.get(resource).and_then(|attrs| attrs.get(attribute))
    }

    /// Resource names in sorted order
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResourceAttributes)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace the attributes of `resource`
    pub fn insert_resource(&mut self, resource: impl Into<String>, attrs: ResourceAttributes) {
        self.0.insert(resource.into(), attrs);
    }

    /// Set the properties of one attribute, creating the resource if needed
    pub fn set_attribute(
        &mut self,
        resource: impl Into<String>,
        attribute: impl Into<String>,
        properties: AttributeProperties,
    ) {
        self.0
            .entry(resource.into())
            .or_default()
            .insert(attribute.into(), properties);
    }

    /// Merge `other` into this map.
    ///
    /// Attributes of a resource already present are overwritten whole; a
    /// resource that is absent, or present with no attributes, is taken
    /// as given.
    pub fn merge(&mut self, other: AttributeMap) {
        for (resource, attrs) in other.0 {
            match self.0.entry(resource) {
                Entry::Occupied(mut entry) if !entry.get().is_empty() => {
                    entry.get_mut().extend(attrs);
                }
                Entry::Occupied(mut entry) => {
                    entry.insert(attrs);
                }
                Entry::Vacant(entry) => {
                    entry.insert(attrs);
                }
            }
        }
    }

    /// Fold other extensions' contributions into the resources this map owns.
    ///
    /// Only resources already present here are touched; attributes of
    /// `extended` overwrite ours.
    pub fn absorb_extended(&mut self, extended: &AttributeMap) {
        for (resource, attrs) in self.0.iter_mut() {
            if let Some(extended_attrs) = extended.0.get(resource) {
                if !extended_attrs.is_empty() {
                    attrs.extend(extended_attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
    }
}

impl From<BTreeMap<String, ResourceAttributes>> for AttributeMap {
    fn from(map: BTreeMap<String, ResourceAttributes>) -> Self {
        Self(map)
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, ResourceAttributes);
    type IntoIter = std::collections::btree_map::IntoIter<String, ResourceAttributes>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
