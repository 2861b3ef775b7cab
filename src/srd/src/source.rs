//! Source collaborator: where list and detail documents come from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::Record;
use crate::types::Collection;

/// Error fetching a document from a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Entry in a list document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub index: String,
    pub name: String,
    /// Detail reference as given by the source, usually a relative URL
    pub url: Option<String>,
}

impl ResourceRef {
    /// Reference to pass to [`RulesSource::fetch_detail`]
    pub fn detail_ref(&self, collection: Collection) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("/api/{}/{}", collection.path(), self.index),
        }
    }
}

/// A list document: `{count, results: [{index, name, url}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList {
    pub count: usize,
    pub results: Vec<ResourceRef>,
}

impl ResourceList {
    /// Decode a list document tolerantly. Entries without an identifier
    /// are dropped since they cannot be keyed.
    pub fn from_value(value: &Value) -> Self {
        let record = Record::new(value);
        let results: Vec<ResourceRef> = record
            .list("/results")
            .or_default()
            .into_iter()
            .filter_map(|entry| {
                let index = entry.str("/index").ok()?.trim();
                if index.is_empty() {
                    return None;
                }
                Some(ResourceRef {
                    index: index.to_string(),
                    name: entry.text("/name"),
                    url: entry.str("/url").ok().map(str::to_string),
                })
            })
            .collect();
        let count = record
            .int("/count")
            .ok()
            .and_then(|c| usize::try_from(c).ok())
            .unwrap_or(results.len());
        Self { count, results }
    }
}

/// Fetch-by-identifier access to the external dataset
pub trait RulesSource {
    /// Fetch the identifier list for a collection
    fn fetch_list(&self, collection: Collection) -> Result<ResourceList, SourceError>;

    /// Fetch one detail document by reference
    fn fetch_detail(&self, reference: &str) -> Result<Value, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_from_value() {
        let doc = json!({
            "count": 3,
            "results": [
                {"index": "aboleth", "name": "Aboleth", "url": "/api/monsters/aboleth"},
                {"name": "No Index"},
                {"index": "acolyte", "name": "Acolyte"}
            ]
        });
        let list = ResourceList::from_value(&doc);
        assert_eq!(list.count, 3);
        assert_eq!(list.results.len(), 2);
        assert_eq!(list.results[0].detail_ref(Collection::Monsters), "/api/monsters/aboleth");
        assert_eq!(list.results[1].detail_ref(Collection::Monsters), "/api/monsters/acolyte");
    }

    #[test]
    fn test_malformed_list_is_empty() {
        let list = ResourceList::from_value(&json!({"results": "nope"}));
        assert_eq!(list, ResourceList::default());
        let list = ResourceList::from_value(&json!([1, 2, 3]));
        assert!(list.results.is_empty());
    }
}
