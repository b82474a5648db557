// src/model/index.rs
//! The in-memory record index: table name, then record id.

use super::blocks::BlockRecord;
use super::collections::{CollectionRecord, QueryResult, ViewRecord};
use super::discussions::{Comment, Discussion, Reaction};
use crate::error::AppError;
use crate::types::NodeId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Read-only index of every record in an export.
///
/// Built once, then shared by reference with every stage of the conversion.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    pub blocks: HashMap<NodeId, BlockRecord>,
    pub collections: HashMap<NodeId, CollectionRecord>,
    pub views: HashMap<NodeId, ViewRecord>,
    pub queries: HashMap<NodeId, HashMap<NodeId, QueryResult>>,
    pub discussions: HashMap<NodeId, Discussion>,
    pub comments: HashMap<NodeId, Comment>,
    pub reactions: HashMap<NodeId, Reaction>,
    pub signed_urls: HashMap<NodeId, String>,
    /// Raw record count of every table present in the export.
    pub table_sizes: BTreeMap<String, usize>,
    /// Records that were present but could not be parsed.
    pub skipped_records: usize,
}

impl RecordIndex {
    /// Parses an index from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Reads and parses an index file.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&text).map_err(|source| AppError::JsonParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds an index from a parsed JSON value.
    ///
    /// Records without a `value` (inaccessible) are absent from the index;
    /// records that fail to parse are logged, counted and skipped.
    pub fn from_value(value: Value) -> Self {
        let mut index = RecordIndex::default();
        let Value::Object(tables) = value else {
            log::warn!("Export index is not an object; treating it as empty");
            return index;
        };

        for (table, records) in tables {
            let Value::Object(records) = records else {
                log::warn!("Table '{}' is not an object, skipping", table);
                continue;
            };
            index.table_sizes.insert(table.clone(), records.len());

            match table.as_str() {
                "block" => index.blocks = load_records(&table, records, &mut index.skipped_records),
                "collection" => {
                    index.collections = load_records(&table, records, &mut index.skipped_records)
                }
                "collection_view" => {
                    index.views = load_records(&table, records, &mut index.skipped_records)
                }
                "discussion" => {
                    index.discussions = load_records(&table, records, &mut index.skipped_records)
                }
                "comment" => {
                    index.comments = load_records(&table, records, &mut index.skipped_records)
                }
                "reaction" => {
                    index.reactions = load_records(&table, records, &mut index.skipped_records)
                }
                "collection_query" => index.queries = load_queries(records),
                "signed_urls" => {
                    index.signed_urls = records
                        .into_iter()
                        .filter_map(|(id, url)| {
                            url.as_str().map(|url| (NodeId::new(&id), url.to_string()))
                        })
                        .collect()
                }
                _ => log::debug!("Ignoring table '{}' ({} records)", table, records.len()),
            }
        }

        log::info!(
            "Loaded index: {} blocks, {} collections, {} views, {} discussions ({} records skipped)",
            index.blocks.len(),
            index.collections.len(),
            index.views.len(),
            index.discussions.len(),
            index.skipped_records
        );
        index
    }

    pub fn block(&self, id: &NodeId) -> Option<&BlockRecord> {
        self.blocks.get(id)
    }

    pub fn collection(&self, id: &NodeId) -> Option<&CollectionRecord> {
        self.collections.get(id)
    }

    pub fn view(&self, id: &NodeId) -> Option<&ViewRecord> {
        self.views.get(id)
    }

    pub fn discussion(&self, id: &NodeId) -> Option<&Discussion> {
        self.discussions.get(id)
    }

    pub fn comment(&self, id: &NodeId) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn signed_url(&self, id: &NodeId) -> Option<&str> {
        self.signed_urls.get(id).map(String::as_str)
    }

    /// Precomputed members of a view, if the export carries them.
    pub fn query_members(&self, collection: &NodeId, view: &NodeId) -> Option<&QueryResult> {
        self.queries.get(collection).and_then(|views| views.get(view))
    }

    /// Every live block whose parent is the collection, in unspecified order.
    pub fn scan_collection_members(&self, collection: &NodeId) -> Vec<&BlockRecord> {
        self.blocks
            .values()
            .filter(|block| block.alive && block.is_member_of(collection))
            .collect()
    }
}

fn load_records<T: DeserializeOwned>(
    table: &str,
    records: Map<String, Value>,
    skipped: &mut usize,
) -> HashMap<NodeId, T> {
    let mut loaded = HashMap::with_capacity(records.len());
    for (id, envelope) in records {
        let value = match envelope {
            Value::Object(mut envelope) => envelope.remove("value"),
            _ => None,
        };
        let Some(value) = value.filter(|v| !v.is_null()) else {
            log::debug!("Record {}/{} has no value (inaccessible)", table, id);
            continue;
        };
        // The record's own id wins over the table key
        let key = value
            .get("id")
            .and_then(Value::as_str)
            .map(NodeId::new)
            .unwrap_or_else(|| NodeId::new(&id));
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                loaded.insert(key, record);
            }
            Err(e) => {
                log::warn!("Skipping malformed record {}/{}: {}", table, id, e);
                *skipped += 1;
            }
        }
    }
    loaded
}

fn load_queries(records: Map<String, Value>) -> HashMap<NodeId, HashMap<NodeId, QueryResult>> {
    records
        .into_iter()
        .filter_map(|(collection, views)| match views {
            Value::Object(views) => Some((NodeId::new(&collection), views)),
            _ => None,
        })
        .map(|(collection, views)| {
            let results = views
                .into_iter()
                .filter_map(|(view, result)| {
                    serde_json::from_value::<QueryResult>(result)
                        .map_err(|e| {
                            log::warn!("Skipping malformed query result {}/{}: {}", collection, view, e)
                        })
                        .ok()
                        .map(|result| (NodeId::new(&view), result))
                })
                .collect();
            (collection, results)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use serde_json::json;

    fn sample_index() -> RecordIndex {
        RecordIndex::from_value(json!({
            "block": {
                "b9afc46848544888b94d961d802add16": {
                    "role": "reader",
                    "value": {"id": "b9afc468-4854-4888-b94d-961d802add16", "type": "page",
                              "properties": {"title": [["Intro"]]},
                              "parent_id": "s1", "parent_table": "space"}
                },
                "hidden": {"role": "none"},
                "broken": {"value": {"id": "broken"}}
            },
            "collection_query": {
                "c1": {"v1": {"blockIds": ["r1"]}}
            },
            "signed_urls": {"b9afc468-4854-4888-b94d-961d802add16": "https://files.example/x.png"},
            "notion_user": {"u1": {"value": {}}}
        }))
    }

    #[test]
    fn test_records_are_keyed_by_normalized_id() {
        let index = sample_index();
        let id = NodeId::new("b9afc468-4854-4888-b94d-961d802add16");
        assert_eq!(index.block(&id).unwrap().kind, BlockKind::Page);
        assert_eq!(index.signed_url(&id), Some("https://files.example/x.png"));
    }

    #[test]
    fn test_inaccessible_and_malformed_records() {
        let index = sample_index();
        assert!(index.block(&NodeId::new("hidden")).is_none());
        assert!(index.block(&NodeId::new("broken")).is_none());
        assert_eq!(index.skipped_records, 1);
        assert_eq!(index.table_sizes["block"], 3);
        assert_eq!(index.table_sizes["notion_user"], 1);
    }

    #[test]
    fn test_query_members() {
        let index = sample_index();
        let members: Vec<_> = index
            .query_members(&NodeId::new("c1"), &NodeId::new("v1"))
            .unwrap()
            .members()
            .cloned()
            .collect();
        assert_eq!(members, vec![NodeId::new("r1")]);
        assert!(index
            .query_members(&NodeId::new("c1"), &NodeId::new("v2"))
            .is_none());
    }

    #[test]
    fn test_non_object_root_is_empty() {
        let index = RecordIndex::from_value(json!([1, 2]));
        assert!(index.blocks.is_empty());
    }
}
