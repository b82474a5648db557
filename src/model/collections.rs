// src/model/collections.rs
//! Collections (tabular databases), their views and precomputed query results.

use super::blocks::ParentTable;
use super::rich_text::RichText;
use crate::types::NodeId;
use indexmap::IndexMap;
use serde::Deserialize;

/// Kind of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
    Title,
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Person,
    File,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    Relation,
    Rollup,
    CreatedTime,
    LastEditedTime,
    CreatedBy,
    LastEditedBy,
    Unrecognized(String),
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "title" => FieldKind::Title,
            "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "select" => FieldKind::Select,
            "multi_select" => FieldKind::MultiSelect,
            "date" => FieldKind::Date,
            "person" => FieldKind::Person,
            "file" => FieldKind::File,
            "checkbox" => FieldKind::Checkbox,
            "url" => FieldKind::Url,
            "email" => FieldKind::Email,
            "phone_number" => FieldKind::PhoneNumber,
            "formula" => FieldKind::Formula,
            "relation" => FieldKind::Relation,
            "rollup" => FieldKind::Rollup,
            "created_time" => FieldKind::CreatedTime,
            "last_edited_time" => FieldKind::LastEditedTime,
            "created_by" => FieldKind::CreatedBy,
            "last_edited_by" => FieldKind::LastEditedBy,
            _ => FieldKind::Unrecognized(name),
        }
    }
}

/// One entry of a collection schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// A `collection` record.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRecord {
    pub id: NodeId,
    #[serde(default)]
    pub name: RichText,
    #[serde(default)]
    pub schema: IndexMap<String, SchemaField>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub parent_table: ParentTable,
}

impl CollectionRecord {
    /// Schema fields in declaration order, the title field excluded.
    pub fn data_fields(&self) -> impl Iterator<Item = (&String, &SchemaField)> {
        self.schema
            .iter()
            .filter(|(_, field)| field.kind != FieldKind::Title)
    }
}

/// Kind of a collection view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ViewKind {
    Table,
    List,
    Board,
    Gallery,
    Calendar,
    Timeline,
    Unrecognized(String),
}

impl From<String> for ViewKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "table" => ViewKind::Table,
            "list" => ViewKind::List,
            "board" => ViewKind::Board,
            "gallery" => ViewKind::Gallery,
            "calendar" => ViewKind::Calendar,
            "timeline" => ViewKind::Timeline,
            _ => ViewKind::Unrecognized(name),
        }
    }
}

/// Visibility of one field inside a view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyVisibility {
    pub property: String,
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewFormat {
    pub table_properties: Option<Vec<PropertyVisibility>>,
    pub list_properties: Option<Vec<PropertyVisibility>>,
}

/// A `collection_view` record.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewRecord {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: ViewKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub format: ViewFormat,
}

/// How a view lays out its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    List,
}

impl ViewRecord {
    /// Table mode when the view declares table properties, list mode otherwise.
    pub fn mode(&self) -> ViewMode {
        if self.format.table_properties.is_some() {
            ViewMode::Table
        } else if self.format.list_properties.is_some() {
            ViewMode::List
        } else if self.kind == ViewKind::Table {
            ViewMode::Table
        } else {
            ViewMode::List
        }
    }

    /// Keys of the visible fields, in view order.
    pub fn visible_properties(&self) -> Vec<&str> {
        let declared = match self.mode() {
            ViewMode::Table => self.format.table_properties.as_ref(),
            ViewMode::List => self.format.list_properties.as_ref(),
        };
        declared
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.visible)
                    .map(|entry| entry.property.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Display name, `None` when unnamed or blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupResults {
    #[serde(rename = "blockIds", default)]
    pub block_ids: Vec<NodeId>,
}

/// Precomputed members of one view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "blockIds", default)]
    pub block_ids: Vec<NodeId>,
    #[serde(default)]
    pub collection_group_results: Option<GroupResults>,
}

impl QueryResult {
    /// Member ids, whichever of the two shapes the export used.
    pub fn members(&self) -> impl Iterator<Item = &NodeId> {
        self.block_ids.iter().chain(
            self.collection_group_results
                .iter()
                .flat_map(|group| group.block_ids.iter()),
        )
    }
}
