// src/model/blocks.rs
//! Block records of the export index.

use super::rich_text::RichText;
use crate::types::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed enumeration of the block types the converter knows how to handle.
///
/// Anything else lands in [`BlockKind::Unrecognized`] with its wire name, so it
/// can be logged and skipped instead of failing the whole index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum BlockKind {
    Page,
    CollectionViewPage,
    CollectionView,
    Text,
    Header,
    SubHeader,
    SubSubHeader,
    BulletedList,
    NumberedList,
    ToDo,
    Quote,
    Callout,
    Code,
    Equation,
    Divider,
    TableOfContents,
    Alias,
    Image,
    File,
    Pdf,
    Video,
    Tweet,
    Table,
    TableRow,
    ColumnList,
    Column,
    TransclusionContainer,
    TransclusionReference,
    CopyIndicator,
    ExternalObjectInstance,
    Unrecognized(String),
}

impl From<String> for BlockKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "page" => BlockKind::Page,
            "collection_view_page" => BlockKind::CollectionViewPage,
            "collection_view" => BlockKind::CollectionView,
            "text" => BlockKind::Text,
            "header" => BlockKind::Header,
            "sub_header" => BlockKind::SubHeader,
            "sub_sub_header" => BlockKind::SubSubHeader,
            "bulleted_list" => BlockKind::BulletedList,
            "numbered_list" => BlockKind::NumberedList,
            "to_do" => BlockKind::ToDo,
            "quote" => BlockKind::Quote,
            "callout" => BlockKind::Callout,
            "code" => BlockKind::Code,
            "equation" => BlockKind::Equation,
            "divider" => BlockKind::Divider,
            "table_of_contents" => BlockKind::TableOfContents,
            "alias" => BlockKind::Alias,
            "image" => BlockKind::Image,
            "file" => BlockKind::File,
            "pdf" => BlockKind::Pdf,
            "video" => BlockKind::Video,
            "tweet" => BlockKind::Tweet,
            "table" => BlockKind::Table,
            "table_row" => BlockKind::TableRow,
            "column_list" => BlockKind::ColumnList,
            "column" => BlockKind::Column,
            "transclusion_container" => BlockKind::TransclusionContainer,
            "transclusion_reference" => BlockKind::TransclusionReference,
            "copy_indicator" => BlockKind::CopyIndicator,
            "external_object_instance" => BlockKind::ExternalObjectInstance,
            _ => BlockKind::Unrecognized(name),
        }
    }
}

impl BlockKind {
    /// The wire name of this block type.
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Page => "page",
            BlockKind::CollectionViewPage => "collection_view_page",
            BlockKind::CollectionView => "collection_view",
            BlockKind::Text => "text",
            BlockKind::Header => "header",
            BlockKind::SubHeader => "sub_header",
            BlockKind::SubSubHeader => "sub_sub_header",
            BlockKind::BulletedList => "bulleted_list",
            BlockKind::NumberedList => "numbered_list",
            BlockKind::ToDo => "to_do",
            BlockKind::Quote => "quote",
            BlockKind::Callout => "callout",
            BlockKind::Code => "code",
            BlockKind::Equation => "equation",
            BlockKind::Divider => "divider",
            BlockKind::TableOfContents => "table_of_contents",
            BlockKind::Alias => "alias",
            BlockKind::Image => "image",
            BlockKind::File => "file",
            BlockKind::Pdf => "pdf",
            BlockKind::Video => "video",
            BlockKind::Tweet => "tweet",
            BlockKind::Table => "table",
            BlockKind::TableRow => "table_row",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::TransclusionContainer => "transclusion_container",
            BlockKind::TransclusionReference => "transclusion_reference",
            BlockKind::CopyIndicator => "copy_indicator",
            BlockKind::ExternalObjectInstance => "external_object_instance",
            BlockKind::Unrecognized(name) => name,
        }
    }

    /// Blocks that own a document of their own rather than living inside one.
    pub fn is_document(&self) -> bool {
        matches!(
            self,
            BlockKind::Page
                | BlockKind::CollectionViewPage
                | BlockKind::TransclusionContainer
        )
    }

    /// Which list wrapper an item of this kind belongs to, if any.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            BlockKind::BulletedList | BlockKind::ToDo => Some(ListKind::Unordered),
            BlockKind::NumberedList => Some(ListKind::Ordered),
            _ => None,
        }
    }
}

/// Kind of a synthetic list wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// The table a `parent_id` points into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ParentTable {
    Block,
    Collection,
    Space,
    Team,
    #[default]
    Missing,
    Unrecognized(String),
}

impl From<String> for ParentTable {
    fn from(name: String) -> Self {
        match name.as_str() {
            "block" => ParentTable::Block,
            "collection" => ParentTable::Collection,
            "space" => ParentTable::Space,
            "team" => ParentTable::Team,
            _ => ParentTable::Unrecognized(name),
        }
    }
}

impl ParentTable {
    /// The workspace root ends every ancestor walk.
    pub fn is_root(&self) -> bool {
        matches!(self, ParentTable::Space | ParentTable::Team)
    }
}

/// Pointer to another record, as stored in `format`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPointer {
    pub id: NodeId,
    #[serde(default)]
    pub table: Option<String>,
}

/// Presentational hints of a block. Only the keys the converter reads are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_block_column_order: Vec<String>,
    pub table_block_column_header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transclusion_reference_pointer: Option<RecordPointer>,
}

/// A `block` record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockRecord {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub properties: IndexMap<String, RichText>,
    #[serde(default, deserialize_with = "lenient_format")]
    pub format: BlockFormat,
    #[serde(default)]
    pub content: Vec<NodeId>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default)]
    pub discussions: Vec<NodeId>,
    #[serde(default)]
    pub file_ids: Vec<NodeId>,
    #[serde(default)]
    pub collection_id: Option<NodeId>,
    #[serde(default)]
    pub view_ids: Vec<NodeId>,
    #[serde(default = "default_alive")]
    pub alive: bool,
}

fn default_alive() -> bool {
    true
}

/// A format object with an unexpected shape loses its hints, not the block.
fn lenient_format<'de, D>(deserializer: D) -> Result<BlockFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::debug!("Ignoring malformed block format: {}", e);
        BlockFormat::default()
    }))
}

impl BlockRecord {
    /// The `title` property, empty when absent.
    pub fn title(&self) -> &RichText {
        self.property("title")
    }

    /// A named property, empty when absent.
    pub fn property(&self, key: &str) -> &RichText {
        static EMPTY: RichText = RichText(Vec::new());
        self.properties.get(key).unwrap_or(&EMPTY)
    }

    /// Checkbox state of a `to_do` block.
    pub fn is_checked(&self) -> bool {
        self.property("checked").raw_text() == "Yes"
    }

    /// The `source` URL of a media or file block.
    pub fn source(&self) -> Option<String> {
        let source = self.property("source").raw_text();
        (!source.is_empty()).then_some(source)
    }

    /// Whether the parent of this block is the given collection.
    pub fn is_member_of(&self, collection: &NodeId) -> bool {
        self.parent_table == ParentTable::Collection && self.parent_id.as_ref() == Some(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_record_parsing() {
        let block: BlockRecord = serde_json::from_value(json!({
            "id": "b9afc468-4854-4888-b94d-961d802add16",
            "type": "to_do",
            "properties": {"title": [["Buy milk"]], "checked": [["Yes"]]},
            "content": ["c1"],
            "parent_id": "p1",
            "parent_table": "block",
            "created_time": 1620000000000u64
        }))
        .unwrap();

        assert_eq!(block.kind, BlockKind::ToDo);
        assert_eq!(block.title().raw_text(), "Buy milk");
        assert!(block.is_checked());
        assert_eq!(block.parent_table, ParentTable::Block);
        assert_eq!(block.content, vec![NodeId::new("c1")]);
        assert!(block.alive);
    }

    #[test]
    fn test_unrecognized_kind_keeps_its_name() {
        let block: BlockRecord =
            serde_json::from_value(json!({"id": "x", "type": "breadcrumb"})).unwrap();
        assert_eq!(block.kind, BlockKind::Unrecognized("breadcrumb".to_string()));
        assert_eq!(block.kind.as_str(), "breadcrumb");
        assert_eq!(block.parent_table, ParentTable::Missing);
    }

    #[test]
    fn test_malformed_format_is_ignored() {
        let block: BlockRecord = serde_json::from_value(json!({
            "id": "x",
            "type": "callout",
            "format": {"page_icon": 42}
        }))
        .unwrap();
        assert_eq!(block.format, BlockFormat::default());
    }

    #[test]
    fn test_list_kinds() {
        assert_eq!(BlockKind::ToDo.list_kind(), Some(ListKind::Unordered));
        assert_eq!(BlockKind::BulletedList.list_kind(), Some(ListKind::Unordered));
        assert_eq!(BlockKind::NumberedList.list_kind(), Some(ListKind::Ordered));
        assert_eq!(BlockKind::Text.list_kind(), None);
    }
}
