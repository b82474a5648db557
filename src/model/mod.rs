// src/model/mod.rs
//! Serde model of the record-map export and of the tree snapshot.
//!
//! Every table of the export is read into closed enums with an
//! `Unrecognized` arm, so new record types degrade instead of failing.

mod blocks;
mod collections;
mod discussions;
mod index;
mod rich_text;
mod tree;

pub use blocks::{
    BlockFormat, BlockKind, BlockRecord, ListKind, ParentTable, RecordPointer,
};
pub use collections::{
    CollectionRecord, FieldKind, PropertyVisibility, QueryResult, SchemaField, ViewFormat,
    ViewKind, ViewMode, ViewRecord,
};
pub use discussions::{Comment, Discussion, Reaction};
pub use index::RecordIndex;
pub use rich_text::{DateLiteral, Decoration, RichText, Run};
pub use tree::{TreePage, TreeSnapshot};
