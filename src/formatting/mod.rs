// src/formatting/mod.rs
//! Transforms the record index into structured documents and Markdown text.

// Sub-modules
pub mod block_renderer;
pub mod collections;
pub mod document;
mod footnotes;
pub mod lists;
pub mod markdown;
pub mod rich_text;
mod state;

// --- Conversion (top-level entry points) ---
pub use self::block_renderer::{
    convert_export, convert_record, Conversion, ConversionReport, SkippedDocument, VaultConverter,
};
pub use self::document::{Document, Inline, ListItem, Node, TableCell};
pub use self::footnotes::{block_footnotes, make_footnote};
pub use self::markdown::{DocumentSerializer, MarkdownSerializer, SerializeError};
pub use self::rich_text::RichTextDecoder;
pub use self::state::DocumentContext;
