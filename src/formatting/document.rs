// src/formatting/document.rs
//! Generic structured-document tree produced by the block transformer.
//!
//! The tree knows nothing about the export format and nothing about Markdown;
//! the serializer is the only place that turns it into text.

use crate::types::Color;
use indexmap::IndexMap;
use serde::Serialize;

/// One output document: optional front matter, then block content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub frontmatter: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Paragraph { children: Vec<Inline> },
    Heading { depth: u8, children: Vec<Inline> },
    ThematicBreak,
    Blockquote { children: Vec<Node> },
    List { ordered: bool, items: Vec<ListItem> },
    Code { lang: Option<String>, value: String },
    Math { value: String },
    Table { rows: Vec<Vec<TableCell>> },
    /// Obsidian transclusion of another vault document (`![[target]]`).
    Embed { target: String },
    FootnoteDefinition { label: String, children: Vec<Node> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListItem {
    /// `Some` only for checkbox items.
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

/// A table cell holds block content; the serializer flattens it onto one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableCell(pub Vec<Node>);

/// Inline content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { value: String },
    Break,
    Emphasis { children: Vec<Inline> },
    Strong { children: Vec<Inline> },
    Delete { children: Vec<Inline> },
    Underline { children: Vec<Inline> },
    Colored { color: Color, children: Vec<Inline> },
    InlineCode { value: String },
    InlineMath { value: String },
    Link { url: String, children: Vec<Inline> },
    /// Cross-document reference (`[[target|alias]]`).
    WikiLink { target: String, alias: Option<String> },
    Image { url: String, alt: String },
    FootnoteReference { label: String },
    /// Target-format markup passed through unescaped.
    Raw { value: String },
}

impl Node {
    pub fn paragraph(children: Vec<Inline>) -> Self {
        Node::Paragraph { children }
    }

    pub fn heading(depth: u8, children: Vec<Inline>) -> Self {
        Node::Heading { depth, children }
    }

    /// A paragraph holding one unescaped literal, e.g. a callout marker.
    pub fn marker(text: impl Into<String>) -> Self {
        Node::Paragraph {
            children: vec![Inline::Raw { value: text.into() }],
        }
    }
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text {
            value: value.into(),
        }
    }

    pub fn link(url: impl Into<String>, children: Vec<Inline>) -> Self {
        Inline::Link {
            url: url.into(),
            children,
        }
    }

    /// Plain-text content of this node, markup dropped.
    pub fn plain(&self) -> String {
        match self {
            Inline::Text { value }
            | Inline::InlineCode { value }
            | Inline::InlineMath { value }
            | Inline::Raw { value } => value.clone(),
            Inline::Break => "\n".to_string(),
            Inline::Emphasis { children }
            | Inline::Strong { children }
            | Inline::Delete { children }
            | Inline::Underline { children }
            | Inline::Colored { children, .. }
            | Inline::Link { children, .. } => children.iter().map(Inline::plain).collect(),
            Inline::WikiLink { target, alias } => alias.clone().unwrap_or_else(|| target.clone()),
            Inline::Image { alt, .. } => alt.clone(),
            Inline::FootnoteReference { .. } => String::new(),
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Document {
            frontmatter: IndexMap::new(),
            children,
        }
    }

    pub fn with_frontmatter(mut self, frontmatter: IndexMap<String, String>) -> Self {
        self.frontmatter = frontmatter;
        self
    }
}
