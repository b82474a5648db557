// src/formatting/block_renderer.rs
//! Block transformation engine: converts the record index into vault documents.
//!
//! The converter walks the top-level pages of a tree snapshot. Every page,
//! collection and transclusion container it meets becomes one document; the
//! block tree of a document is assembled, regrouped into lists, transformed
//! into the generic document tree and serialized. Nothing is written here:
//! documents and attachment copies are recorded in an [`OutputPlan`].

use super::collections::{
    block_views, collection_members, member_frontmatter, render_views, QueryTemplate,
};
use super::document::{Document, Inline, ListItem, Node, TableCell};
use super::footnotes::block_footnotes;
use super::lists::{assemble_children, regroup, TreeNode};
use super::markdown::{DocumentSerializer, MarkdownSerializer};
use super::rich_text::{plain_text, wikilink, RichTextDecoder};
use super::state::DocumentContext;
use crate::error::AppError;
use crate::model::{
    BlockKind, BlockRecord, CollectionRecord, ListKind, ParentTable, RecordIndex, TreeSnapshot,
};
use crate::output::{
    get_relative_path, transclusion_path, AttachmentRef, DeliveryTarget, OutputPlan, PathResolver,
};
use crate::types::NodeId;
use std::collections::{HashMap, HashSet};
use std::path::Path;

// --- Core Types ---

/// A document that was not emitted, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDocument {
    pub id: NodeId,
    pub reason: String,
}

/// What happened during one conversion, besides the plan itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub documents: usize,
    pub attachments: usize,
    pub unrecognized_blocks: usize,
    pub warnings: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Output of a conversion: the plan to execute and its report.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub plan: OutputPlan,
    pub report: ConversionReport,
}

// --- Public API ---

/// Converts every top-level page of the tree snapshot.
///
/// Fails only when the query template cannot be registered; everything else
/// is recovered per document and recorded in the report.
pub fn convert_export(index: &RecordIndex, tree: &TreeSnapshot) -> Result<Conversion, AppError> {
    let paths = PathResolver::new(index);
    let mut converter = VaultConverter::new(&paths)?;

    log::info!("Converting {} top-level pages", tree.pages().len());
    for page in tree.pages() {
        converter.convert_top_level(&page.id, page.path.as_deref());
    }
    Ok(converter.finish())
}

/// Converts a single record (page, collection or transclusion container) and
/// whatever it nests.
pub fn convert_record(index: &RecordIndex, id: &NodeId) -> Result<Conversion, AppError> {
    let paths = PathResolver::new(index);
    let mut converter = VaultConverter::new(&paths)?;
    converter.convert_top_level(id, None);
    Ok(converter.finish())
}

// --- Converter ---

/// Stateful converter over one index. Shared across documents: the set of
/// records already rendered and the paths already claimed.
pub struct VaultConverter<'a> {
    index: &'a RecordIndex,
    paths: &'a PathResolver<'a>,
    decoder: RichTextDecoder<'a>,
    serializer: MarkdownSerializer,
    queries: QueryTemplate,
    rendered: HashSet<NodeId>,
    claimed_paths: HashMap<String, NodeId>,
    planned_copies: HashSet<String>,
    plan: OutputPlan,
    report: ConversionReport,
}

impl<'a> VaultConverter<'a> {
    pub fn new(paths: &'a PathResolver<'a>) -> Result<Self, AppError> {
        Ok(Self {
            index: paths.index(),
            paths,
            decoder: RichTextDecoder::new(paths),
            serializer: MarkdownSerializer::new(),
            queries: QueryTemplate::new()?,
            rendered: HashSet::new(),
            claimed_paths: HashMap::new(),
            planned_copies: HashSet::new(),
            plan: OutputPlan::new(),
            report: ConversionReport::default(),
        })
    }

    /// Consumes the converter, returning the plan and report.
    pub fn finish(self) -> Conversion {
        log::info!(
            "Planned {} documents and {} attachments ({} skipped, {} warnings)",
            self.report.documents,
            self.report.attachments,
            self.report.skipped.len(),
            self.report.warnings
        );
        Conversion {
            plan: self.plan,
            report: self.report,
        }
    }

    /// Converts one top-level record; a failure is logged and the batch goes on.
    pub fn convert_top_level(&mut self, id: &NodeId, expected_path: Option<&str>) {
        if let Some(expected) = expected_path {
            match self.paths.document_path(id) {
                Ok(resolved) if resolved != expected => log::debug!(
                    "Snapshot path {} of {} differs from resolved path {}",
                    expected,
                    id,
                    resolved
                ),
                _ => {}
            }
        }
        if let Err(e) = self.emit_document(id) {
            self.skip(id, e.to_string());
        }
    }

    // --- Document emission ---

    /// Emits the document representing a record, if it has not been emitted yet.
    fn emit_document(&mut self, id: &NodeId) -> Result<(), AppError> {
        if let Some(block) = self.index.block(id) {
            return match block.kind {
                BlockKind::Page => self.emit_page(block),
                BlockKind::CollectionViewPage | BlockKind::CollectionView => {
                    self.emit_collection_index(block)
                }
                BlockKind::TransclusionContainer => self.emit_transclusion(block),
                _ => Err(AppError::MalformedExport(format!(
                    "{} is a {} block, not a document",
                    id,
                    block.kind.as_str()
                ))),
            };
        }
        if self.index.collection(id).is_some() {
            return Err(AppError::MalformedExport(format!(
                "collection {} has no view block to render it from",
                id
            )));
        }
        Err(AppError::unresolved(id, "record not in index"))
    }

    fn emit_page(&mut self, page: &'a BlockRecord) -> Result<(), AppError> {
        if !self.rendered.insert(page.id.clone()) {
            return Ok(());
        }
        let path = self.paths.document_path(&page.id)?;
        log::debug!("Emitting page {} at {}", page.id, path);
        let mut ctx = DocumentContext::new(path);

        let frontmatter = match self.parent_collection(page) {
            Some(collection) => member_frontmatter(
                collection,
                page,
                &self.decoder,
                &self.serializer,
                &mut ctx,
            ),
            None => Default::default(),
        };

        let mut children = vec![Node::heading(1, self.text_content(page, &mut ctx))];
        children.extend(self.transform_children(page, &mut ctx));
        self.write(&page.id, Document::new(children).with_frontmatter(frontmatter), ctx);
        Ok(())
    }

    /// Emits the `_.md` index of the collection behind a view block, then its members.
    fn emit_collection_index(&mut self, block: &'a BlockRecord) -> Result<(), AppError> {
        let collection = self.block_collection(block)?;
        if !self.rendered.insert(collection.id.clone()) {
            return Ok(());
        }
        let path = self.paths.document_path(&collection.id)?;
        log::debug!("Emitting collection {} at {}", collection.id, path);
        let mut ctx = DocumentContext::new(path);

        let views = block_views(self.index, block);
        let mut children = vec![Node::heading(
            1,
            self.decoder.decode(&collection.name, &mut ctx),
        )];
        children.extend(render_views(collection, &views, self.paths, &self.queries, 2)?);
        self.write(&collection.id, Document::new(children), ctx);

        for member in collection_members(self.index, collection, &views) {
            if let Err(e) = self.emit_page(member) {
                self.skip(&member.id, e.to_string());
            }
        }
        Ok(())
    }

    /// Emits the satellite document of a transclusion container.
    fn emit_transclusion(&mut self, container: &'a BlockRecord) -> Result<(), AppError> {
        if !self.rendered.insert(container.id.clone()) {
            return Ok(());
        }
        let mut ctx = DocumentContext::new(transclusion_path(&container.id));
        log::debug!("Emitting transclusion {} at {}", container.id, ctx.output_path);
        let children = self.transform_children(container, &mut ctx);
        self.write(&container.id, Document::new(children), ctx);
        Ok(())
    }

    /// Serializes a finished document and records it in the plan.
    fn write(&mut self, id: &NodeId, mut document: Document, mut ctx: DocumentContext) {
        let path = ctx.output_path.clone();
        if let Some(owner) = self.claimed_paths.get(&path) {
            if owner != id {
                let reason = format!("path {} already claimed by {}", path, owner);
                self.skip(id, reason);
                return;
            }
        }

        document.children.extend(ctx.take_footnotes());
        match self.serializer.serialize(&document) {
            Ok(content) => {
                self.claimed_paths.insert(path.clone(), id.clone());
                self.plan.push(DeliveryTarget::WriteFile {
                    path: path.into(),
                    content,
                });
                self.report.documents += 1;
            }
            Err(e) => {
                match serde_json::to_string_pretty(&document) {
                    Ok(dump) => log::error!("Could not serialize {} ({}):\n{}", path, e, dump),
                    Err(dump_error) => {
                        log::error!("Could not serialize {} ({}); dump failed: {}", path, e, dump_error)
                    }
                }
                let error = AppError::SerializationFailed {
                    path,
                    message: e.to_string(),
                };
                self.skip(id, error.to_string());
            }
        }
    }

    fn skip(&mut self, id: &NodeId, reason: String) {
        log::warn!("Skipping document {}: {}", id, reason);
        self.report.warnings += 1;
        self.report.skipped.push(SkippedDocument {
            id: id.clone(),
            reason,
        });
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.report.warnings += 1;
    }

    // --- Block transformation ---

    fn transform_children(
        &mut self,
        parent: &'a BlockRecord,
        ctx: &mut DocumentContext,
    ) -> Vec<Node> {
        let tree = regroup(assemble_children(self.index, parent));
        self.transform_all(&tree, ctx)
    }

    fn transform_all(&mut self, nodes: &[TreeNode<'a>], ctx: &mut DocumentContext) -> Vec<Node> {
        let mut output = Vec::with_capacity(nodes.len());
        for node in nodes {
            output.extend(self.transform(node, ctx));
        }
        output
    }

    /// Transforms one tree node into zero or more document nodes.
    fn transform(&mut self, node: &TreeNode<'a>, ctx: &mut DocumentContext) -> Vec<Node> {
        match node {
            TreeNode::ListRun { kind, items } => {
                let items = items
                    .iter()
                    .filter_map(|item| match item {
                        TreeNode::Block { record, children } => {
                            Some(self.list_item(record, children, ctx))
                        }
                        TreeNode::ListRun { .. } => None,
                    })
                    .collect();
                vec![Node::List {
                    ordered: *kind == ListKind::Ordered,
                    items,
                }]
            }
            TreeNode::Block { record, children } => self.transform_block(record, children, ctx),
        }
    }

    fn transform_block(
        &mut self,
        block: &'a BlockRecord,
        children: &[TreeNode<'a>],
        ctx: &mut DocumentContext,
    ) -> Vec<Node> {
        match &block.kind {
            BlockKind::Text => {
                let mut nodes = vec![Node::paragraph(self.text_content(block, ctx))];
                if !children.is_empty() {
                    let mut quoted = vec![Node::marker("[!nested]")];
                    quoted.extend(self.transform_all(children, ctx));
                    nodes.push(Node::Blockquote { children: quoted });
                }
                nodes
            }
            BlockKind::Header | BlockKind::SubHeader | BlockKind::SubSubHeader => {
                let depth = match block.kind {
                    BlockKind::Header => 1,
                    BlockKind::SubHeader => 2,
                    _ => 3,
                };
                let mut nodes = vec![Node::heading(depth, self.text_content(block, ctx))];
                nodes.extend(self.transform_all(children, ctx));
                nodes
            }
            BlockKind::Divider => vec![Node::ThematicBreak],
            BlockKind::Quote => {
                let mut quoted = vec![Node::paragraph(self.text_content(block, ctx))];
                quoted.extend(self.transform_all(children, ctx));
                vec![Node::Blockquote { children: quoted }]
            }
            BlockKind::Callout => {
                let marker = format!(
                    "[!callout|icon={},color={}]",
                    block.format.page_icon.as_deref().unwrap_or_default(),
                    block.format.block_color.as_deref().unwrap_or_default()
                );
                let mut quoted = vec![
                    Node::marker(marker),
                    Node::paragraph(self.text_content(block, ctx)),
                ];
                quoted.extend(self.transform_all(children, ctx));
                vec![Node::Blockquote { children: quoted }]
            }
            BlockKind::BulletedList | BlockKind::NumberedList | BlockKind::ToDo => {
                // Regrouping wraps every item; a stray one still renders as a list
                let item = self.list_item(block, children, ctx);
                vec![Node::List {
                    ordered: block.kind == BlockKind::NumberedList,
                    items: vec![item],
                }]
            }
            BlockKind::Page => self.nested_document(block, |this| this.emit_page(block)),
            BlockKind::CollectionViewPage => {
                self.nested_document(block, |this| this.emit_collection_index(block))
            }
            BlockKind::CollectionView => self.inline_collection(block, ctx),
            BlockKind::TransclusionContainer => {
                if let Err(e) = self.emit_transclusion(block) {
                    self.skip(&block.id, e.to_string());
                }
                vec![embed(&block.id)]
            }
            BlockKind::TransclusionReference => self.transclusion_reference(block),
            BlockKind::Code => {
                let value = plain_text(block.title(), self.index);
                let language = plain_text(block.property("language"), self.index);
                vec![Node::Code {
                    lang: normalize_language(&language),
                    value,
                }]
            }
            BlockKind::Equation => {
                let expression = plain_text(block.title(), self.index);
                vec![Node::Math {
                    value: format!("\\begin{{gathered}}\n{}\n\\end{{gathered}}", expression.trim()),
                }]
            }
            BlockKind::Tweet | BlockKind::Video => {
                let Some(source) = self.remote_source(block) else {
                    self.warn(format!("{} block {} has no source", block.kind.as_str(), block.id));
                    return Vec::new();
                };
                let target = self.attachment(block, ctx).unwrap_or_else(|| source.clone());
                vec![Node::paragraph(vec![Inline::link(
                    target,
                    vec![Inline::text(source)],
                )])]
            }
            BlockKind::Image => {
                let Some(source) = self.remote_source(block) else {
                    self.warn(format!("Image block {} has no source", block.id));
                    return Vec::new();
                };
                let url = self.attachment(block, ctx).unwrap_or(source);
                let alt = plain_text(block.property("caption"), self.index);
                vec![Node::paragraph(vec![Inline::Image { url, alt }])]
            }
            BlockKind::File | BlockKind::Pdf => {
                let Some(source) = self.remote_source(block) else {
                    self.warn(format!("{} block {} has no source", block.kind.as_str(), block.id));
                    return Vec::new();
                };
                let target = self.attachment(block, ctx).unwrap_or_else(|| source.clone());
                let mut label = plain_text(block.title(), self.index);
                if label.trim().is_empty() {
                    label = AttachmentRef::filename_from_source(&source).unwrap_or(source);
                }
                vec![Node::paragraph(vec![Inline::link(
                    target,
                    vec![Inline::text(label)],
                )])]
            }
            BlockKind::Table => self.table(block, children, ctx),
            BlockKind::ColumnList => {
                let cells: Vec<TableCell> = children
                    .iter()
                    .map(|column| match column {
                        TreeNode::Block { children, .. } => {
                            TableCell(self.transform_all(children, ctx))
                        }
                        TreeNode::ListRun { .. } => TableCell(self.transform(column, ctx)),
                    })
                    .collect();
                if cells.is_empty() {
                    return Vec::new();
                }
                vec![Node::Table { rows: vec![cells] }]
            }
            BlockKind::ExternalObjectInstance => match &block.format.original_url {
                Some(url) => vec![Node::paragraph(vec![Inline::link(
                    url.clone(),
                    vec![Inline::text(url.clone())],
                )])],
                None => {
                    self.warn(format!("Embedded object {} has no original URL", block.id));
                    Vec::new()
                }
            },
            BlockKind::TableOfContents
            | BlockKind::Alias
            | BlockKind::TableRow
            | BlockKind::Column
            | BlockKind::CopyIndicator => Vec::new(),
            BlockKind::Unrecognized(name) => {
                self.report.unrecognized_blocks += 1;
                self.warn(format!("Unrecognized block type '{}' ({}), skipping", name, block.id));
                Vec::new()
            }
        }
    }

    /// Decoded title of a text-bearing block followed by references to its
    /// block-level discussions.
    fn text_content(&self, block: &BlockRecord, ctx: &mut DocumentContext) -> Vec<Inline> {
        let mut inlines = self.decoder.decode(block.title(), ctx);
        inlines.extend(block_footnotes(&self.decoder, block, ctx));
        inlines
    }

    fn list_item(
        &mut self,
        block: &'a BlockRecord,
        children: &[TreeNode<'a>],
        ctx: &mut DocumentContext,
    ) -> ListItem {
        let mut content = vec![Node::paragraph(self.text_content(block, ctx))];
        content.extend(self.transform_all(children, ctx));
        ListItem {
            checked: (block.kind == BlockKind::ToDo).then(|| block.is_checked()),
            children: content,
        }
    }

    /// Emits a nested document and leaves a cross-reference in its place.
    fn nested_document(
        &mut self,
        block: &'a BlockRecord,
        emit: impl FnOnce(&mut Self) -> Result<(), AppError>,
    ) -> Vec<Node> {
        if let Err(e) = emit(self) {
            self.skip(&block.id, e.to_string());
        }
        match self.paths.link_target(&block.id) {
            Ok((target, label)) => vec![Node::paragraph(vec![wikilink(target, label)])],
            Err(e) => {
                self.warn(format!("Dropping link to nested document {}: {}", block.id, e));
                Vec::new()
            }
        }
    }

    /// A collection view inside a page: headings and queries in place, with
    /// the collection index and member pages emitted as their own documents.
    fn inline_collection(&mut self, block: &'a BlockRecord, ctx: &mut DocumentContext) -> Vec<Node> {
        let collection = match self.block_collection(block) {
            Ok(collection) => collection,
            Err(e) => {
                self.warn(format!("Skipping collection view {}: {}", block.id, e));
                return Vec::new();
            }
        };
        let views = block_views(self.index, block);

        let mut nodes = vec![Node::heading(3, self.decoder.decode(&collection.name, ctx))];
        match render_views(collection, &views, self.paths, &self.queries, 3) {
            Ok(view_nodes) => nodes.extend(view_nodes),
            Err(e) => self.warn(format!("Could not render views of {}: {}", collection.id, e)),
        }
        if let Err(e) = self.emit_collection_index(block) {
            self.skip(&collection.id, e.to_string());
        }
        nodes
    }

    fn transclusion_reference(&mut self, block: &'a BlockRecord) -> Vec<Node> {
        let Some(pointer) = &block.format.transclusion_reference_pointer else {
            self.warn(format!("Transclusion reference {} has no pointer", block.id));
            return Vec::new();
        };
        match self.index.block(&pointer.id) {
            Some(container) if container.kind == BlockKind::TransclusionContainer => {
                if let Err(e) = self.emit_transclusion(container) {
                    self.skip(&container.id, e.to_string());
                }
                vec![embed(&container.id)]
            }
            Some(other) => {
                self.warn(format!(
                    "Transclusion reference {} points at a {} block",
                    block.id,
                    other.kind.as_str()
                ));
                Vec::new()
            }
            None => {
                self.warn(format!(
                    "Transclusion reference {} points at missing {}",
                    block.id, pointer.id
                ));
                Vec::new()
            }
        }
    }

    /// Table block: one row per table-row child, cells in declared column order.
    fn table(
        &mut self,
        block: &'a BlockRecord,
        children: &[TreeNode<'a>],
        ctx: &mut DocumentContext,
    ) -> Vec<Node> {
        let columns = &block.format.table_block_column_order;
        if columns.is_empty() {
            self.warn(format!("Table {} declares no columns, skipping", block.id));
            return Vec::new();
        }

        let mut rows = Vec::with_capacity(children.len() + 1);
        if !block.format.table_block_column_header {
            rows.push(vec![TableCell::default(); columns.len()]);
        }
        let header_rows = rows.len();
        for child in children {
            let TreeNode::Block { record, .. } = child else {
                continue;
            };
            if record.kind != BlockKind::TableRow {
                log::debug!("Ignoring {} block {} inside table", record.kind.as_str(), record.id);
                continue;
            }
            let cells = columns
                .iter()
                .map(|column| {
                    let inlines = self.decoder.decode(record.property(column), ctx);
                    TableCell(vec![Node::paragraph(inlines)])
                })
                .collect();
            rows.push(cells);
        }
        if rows.len() == header_rows {
            self.warn(format!("Table {} has no rows, skipping", block.id));
            return Vec::new();
        }
        vec![Node::Table { rows }]
    }

    // --- Attachments ---

    /// Remote location of a media block: its source property, else its signed URL.
    fn remote_source(&self, block: &BlockRecord) -> Option<String> {
        block
            .source()
            .filter(|source| !source.trim().is_empty())
            .or_else(|| self.index.signed_url(&block.id).map(str::to_string))
    }

    /// Plans the copy of a block's attachment next to the current document and
    /// returns the path relative to it. `None` when the block has no attachment.
    fn attachment(&mut self, block: &BlockRecord, ctx: &mut DocumentContext) -> Option<String> {
        let attachment_id = block.file_ids.first()?;
        let source = block.source()?;
        let Some(filename) = AttachmentRef::filename_from_source(&source) else {
            self.warn(format!("No file name in source of {}: {}", block.id, source));
            return None;
        };

        let name = ctx.claim_attachment_name(attachment_id, &filename);
        let directory = ctx
            .output_path
            .strip_suffix(".md")
            .unwrap_or(&ctx.output_path);
        let destination = format!("{}/{}", directory, name);

        let relative = match get_relative_path(Path::new(&ctx.output_path), Path::new(&destination)) {
            Ok(relative) => relative,
            Err(e) => {
                self.warn(format!("Attachment {} of {}: {}", attachment_id, block.id, e));
                return None;
            }
        };

        if self.planned_copies.insert(destination.clone()) {
            self.plan.push(DeliveryTarget::CopyAttachment {
                attachment: AttachmentRef::new(attachment_id.clone(), filename),
                destination: destination.into(),
            });
            self.report.attachments += 1;
        }
        Some(relative)
    }

    // --- Lookups ---

    fn block_collection(&self, block: &BlockRecord) -> Result<&'a CollectionRecord, AppError> {
        let id = block
            .collection_id
            .as_ref()
            .ok_or_else(|| AppError::unresolved(&block.id, "collection view without collection"))?;
        self.index
            .collection(id)
            .ok_or_else(|| AppError::unresolved(id, "collection not in index"))
    }

    fn parent_collection(&self, page: &BlockRecord) -> Option<&'a CollectionRecord> {
        match (&page.parent_table, &page.parent_id) {
            (ParentTable::Collection, Some(id)) => self.index.collection(id),
            _ => None,
        }
    }
}

fn embed(container: &NodeId) -> Node {
    let path = transclusion_path(container);
    Node::Embed {
        target: path.strip_suffix(".md").unwrap_or(&path).to_string(),
    }
}

/// Fence language of a code block.
pub fn normalize_language(language: &str) -> Option<String> {
    match language.trim() {
        "" => None,
        "Plain Text" => Some("text".to_string()),
        "JavaScript" => Some("js".to_string()),
        other => Some(other.to_lowercase().replace(' ', "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn page(id: &str, title: &str, content: serde_json::Value) -> serde_json::Value {
        json!({"value": {"id": id, "type": "page", "properties": {"title": [[title]]},
            "parent_id": "space", "parent_table": "space", "content": content}})
    }

    fn child(id: &str, kind: &str, parent: &str, extra: serde_json::Value) -> serde_json::Value {
        let mut value = json!({"id": id, "type": kind, "parent_id": parent, "parent_table": "block"});
        if let (Some(value), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            value.extend(extra.clone());
        }
        json!({ "value": value })
    }

    fn convert_one(index: serde_json::Value, root: &str) -> Conversion {
        let index = RecordIndex::from_value(index);
        convert_record(&index, &NodeId::new(root)).unwrap()
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("Plain Text").as_deref(), Some("text"));
        assert_eq!(normalize_language("JavaScript").as_deref(), Some("js"));
        assert_eq!(normalize_language("Objective C").as_deref(), Some("objectivec"));
        assert_eq!(normalize_language(" "), None);
    }

    #[test]
    fn test_intro_page() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "Intro", json!(["t"])),
                "t": child("t", "text", "p", json!({"properties": {"title": [["Hello "], ["world", [["b"]]]]}}))
            }}),
            "p",
        );
        assert_eq!(
            conversion.plan.file_content("Intro.md"),
            Some("# Intro\n\nHello **world**\n")
        );
    }

    #[test]
    fn test_nested_text_callout_and_code() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "P", json!(["t", "c", "k", "eq"])),
                "t": child("t", "text", "p", json!({"properties": {"title": [["Parent"]]}, "content": ["u"]})),
                "u": child("u", "text", "t", json!({"properties": {"title": [["Inner"]]}})),
                "c": child("c", "callout", "p", json!({"properties": {"title": [["Note"]]},
                    "format": {"page_icon": "💡", "block_color": "gray_background"}})),
                "k": child("k", "code", "p", json!({"properties": {"title": [["let x = 1;"]], "language": [["Rust"]]}})),
                "eq": child("eq", "equation", "p", json!({"properties": {"title": [["x^2"]]}}))
            }}),
            "p",
        );
        let content = conversion.plan.file_content("P.md").unwrap();
        assert!(content.starts_with("# P\n\nParent\n\n> [!nested]\n>"));
        assert!(content.contains("> Inner\n\n> [!callout|icon=💡,color=gray_background]\n>"));
        assert!(content.contains("> Note\n\n```rust\nlet x = 1;\n```\n\n"));
        assert!(content.ends_with("$$\n\\begin{gathered}\nx^2\n\\end{gathered}\n$$\n"));
    }

    #[test]
    fn test_nested_page_gets_its_own_document() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "Home", json!(["c"])),
                "c": child("c", "page", "p", json!({"properties": {"title": [["Child"]]}}))
            }}),
            "p",
        );
        assert_eq!(
            conversion.plan.file_content("Home.md"),
            Some("# Home\n\n[[Home/Child|Child]]\n")
        );
        assert_eq!(conversion.plan.file_content("Home/Child.md"), Some("# Child\n"));
    }

    #[test]
    fn test_transclusion_emitted_once() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "P", json!(["x", "r"])),
                "x": child("x", "transclusion_container", "p", json!({"content": ["xt"]})),
                "xt": child("xt", "text", "x", json!({"properties": {"title": [["Shared"]]}})),
                "r": child("r", "transclusion_reference", "p",
                    json!({"format": {"transclusion_reference_pointer": {"id": "x", "table": "block"}}}))
            }}),
            "p",
        );
        assert_eq!(
            conversion.plan.file_content("transclusions/x.md"),
            Some("Shared\n")
        );
        assert_eq!(
            conversion.plan.file_content("P.md"),
            Some("# P\n\n![[transclusions/x]]\n\n![[transclusions/x]]\n")
        );
        assert_eq!(conversion.plan.counts(), (2, 0));
    }

    #[test]
    fn test_image_attachment_is_planned() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "Page", json!(["i"])),
                "i": child("i", "image", "p", json!({
                    "properties": {"source": [["https://s3.example.com/a/cat%20pic.png"]], "caption": [["A cat"]]},
                    "file_ids": ["f1"]}))
            }}),
            "p",
        );
        assert_eq!(
            conversion.plan.file_content("Page.md"),
            Some("# Page\n\n![A cat](Page/cat%20pic.png)\n")
        );
        assert!(conversion.plan.operations.contains(&DeliveryTarget::CopyAttachment {
            attachment: AttachmentRef::new(NodeId::new("f1"), "cat pic.png"),
            destination: "Page/cat pic.png".into(),
        }));
        assert_eq!(conversion.report.attachments, 1);
    }

    #[test]
    fn test_table_block_with_synthesized_header() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "T", json!(["tb"])),
                "tb": child("tb", "table", "p", json!({"content": ["r1"],
                    "format": {"table_block_column_order": ["a", "b"]}})),
                "r1": child("r1", "table_row", "tb", json!({"properties": {"a": [["1"]], "b": [["x|y"]]}}))
            }}),
            "p",
        );
        let content = conversion.plan.file_content("T.md").unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[..2], ["# T", ""]);
        assert_eq!(lines[2].trim_end(), "|  |  |");
        assert_eq!(lines[3], "| --- | --- |");
        assert_eq!(lines[4], "| 1 | x\\|y |");
    }

    #[test]
    fn test_table_without_rows_keeps_the_page() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "T", json!(["tb", "t"])),
                "tb": child("tb", "table", "p", json!({"content": [],
                    "format": {"table_block_column_order": ["a"], "table_block_column_header": true}})),
                "t": child("t", "text", "p", json!({"properties": {"title": [["After"]]}}))
            }}),
            "p",
        );
        assert_eq!(conversion.plan.file_content("T.md"), Some("# T\n\nAfter\n"));
        assert!(conversion.report.skipped.is_empty());
        assert_eq!(conversion.report.warnings, 1);
    }

    #[test]
    fn test_heading_with_line_break_stays_on_one_line() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "P", json!(["h"])),
                "h": child("h", "sub_header", "p", json!({"properties": {"title": [["One\nTwo"]]}}))
            }}),
            "p",
        );
        assert_eq!(conversion.plan.file_content("P.md"), Some("# P\n\n## One Two\n"));
    }

    #[test]
    fn test_unrecognized_block_is_skipped() {
        let conversion = convert_one(
            json!({"block": {
                "p": page("p", "P", json!(["w", "t"])),
                "w": child("w", "hologram", "p", json!({})),
                "t": child("t", "text", "p", json!({"properties": {"title": [["After"]]}}))
            }}),
            "p",
        );
        assert_eq!(conversion.plan.file_content("P.md"), Some("# P\n\nAfter\n"));
        assert_eq!(conversion.report.unrecognized_blocks, 1);
    }

    #[test]
    fn test_non_document_top_level_is_skipped() {
        let conversion = convert_one(
            json!({"block": {"t": child("t", "text", "p", json!({}))}}),
            "t",
        );
        assert!(conversion.plan.is_empty());
        assert_eq!(conversion.report.skipped.len(), 1);
    }
}
