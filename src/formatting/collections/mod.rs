// src/formatting/collections/mod.rs
//! Collection/view rendering.
//!
//! A collection becomes a directory holding one document per member page and
//! a generated `_.md` index. Each view contributes an optional heading and a
//! Dataview query over the collection directory; member pages get front
//! matter built from the collection schema.

mod frontmatter;
mod query;

pub use frontmatter::member_frontmatter;
pub use query::{camel_case, field_identifier, query_fields, QueryTemplate};

use super::document::{Inline, Node};
use super::rich_text::plain_text;
use crate::error::AppError;
use crate::model::{BlockKind, BlockRecord, CollectionRecord, RecordIndex, ViewRecord};
use crate::output::PathResolver;
use crate::types::NodeId;
use std::collections::HashSet;

/// Language tag of generated query blocks.
pub const QUERY_LANGUAGE: &str = "dataview";

/// Views of a collection-view block, in declared order. Missing views are skipped.
pub fn block_views<'a>(index: &'a RecordIndex, block: &BlockRecord) -> Vec<&'a ViewRecord> {
    block
        .view_ids
        .iter()
        .filter_map(|id| {
            let view = index.view(id);
            if view.is_none() {
                log::debug!("View {} of {} not in index, skipping", id, block.id);
            }
            view
        })
        .collect()
}

/// Heading and query block for every view of a collection.
///
/// `heading_depth` is 2 inside the collection's own index document and 3 when
/// the collection is rendered inside a page.
pub fn render_views(
    collection: &CollectionRecord,
    views: &[&ViewRecord],
    paths: &PathResolver,
    queries: &QueryTemplate,
    heading_depth: u8,
) -> Result<Vec<Node>, AppError> {
    let dir = paths.collection_dir(&collection.id)?;
    let mut nodes = Vec::with_capacity(views.len() * 2);
    for view in views {
        if let Some(name) = view.display_name() {
            nodes.push(Node::heading(heading_depth, vec![Inline::text(name)]));
        }
        nodes.push(Node::Code {
            lang: Some(QUERY_LANGUAGE.to_string()),
            value: queries.render(collection, view, &dir)?,
        });
    }
    Ok(nodes)
}

/// Member pages of a collection.
///
/// Uses the precomputed query results of the views (union in view order,
/// first occurrence wins). Without any query result, every live page whose
/// parent is the collection is taken, sorted by title then id.
pub fn collection_members<'a>(
    index: &'a RecordIndex,
    collection: &CollectionRecord,
    views: &[&ViewRecord],
) -> Vec<&'a BlockRecord> {
    let results: Vec<_> = views
        .iter()
        .filter_map(|view| index.query_members(&collection.id, &view.id))
        .collect();

    if results.is_empty() {
        log::debug!(
            "No query results for collection {}, scanning the block table",
            collection.id
        );
        let mut members: Vec<(String, &BlockRecord)> = index
            .scan_collection_members(&collection.id)
            .into_iter()
            .filter(|block| block.kind == BlockKind::Page)
            .map(|block| (plain_text(block.title(), index), block))
            .collect();
        members.sort_by(|(a_title, a), (b_title, b)| a_title.cmp(b_title).then(a.id.cmp(&b.id)));
        return members.into_iter().map(|(_, block)| block).collect();
    }

    let mut seen: HashSet<&NodeId> = HashSet::new();
    let mut members = Vec::new();
    for id in results.iter().flat_map(|result| result.members()) {
        if !seen.insert(id) {
            continue;
        }
        match index.block(id) {
            Some(block) if block.alive && block.kind == BlockKind::Page => members.push(block),
            Some(block) => log::debug!(
                "Query member {} of {} is not a live page ({})",
                id,
                collection.id,
                block.kind.as_str()
            ),
            None => log::warn!("Query member {} of {} not in index", id, collection.id),
        }
    }
    members
}
