// src/formatting/footnotes.rs
//! Footnote collection: discussion threads become trailing footnote definitions.

use super::document::{Inline, Node};
use super::rich_text::RichTextDecoder;
use super::state::DocumentContext;
use crate::constants::RESOLVED_MARKER;
use crate::model::BlockRecord;
use crate::types::NodeId;

/// Returns a footnote reference for a discussion, adding its definition to
/// the document on first use.
///
/// The definition holds one paragraph per comment, preceded by a marker when
/// the discussion is resolved. A discussion referenced again in the same
/// document reuses its label.
pub fn make_footnote(
    decoder: &RichTextDecoder,
    discussion_id: &NodeId,
    ctx: &mut DocumentContext,
) -> Option<Inline> {
    if let Some(label) = ctx.footnote_label(discussion_id) {
        return Some(Inline::FootnoteReference {
            label: label.to_string(),
        });
    }

    let Some(discussion) = decoder.index().discussion(discussion_id) else {
        log::warn!("Discussion {} not found, no footnote emitted", discussion_id);
        return None;
    };

    // Reserve the label before decoding comments, which may anchor footnotes too
    let label = ctx.push_footnote(discussion_id, Vec::new());

    let mut children = Vec::with_capacity(discussion.comments.len() + 1);
    if discussion.resolved {
        children.push(Node::marker(RESOLVED_MARKER));
    }
    for comment_id in &discussion.comments {
        match decoder.index().comment(comment_id) {
            Some(comment) => children.push(Node::paragraph(decoder.decode(&comment.text, ctx))),
            None => log::warn!(
                "Comment {} of discussion {} not found, skipping",
                comment_id,
                discussion_id
            ),
        }
    }
    ctx.fill_footnote(&label, children);

    Some(Inline::FootnoteReference { label })
}

/// Footnote references for the block-level discussions of a block that no
/// inline anchor has referenced yet.
pub fn block_footnotes(
    decoder: &RichTextDecoder,
    block: &BlockRecord,
    ctx: &mut DocumentContext,
) -> Vec<Inline> {
    let mut references = Vec::new();
    for id in &block.discussions {
        if ctx.is_referenced(id) {
            continue;
        }
        if let Some(reference) = make_footnote(decoder, id, ctx) {
            references.push(reference);
        }
    }
    references
}
