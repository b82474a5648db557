// src/formatting/rich_text/mod.rs
//! Decodes rich-text runs into inline document nodes.
//!
//! Decoding happens in four passes over the runs of one property:
//! 1. literals with embedded newlines are split into text and line breaks;
//! 2. a comment anchor repeated on several runs is kept on the last one only;
//! 3. sentinel runs are resolved into references, dates, math or links;
//! 4. every other run has its marks folded onto the literal.
//!
//! A comment anchor turns into a footnote reference via the footnote collector.

mod marks;
mod plain;
mod references;

pub use marks::{apply_marks, stable_marks};
pub use plain::{date_text, plain_text, record_title};
pub use references::{internal_link_target, resolve_indirection, wikilink};

use super::document::Inline;
use super::footnotes::make_footnote;
use super::state::DocumentContext;
use crate::constants::{COMMENT_ANCHOR_GLYPH, EQUATION_SENTINEL, REFERENCE_SENTINEL};
use crate::model::{Decoration, RecordIndex, RichText, Run};
use crate::output::PathResolver;
use crate::types::NodeId;
use std::collections::HashSet;

/// A run after newline splitting.
#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Run(Run),
    Break,
}

/// Decodes rich text against one index, resolving references through the
/// shared path resolver.
pub struct RichTextDecoder<'a> {
    paths: &'a PathResolver<'a>,
}

impl<'a> RichTextDecoder<'a> {
    pub fn new(paths: &'a PathResolver<'a>) -> Self {
        Self { paths }
    }

    pub fn index(&self) -> &'a RecordIndex {
        self.paths.index()
    }

    pub fn paths(&self) -> &'a PathResolver<'a> {
        self.paths
    }

    /// Decodes a rich-text value into inline nodes, recording footnotes in `ctx`.
    pub fn decode(&self, text: &RichText, ctx: &mut DocumentContext) -> Vec<Inline> {
        let mut pieces = split_newlines(text.runs());
        dedupe_comment_anchors(&mut pieces);

        let mut output = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                Piece::Break => output.push(Inline::Break),
                Piece::Run(run) => self.decode_run(&run, ctx, &mut output),
            }
        }
        output
    }

    fn decode_run(&self, run: &Run, ctx: &mut DocumentContext, output: &mut Vec<Inline>) {
        let comment = run.decorations.iter().find_map(|d| match d {
            Decoration::Comment(id) => Some(id.clone()),
            _ => None,
        });

        let indirection = run.decorations.first().filter(|d| d.is_indirection());
        if let (true, Some(indirection)) = (is_sentinel(&run.text), indirection) {
            if let Some(node) = resolve_indirection(indirection, self.paths) {
                output.push(node);
            }
            self.push_footnote(comment.as_ref(), ctx, output);
            return;
        }

        let bare_anchor = comment.is_some() && is_bare_anchor(&run.text);
        if !bare_anchor && !run.text.is_empty() {
            output.push(apply_marks(&run.text, &run.decorations, self.paths));
        }
        self.push_footnote(comment.as_ref(), ctx, output);
    }

    fn push_footnote(
        &self,
        discussion: Option<&NodeId>,
        ctx: &mut DocumentContext,
        output: &mut Vec<Inline>,
    ) {
        if let Some(reference) = discussion.and_then(|id| make_footnote(self, id, ctx)) {
            output.push(reference);
        }
    }
}

fn is_sentinel(text: &str) -> bool {
    text == REFERENCE_SENTINEL || text == EQUATION_SENTINEL
}

fn is_bare_anchor(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == COMMENT_ANCHOR_GLYPH
}

/// Splits literals on `\n`. Each text piece gets its own copy of the
/// decorations so later passes can edit them independently.
fn split_newlines(runs: &[Run]) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(runs.len());
    for run in runs {
        if !run.text.contains('\n') {
            pieces.push(Piece::Run(run.clone()));
            continue;
        }
        for (position, part) in run.text.split('\n').enumerate() {
            if position > 0 {
                pieces.push(Piece::Break);
            }
            if !part.is_empty() {
                pieces.push(Piece::Run(Run::decorated(part, run.decorations.clone())));
            }
        }
    }
    pieces
}

/// Keeps each comment anchor only on its last occurrence.
fn dedupe_comment_anchors(pieces: &mut [Piece]) {
    let mut seen: HashSet<NodeId> = HashSet::new();
    for piece in pieces.iter_mut().rev() {
        if let Piece::Run(run) = piece {
            run.decorations.retain(|d| match d {
                Decoration::Comment(id) => seen.insert(id.clone()),
                _ => true,
            });
        }
    }
}
