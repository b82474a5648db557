// src/constants.rs
//! Domain constants that define the operational boundaries of the converter.
//!
//! Each constant is named for the domain concept it constrains. Reading them
//! tells you how deep the converter walks, which glyphs carry meaning inside
//! rich text, and where generated documents land inside the vault.

// ---------------------------------------------------------------------------
// Traversal boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when assembling the block tree of one document.
///
/// Exports are trees by construction, but a malformed export can contain a
/// child list that points back at an ancestor. Assembly stops here.
pub const MAX_TREE_DEPTH: usize = 64;

/// Maximum number of ancestors walked when resolving a path.
pub const MAX_ANCESTOR_DEPTH: usize = 128;

/// Maximum nesting of page references followed when computing a plain-text title.
///
/// A page whose title mentions a page whose title mentions the first page
/// would otherwise never terminate.
pub const MAX_TITLE_REFERENCE_DEPTH: usize = 4;

// ---------------------------------------------------------------------------
// Rich-text sentinels
// ---------------------------------------------------------------------------

/// Literal text of a run whose first decoration is a reference (`p`, `d`, `u`, `eoi`).
pub const REFERENCE_SENTINEL: &str = "‣";

/// Literal text of a run whose first decoration is an inline equation (`e`).
pub const EQUATION_SENTINEL: &str = "⁍";

/// Glyph used by the export as the visible anchor of a bare comment.
pub const COMMENT_ANCHOR_GLYPH: &str = "\u{2063}";

// ---------------------------------------------------------------------------
// Vault layout
// ---------------------------------------------------------------------------

/// Directory, relative to the vault root, holding transcluded satellite documents.
pub const TRANSCLUSION_DIR: &str = "transclusions";

/// File name of the generated index document inside a collection directory.
pub const COLLECTION_INDEX_FILE: &str = "_.md";

/// Stem of the collection index document, excluded from collection queries.
pub const COLLECTION_INDEX_STEM: &str = "_";

/// Segment used when a page or collection has no title.
pub const UNTITLED_SEGMENT: &str = "Untitled";

/// Name of the registered query template.
pub const QUERY_TEMPLATE_NAME: &str = "collection_query";

/// Label of the marker paragraph opening a resolved discussion footnote.
pub const RESOLVED_MARKER: &str = "(resolved)";

// ---------------------------------------------------------------------------
// String capacity hints (performance, not correctness)
// ---------------------------------------------------------------------------

/// Estimated characters per rendered block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;
