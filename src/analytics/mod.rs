// src/analytics/mod.rs
//! Feature measurement over a record index.
//!
//! Answers "what does this export actually use?": which block kinds, which
//! rich-text decorations, which callout styles. Useful before converting a
//! new export, and printed by `--report`.

use crate::model::{BlockKind, RecordIndex, RichText};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Feature counts for one index. Ordered maps keep the report stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexMeasurement {
    pub table_sizes: BTreeMap<String, usize>,
    pub skipped_records: usize,
    pub block_kinds: BTreeMap<String, usize>,
    pub unrecognized_kinds: BTreeSet<String>,
    pub decoration_tags: BTreeMap<String, usize>,
    pub callout_formats: BTreeSet<String>,
    pub reaction_icons: BTreeMap<String, usize>,
    pub attachment_references: usize,
}

/// Measures the features used by an index.
pub fn measure_index(index: &RecordIndex) -> IndexMeasurement {
    let mut metrics = IndexMeasurement {
        table_sizes: index.table_sizes.clone(),
        skipped_records: index.skipped_records,
        ..IndexMeasurement::default()
    };

    for block in index.blocks.values() {
        *metrics
            .block_kinds
            .entry(block.kind.as_str().to_string())
            .or_default() += 1;
        if let BlockKind::Unrecognized(name) = &block.kind {
            metrics.unrecognized_kinds.insert(name.clone());
        }
        if block.kind == BlockKind::Callout {
            metrics.callout_formats.insert(format!(
                "icon={} color={}",
                block.format.page_icon.as_deref().unwrap_or("-"),
                block.format.block_color.as_deref().unwrap_or("-")
            ));
        }
        metrics.attachment_references += block.file_ids.len();
        count_tags(&mut metrics.decoration_tags, block.title());
    }
    for collection in index.collections.values() {
        count_tags(&mut metrics.decoration_tags, &collection.name);
    }
    for comment in index.comments.values() {
        count_tags(&mut metrics.decoration_tags, &comment.text);
    }
    for reaction in index.reactions.values() {
        *metrics
            .reaction_icons
            .entry(reaction.icon.clone())
            .or_default() += 1;
    }

    log::debug!(
        "Measured {} blocks of {} kinds",
        index.blocks.len(),
        metrics.block_kinds.len()
    );
    metrics
}

fn count_tags(counts: &mut BTreeMap<String, usize>, text: &RichText) {
    for tag in text.tags() {
        *counts.entry(tag.to_string()).or_default() += 1;
    }
}

impl fmt::Display for IndexMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records per table:")?;
        for (table, count) in &self.table_sizes {
            writeln!(f, "  {:<20} {}", table, count)?;
        }
        if self.skipped_records > 0 {
            writeln!(f, "  ({} malformed records skipped)", self.skipped_records)?;
        }

        writeln!(f, "Block kinds:")?;
        for (kind, count) in &self.block_kinds {
            writeln!(f, "  {:<28} {}", kind, count)?;
        }
        if !self.unrecognized_kinds.is_empty() {
            let names: Vec<&str> = self.unrecognized_kinds.iter().map(String::as_str).collect();
            writeln!(f, "  unrecognized: {}", names.join(", "))?;
        }

        writeln!(f, "Decoration tags:")?;
        for (tag, count) in &self.decoration_tags {
            writeln!(f, "  {:<6} {}", tag, count)?;
        }

        writeln!(f, "Callout formats:")?;
        for format in &self.callout_formats {
            writeln!(f, "  {}", format)?;
        }

        if !self.reaction_icons.is_empty() {
            let icons: Vec<String> = self
                .reaction_icons
                .iter()
                .map(|(icon, count)| format!("{} x{}", icon, count))
                .collect();
            writeln!(f, "Reactions: {}", icons.join(", "))?;
        }
        write!(f, "Attachment references: {}", self.attachment_references)
    }
}
