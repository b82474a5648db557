// src/formatting/collections/frontmatter.rs
//! Front matter of collection member pages: one entry per schema field.

use super::query::field_identifier;
use crate::formatting::document::Inline;
use crate::formatting::markdown::MarkdownSerializer;
use crate::formatting::rich_text::RichTextDecoder;
use crate::formatting::state::DocumentContext;
use crate::model::{BlockRecord, CollectionRecord, Decoration, FieldKind, RichText};
use indexmap::IndexMap;

const CHECKED: &str = "✅";
const UNCHECKED: &str = "❌";

/// Builds the front matter of `page` from the schema of its collection.
///
/// Fields are visited in schema order, the title excluded. Empty values and
/// creation/edit times (file metadata in the vault) produce no entry.
pub fn member_frontmatter(
    collection: &CollectionRecord,
    page: &BlockRecord,
    decoder: &RichTextDecoder,
    serializer: &MarkdownSerializer,
    ctx: &mut DocumentContext,
) -> IndexMap<String, String> {
    let mut frontmatter = IndexMap::new();
    for (key, field) in collection.data_fields() {
        let value = page.property(key);
        if value.is_empty() {
            continue;
        }
        let rendered = match field.kind {
            FieldKind::CreatedTime | FieldKind::LastEditedTime => continue,
            FieldKind::Checkbox => {
                let checked = value.raw_text().trim() == "Yes";
                Ok((if checked { CHECKED } else { UNCHECKED }).to_string())
            }
            FieldKind::File => serializer.inlines(&file_embeds(value)),
            _ => serializer.inlines(&decoder.decode(value, ctx)),
        };
        let rendered = match rendered {
            Ok(rendered) if rendered.trim().is_empty() => continue,
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("Skipping field {:?} of {}: {}", field.name, page.id, e);
                continue;
            }
        };
        let identifier = field_identifier(&field.name, &field.kind);
        let key = unique_key(&frontmatter, &identifier);
        if key != identifier {
            log::warn!(
                "Field {:?} of {} collides with an earlier key {:?}, writing it as {:?}",
                field.name,
                page.id,
                identifier,
                key
            );
        }
        frontmatter.insert(key, rendered);
    }
    frontmatter
}

/// `identifier`, or the first of `identifier2`, `identifier3`, ... not yet taken.
fn unique_key(frontmatter: &IndexMap<String, String>, identifier: &str) -> String {
    if !frontmatter.contains_key(identifier) {
        return identifier.to_string();
    }
    (2..)
        .map(|n| format!("{}{}", identifier, n))
        .find(|key| !frontmatter.contains_key(key))
        .unwrap_or_else(|| identifier.to_string())
}

/// Image references for the linked runs of a file property. Separator runs
/// (commas between files) carry no link and are dropped.
fn file_embeds(value: &RichText) -> Vec<Inline> {
    let mut embeds = Vec::new();
    for run in value.runs() {
        let url = run.decorations.iter().find_map(|d| match d {
            Decoration::Link(url) => Some(url.clone()),
            _ => None,
        });
        if let Some(url) = url {
            if !embeds.is_empty() {
                embeds.push(Inline::text(" "));
            }
            embeds.push(Inline::Image {
                url,
                alt: run.text.clone(),
            });
        }
    }
    embeds
}
