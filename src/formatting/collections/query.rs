// src/formatting/collections/query.rs
//! Dataview query blocks generated for collection views.

use crate::constants::{COLLECTION_INDEX_STEM, QUERY_TEMPLATE_NAME};
use crate::error::AppError;
use crate::model::{CollectionRecord, FieldKind, ViewMode, ViewRecord};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

const QUERY_TEMPLATE: &str = "{{#if table}}TABLE{{#each fields}}{{#if @first}} {{else}}, {{/if}}{{this}}{{/each}}{{else}}LIST{{/if}}\n\
FROM \"{{dir}}\"\n\
WHERE file.name != \"{{index_stem}}\"";

/// Data handed to the query template.
#[derive(Debug, Clone, Serialize)]
struct QueryData<'a> {
    table: bool,
    fields: Vec<String>,
    dir: String,
    index_stem: &'a str,
}

/// The registered query template.
pub struct QueryTemplate {
    handlebars: Handlebars<'static>,
}

impl QueryTemplate {
    /// Registers the query template; output is not HTML-escaped.
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars
            .register_template_string(QUERY_TEMPLATE_NAME, QUERY_TEMPLATE)
            .map_err(|e| AppError::TemplateRenderError {
                name: QUERY_TEMPLATE_NAME.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { handlebars })
    }

    /// Renders the query body for one view over a collection directory.
    pub fn render(
        &self,
        collection: &CollectionRecord,
        view: &ViewRecord,
        dir: &str,
    ) -> Result<String, AppError> {
        let data = QueryData {
            table: view.mode() == ViewMode::Table,
            fields: query_fields(collection, view),
            dir: dir.replace('"', "\\\""),
            index_stem: COLLECTION_INDEX_STEM,
        };
        self.handlebars
            .render(QUERY_TEMPLATE_NAME, &data)
            .map_err(|e| AppError::TemplateRenderError {
                name: QUERY_TEMPLATE_NAME.to_string(),
                message: e.to_string(),
            })
    }
}

/// Query identifiers of the visible, non-title fields of a view.
pub fn query_fields(collection: &CollectionRecord, view: &ViewRecord) -> Vec<String> {
    view.visible_properties()
        .into_iter()
        .filter_map(|key| match collection.schema.get(key) {
            Some(field) if field.kind == FieldKind::Title => None,
            Some(field) => Some(field_identifier(&field.name, &field.kind)),
            None => {
                log::debug!(
                    "View {} shows field {} missing from the schema of {}",
                    view.id,
                    key,
                    collection.id
                );
                None
            }
        })
        .collect()
}

/// Identifier of a field in queries and front matter. Creation and edit
/// times map to file metadata.
pub fn field_identifier(name: &str, kind: &FieldKind) -> String {
    match kind {
        FieldKind::CreatedTime => "file.ctime".to_string(),
        FieldKind::LastEditedTime => "file.mtime".to_string(),
        _ => camel_case(name),
    }
}

/// `Due Date` → `dueDate`, `URL` → `url`, `myField` → `myField`.
pub fn camel_case(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in name.split(|c: char| !c.is_alphanumeric()) {
        let mut current = String::new();
        let mut previous_lower = false;
        for c in chunk.chars() {
            if c.is_uppercase() && previous_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = c.is_lowercase() || c.is_numeric();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    let mut identifier = String::with_capacity(name.len());
    for (position, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if position == 0 {
            identifier.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                identifier.extend(first.to_uppercase());
                identifier.push_str(chars.as_str());
            }
        }
    }
    if identifier.is_empty() {
        "field".to_string()
    } else {
        identifier
    }
}
