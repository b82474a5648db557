// src/formatting/rich_text/references.rs
//! Resolution of indirections: what a sentinel run stands for.

use super::plain::date_text;
use crate::formatting::document::Inline;
use crate::model::Decoration;
use crate::output::PathResolver;
use crate::types::NodeId;

/// Resolves the indirection selected by the first decoration of a sentinel run.
///
/// Returns `None` when the run contributes nothing: an unresolvable page
/// reference (logged as a warning) or an embedded object without a URL.
pub fn resolve_indirection(decoration: &Decoration, paths: &PathResolver) -> Option<Inline> {
    match decoration {
        Decoration::PageRef(id) => match paths.link_target(id) {
            Ok((target, label)) => Some(wikilink(target, label)),
            Err(e) => {
                log::warn!("Dropping reference to {}: {}", id, e);
                None
            }
        },
        Decoration::Date(date) => Some(Inline::text(date_text(date))),
        Decoration::User(id) => {
            log::debug!("No user records in the index; rendering mention of {} by id", id);
            Some(Inline::text(format!("@{}", id)))
        }
        Decoration::Equation(expression) => Some(Inline::InlineMath {
            value: expression.clone(),
        }),
        Decoration::ExternalObject(id) => external_object_url(id, paths)
            .map(|url| Inline::link(url.clone(), vec![Inline::text(url)])),
        _ => None,
    }
}

/// Wikilink with an alias only when it adds something to the target.
pub fn wikilink(target: String, label: String) -> Inline {
    Inline::WikiLink {
        alias: Some(label).filter(|label| *label != target),
        target,
    }
}

/// Vault target of a hyperlink that points back into the export, if any.
pub fn internal_link_target(url: &str, paths: &PathResolver) -> Option<String> {
    let id = NodeId::from_origin_link(url)?;
    paths.lookup(&id)?;
    match paths.link_target(&id) {
        Ok((target, _)) => Some(target),
        Err(e) => {
            log::warn!("Keeping external link {}: {}", url, e);
            None
        }
    }
}

fn external_object_url(id: &NodeId, paths: &PathResolver) -> Option<String> {
    let url = paths
        .index()
        .block(id)
        .and_then(|block| block.format.original_url.clone());
    if url.is_none() {
        log::warn!("Dropping embedded object {}: no original URL", id);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateLiteral, RecordIndex};
    use serde_json::json;

    fn index() -> RecordIndex {
        RecordIndex::from_value(json!({
            "block": {
                "b9afc468-4854-4888-b94d-961d802add16": {"value": {
                    "id": "b9afc468-4854-4888-b94d-961d802add16", "type": "page",
                    "properties": {"title": [["Target"]]},
                    "parent_id": "s", "parent_table": "space"}},
                "eoi": {"value": {"id": "eoi", "type": "external_object_instance",
                    "format": {"domain": "github.com", "original_url": "https://github.com/x/y"}}}
            }
        }))
    }

    #[test]
    fn test_page_reference_becomes_wikilink() {
        let index = index();
        let paths = PathResolver::new(&index);
        let node = resolve_indirection(
            &Decoration::PageRef(NodeId::new("b9afc468-4854-4888-b94d-961d802add16")),
            &paths,
        );
        assert_eq!(
            node,
            Some(Inline::WikiLink {
                target: "Target".to_string(),
                alias: None
            })
        );
    }

    #[test]
    fn test_unresolvable_reference_is_dropped() {
        let index = index();
        let paths = PathResolver::new(&index);
        assert_eq!(
            resolve_indirection(&Decoration::PageRef(NodeId::new("nope")), &paths),
            None
        );
    }

    #[test]
    fn test_other_indirections() {
        let index = index();
        let paths = PathResolver::new(&index);
        let date = DateLiteral {
            start_date: Some("2020-05-06".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_indirection(&Decoration::Date(date), &paths),
            Some(Inline::text("2020-05-06"))
        );
        assert_eq!(
            resolve_indirection(&Decoration::User(NodeId::new("u1")), &paths),
            Some(Inline::text("@u1"))
        );
        assert_eq!(
            resolve_indirection(&Decoration::ExternalObject(NodeId::new("eoi")), &paths),
            Some(Inline::link(
                "https://github.com/x/y",
                vec![Inline::text("https://github.com/x/y")]
            ))
        );
        assert_eq!(
            resolve_indirection(&Decoration::ExternalObject(NodeId::new("gone")), &paths),
            None
        );
    }

    #[test]
    fn test_internal_links() {
        let index = index();
        let paths = PathResolver::new(&index);
        assert_eq!(
            internal_link_target(
                "https://www.notion.so/Target-b9afc46848544888b94d961d802add16",
                &paths
            ),
            Some("Target".to_string())
        );
        assert_eq!(
            internal_link_target("https://www.notion.so/Other-0123456789abcdef0123456789abcdef", &paths),
            None
        );
        assert_eq!(internal_link_target("https://example.com", &paths), None);
    }
}
