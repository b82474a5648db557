// src/formatting/rich_text/marks.rs
//! Mark processing for ordinary (non-sentinel) runs.
//!
//! Marks are deduplicated by tag, inline code is moved to the front, and the
//! remaining marks wrap the literal from innermost to outermost.

use super::references::internal_link_target;
use crate::formatting::document::Inline;
use crate::model::Decoration;
use crate::output::PathResolver;
use crate::types::Color;
use std::collections::HashSet;
use std::str::FromStr;

/// Marks of a run in application order: first occurrence of each tag, code first.
pub fn stable_marks(decorations: &[Decoration]) -> Vec<&Decoration> {
    let mut seen = HashSet::new();
    let mut marks: Vec<&Decoration> = decorations
        .iter()
        .filter(|d| !d.is_indirection() && !matches!(d, Decoration::Comment(_)))
        .filter(|d| seen.insert(d.tag().to_string()))
        .collect();
    // sort_by_key is stable
    marks.sort_by_key(|d| !matches!(d, Decoration::Code));
    marks
}

/// Folds the marks of a run onto its literal.
pub fn apply_marks(text: &str, decorations: &[Decoration], paths: &PathResolver) -> Inline {
    let marks = stable_marks(decorations);
    let mut node = if marks.first().is_some_and(|d| matches!(d, Decoration::Code)) {
        Inline::InlineCode {
            value: text.to_string(),
        }
    } else {
        Inline::text(text)
    };

    for mark in marks {
        node = match mark {
            Decoration::Code => node,
            Decoration::Bold => Inline::Strong {
                children: vec![node],
            },
            Decoration::Italic => Inline::Emphasis {
                children: vec![node],
            },
            Decoration::Strike => Inline::Delete {
                children: vec![node],
            },
            Decoration::Underline => Inline::Underline {
                children: vec![node],
            },
            Decoration::Color(name) => match Color::from_str(name) {
                Ok(Color::Default) => node,
                Ok(color) => Inline::Colored {
                    color,
                    children: vec![node],
                },
                Err(e) => {
                    log::debug!("{}; leaving text uncolored", e);
                    node
                }
            },
            Decoration::Link(url) => match internal_link_target(url, paths) {
                Some(target) => Inline::WikiLink {
                    alias: Some(node.plain()).filter(|alias| *alias != target),
                    target,
                },
                None => Inline::link(url.clone(), vec![node]),
            },
            Decoration::Unrecognized(tag) => {
                log::debug!("Ignoring unrecognized decoration '{}'", tag);
                node
            }
            // Indirections and comments never reach this point
            _ => node,
        };
    }
    node
}
