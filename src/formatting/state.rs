// src/formatting/state.rs
//! Per-document state threaded through the block transformer.
//!
//! One `DocumentContext` lives exactly as long as the document being built:
//! footnote numbering and attachment names are local to it.

use super::document::Node;
use crate::types::NodeId;
use std::collections::HashMap;

/// Mutable accumulator for one output document.
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    /// Vault-relative path of the document, used for relative links.
    pub output_path: String,
    /// Footnote definitions in reference order.
    pub footnotes: Vec<Node>,
    /// Number of footnotes assigned so far.
    pub fn_count: usize,
    footnote_labels: HashMap<NodeId, String>,
    attachment_names: HashMap<String, NodeId>,
}

impl DocumentContext {
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Label already assigned to a discussion in this document.
    pub fn footnote_label(&self, discussion: &NodeId) -> Option<&str> {
        self.footnote_labels.get(discussion).map(String::as_str)
    }

    /// Assigns the next sequential label to a discussion and records its definition.
    pub fn push_footnote(&mut self, discussion: &NodeId, definition_children: Vec<Node>) -> String {
        self.fn_count += 1;
        let label = self.fn_count.to_string();
        self.footnote_labels
            .insert(discussion.clone(), label.clone());
        self.footnotes.push(Node::FootnoteDefinition {
            label: label.clone(),
            children: definition_children,
        });
        label
    }

    /// Replaces the content of a definition pushed earlier.
    pub fn fill_footnote(&mut self, label: &str, children: Vec<Node>) {
        for definition in &mut self.footnotes {
            if let Node::FootnoteDefinition {
                label: existing,
                children: slot,
            } = definition
            {
                if existing == label {
                    *slot = children;
                    return;
                }
            }
        }
    }

    /// Whether an inline anchor already referenced this discussion.
    pub fn is_referenced(&self, discussion: &NodeId) -> bool {
        self.footnote_labels.contains_key(discussion)
    }

    /// Claims a file name in this document's attachment directory. A name
    /// already taken by another attachment gets the attachment's short id as prefix.
    pub fn claim_attachment_name(&mut self, attachment: &NodeId, filename: &str) -> String {
        match self.attachment_names.get(filename) {
            Some(owner) if owner != attachment => {
                let renamed = format!("{}-{}", attachment.short(), filename);
                self.attachment_names
                    .insert(renamed.clone(), attachment.clone());
                renamed
            }
            _ => {
                self.attachment_names
                    .insert(filename.to_string(), attachment.clone());
                filename.to_string()
            }
        }
    }

    /// Takes the accumulated footnote definitions, leaving the list empty.
    pub fn take_footnotes(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.footnotes)
    }
}
