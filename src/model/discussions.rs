// src/model/discussions.rs
//! Discussion threads anchored to blocks, their comments and reactions.

use super::rich_text::RichText;
use crate::types::NodeId;
use serde::Deserialize;

/// A `discussion` record: an ordered thread of comments.
#[derive(Debug, Clone, Deserialize)]
pub struct Discussion {
    pub id: NodeId,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub comments: Vec<NodeId>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

/// A `comment` record.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: NodeId,
    #[serde(default)]
    pub text: RichText,
    #[serde(default)]
    pub reactions: Vec<NodeId>,
}

/// A `reaction` record. Only the icon is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Reaction {
    pub id: NodeId,
    #[serde(default)]
    pub icon: String,
}
