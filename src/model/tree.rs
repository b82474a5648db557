// src/model/tree.rs
//! The tree snapshot listing the top-level pages of a space.

use crate::error::AppError;
use crate::types::NodeId;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeSnapshot {
    #[serde(default)]
    pub space: SpaceTree,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceTree {
    #[serde(default)]
    pub pages: Vec<TreePage>,
}

/// One top-level entry. `path` is only used to cross-check resolved paths.
#[derive(Debug, Clone, Deserialize)]
pub struct TreePage {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl TreeSnapshot {
    /// Reads and parses a tree snapshot file.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let text = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&text).map_err(|source| AppError::JsonParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn pages(&self) -> &[TreePage] {
        &self.space.pages
    }
}
