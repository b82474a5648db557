// src/error.rs
//! Application error types with structured error handling.
//!
//! Most failures inside a conversion are recoverable: they are logged and the
//! offending inline node, block or document is skipped. The variants below are
//! the ones that travel through `Result` before that decision is made.

use crate::types::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed export: {0}")]
    MalformedExport(String),

    #[error("Unresolved reference to {id}: {reason}")]
    UnresolvedReference { id: NodeId, reason: String },

    #[error("Maximum recursion depth ({0}) exceeded")]
    RecursionLimitExceeded(usize),

    #[error("Failed to serialize document {path}: {message}")]
    SerializationFailed { path: String, message: String },

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Attachment {attachment} not found (tried {tried} locations)")]
    AttachmentNotFound { attachment: String, tried: usize },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Shorthand for an unresolved reference.
    pub fn unresolved(id: &NodeId, reason: impl Into<String>) -> Self {
        AppError::UnresolvedReference {
            id: id.clone(),
            reason: reason.into(),
        }
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}
