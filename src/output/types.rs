// src/output/types.rs
//! Type definitions for output operations.
//!
//! Conversion never touches the disk: it records what should happen in an
//! [`OutputPlan`], and the writer executes the plan afterwards. All paths in
//! a plan are relative to the vault root.

use super::attachments::AttachmentRef;
use std::path::{Path, PathBuf};

/// Represents a complete output plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPlan {
    /// Operations in the order they were planned
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    /// Creates a new empty output plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation to the plan.
    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: DeliveryTarget) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Content planned for a vault path, if a document is written there.
    pub fn file_content(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.operations.iter().find_map(|op| match op {
            DeliveryTarget::WriteFile { path: p, content } if p == path => Some(content.as_str()),
            _ => None,
        })
    }

    /// Paths of every planned document, in plan order.
    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.operations.iter().filter_map(|op| match op {
            DeliveryTarget::WriteFile { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// Number of planned documents and attachment copies.
    pub fn counts(&self) -> (usize, usize) {
        self.operations
            .iter()
            .fold((0, 0), |(documents, attachments), op| match op {
                DeliveryTarget::WriteFile { .. } => (documents + 1, attachments),
                DeliveryTarget::CopyAttachment { .. } => (documents, attachments + 1),
            })
    }
}

/// Represents a single output operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryTarget {
    /// Write a document
    WriteFile { path: PathBuf, content: String },
    /// Copy an attachment from the attachment store into the vault
    CopyAttachment {
        attachment: AttachmentRef,
        destination: PathBuf,
    },
}

impl DeliveryTarget {
    /// Vault-relative path the operation produces.
    pub fn target_path(&self) -> &Path {
        match self {
            DeliveryTarget::WriteFile { path, .. } => path,
            DeliveryTarget::CopyAttachment { destination, .. } => destination,
        }
    }
}

/// Result of executing an output plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    /// Successfully completed operations
    pub completed: Vec<CompletedOperation>,
    /// Failed operations with errors
    pub failed: Vec<FailedOperation>,
    /// Execution statistics
    pub stats: ExecutionStats,
}

impl OutputReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a completed operation to the report.
    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.stats.operations_completed += 1;
        self.stats.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    /// Adds a failed operation to the report.
    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.stats.operations_failed += 1;
        self.failed.push(operation);
        self
    }

    /// Checks if all operations succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A successfully completed operation.
#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
    pub duration_ms: u64,
}

/// A failed operation with error information.
#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}

/// Execution statistics.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub operations_completed: usize,
    pub operations_failed: usize,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    #[test]
    fn test_plan_queries() {
        let plan = OutputPlan::new()
            .with_operation(DeliveryTarget::WriteFile {
                path: PathBuf::from("A.md"),
                content: "# A\n".to_string(),
            })
            .with_operation(DeliveryTarget::CopyAttachment {
                attachment: AttachmentRef::new(NodeId::new("f1"), "x.png"),
                destination: PathBuf::from("A/x.png"),
            });

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.counts(), (1, 1));
        assert_eq!(plan.file_content("A.md"), Some("# A\n"));
        assert_eq!(plan.file_content("B.md"), None);
        assert_eq!(plan.written_paths().count(), 1);
        assert_eq!(plan.operations[1].target_path(), Path::new("A/x.png"));
    }

    #[test]
    fn test_report_accumulates_stats() {
        let op = DeliveryTarget::WriteFile {
            path: PathBuf::from("d.md"),
            content: "0123456789".to_string(),
        };
        let report = OutputReport::new()
            .with_completed(CompletedOperation {
                operation: op.clone(),
                bytes_written: 10,
                duration_ms: 1,
            })
            .with_failed(FailedOperation {
                operation: op,
                error: "boom".to_string(),
            });
        assert_eq!(report.stats.operations_completed, 1);
        assert_eq!(report.stats.operations_failed, 1);
        assert_eq!(report.stats.bytes_written, 10);
        assert!(!report.is_success());
    }
}
