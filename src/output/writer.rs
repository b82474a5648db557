// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where the vault is written, keeping the
//! conversion itself pure and testable. Operations run one after another;
//! a failed operation is recorded and the rest of the plan still runs.

use super::attachments::AttachmentStore;
use super::types::*;
use crate::error::AppError;
use std::path::Path;
use std::time::Instant;
use tokio::fs;

/// Delivers the output plan into `vault_root`, performing all I/O operations.
pub async fn deliver(
    plan: OutputPlan,
    vault_root: &Path,
    attachments: &dyn AttachmentStore,
) -> Result<OutputReport, AppError> {
    let mut report = OutputReport::new();
    let start_time = Instant::now();

    log::info!(
        "Executing output plan with {} operations into {}",
        plan.operations.len(),
        vault_root.display()
    );

    for operation in plan.operations {
        let op_start = Instant::now();
        match execute_operation(&operation, vault_root, attachments).await {
            Ok(bytes_written) => {
                let duration_ms = op_start.elapsed().as_millis() as u64;
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                    duration_ms,
                });
            }
            Err(e) => {
                log::error!(
                    "Operation on {} failed: {}",
                    operation.target_path().display(),
                    e
                );
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    report.stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

    log::info!(
        "Output plan execution complete: {} succeeded, {} failed in {}ms",
        report.stats.operations_completed,
        report.stats.operations_failed,
        report.stats.total_duration_ms
    );

    Ok(report)
}

/// Executes a single output operation.
async fn execute_operation(
    operation: &DeliveryTarget,
    vault_root: &Path,
    attachments: &dyn AttachmentStore,
) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => {
            write_file(&vault_root.join(path), content).await
        }
        DeliveryTarget::CopyAttachment {
            attachment,
            destination,
        } => {
            let source = attachments.locate(attachment).await?;
            copy_file(&source, &vault_root.join(destination)).await
        }
    }
}

/// Writes content to a file.
async fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

/// Copies an attachment into the vault.
async fn copy_file(source: &Path, destination: &Path) -> Result<usize, AppError> {
    log::debug!("Copying {} to {}", source.display(), destination.display());

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await?;
    }
    let bytes = fs::copy(source, destination).await?;

    log::info!("Copied attachment: {}", destination.display());
    Ok(bytes as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{AttachmentRef, FileSystemAttachments};
    use crate::types::NodeId;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deliver_writes_copies_and_reports_failures() {
        let files = TempDir::new().unwrap();
        std::fs::create_dir_all(files.path().join("f1")).unwrap();
        std::fs::write(files.path().join("f1").join("pic.png"), b"12345").unwrap();
        let vault = TempDir::new().unwrap();

        let plan = OutputPlan::new()
            .with_operation(DeliveryTarget::WriteFile {
                path: PathBuf::from("Home/Page.md"),
                content: "# Page\n".to_string(),
            })
            .with_operation(DeliveryTarget::CopyAttachment {
                attachment: AttachmentRef::new(NodeId::new("f1"), "pic.png"),
                destination: PathBuf::from("Home/Page/pic.png"),
            })
            .with_operation(DeliveryTarget::CopyAttachment {
                attachment: AttachmentRef::new(NodeId::new("f2"), "gone.png"),
                destination: PathBuf::from("Home/Page/gone.png"),
            });

        let store = FileSystemAttachments::new(files.path());
        let report = deliver(plan, vault.path(), &store).await.unwrap();

        assert_eq!(report.stats.operations_completed, 2);
        assert_eq!(report.stats.operations_failed, 1);
        assert_eq!(report.stats.bytes_written, 7 + 5);
        assert!(report.failed[0].error.contains("f2/gone.png"));

        let page = std::fs::read_to_string(vault.path().join("Home/Page.md")).unwrap();
        assert_eq!(page, "# Page\n");
        assert!(vault.path().join("Home/Page/pic.png").is_file());
    }
}
