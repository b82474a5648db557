// src/output/attachments.rs
//! Attachment lookup.
//!
//! Attachments live outside the index, addressed by attachment id plus file
//! name. The default layout is `<files>/<attachment id>/<filename>`, but
//! exports are inconsistent about percent-encoding the name and about the id
//! directory, so every candidate location is tried in turn.

use crate::error::AppError;
use crate::types::NodeId;
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

/// An attachment referenced by a block: its id and the file name taken from
/// the block's source URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentRef {
    pub attachment_id: NodeId,
    pub filename: String,
}

impl AttachmentRef {
    pub fn new(attachment_id: NodeId, filename: impl Into<String>) -> Self {
        Self {
            attachment_id,
            filename: filename.into(),
        }
    }

    /// File name from the last segment of a source URL, percent-decoded.
    ///
    /// Returns `None` when the URL has no usable last segment.
    pub fn filename_from_source(source: &str) -> Option<String> {
        let raw = match Url::parse(source) {
            Ok(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(str::to_string),
            // Relative sources such as "files/x.png"
            Err(_) => source
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .map(str::to_string),
        }?;
        let decoded = percent_decode_str(&raw).decode_utf8_lossy().trim().to_string();
        (!decoded.is_empty()).then_some(decoded)
    }
}

/// Source of attachment binaries.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Finds the file holding an attachment.
    async fn locate(&self, attachment: &AttachmentRef) -> Result<PathBuf, AppError>;
}

/// Attachments stored in a local directory tree.
#[derive(Debug, Clone)]
pub struct FileSystemAttachments {
    root: PathBuf,
}

impl FileSystemAttachments {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate locations in lookup order.
    pub fn candidates(&self, attachment: &AttachmentRef) -> Vec<PathBuf> {
        let id_dir = self.root.join(attachment.attachment_id.as_str());
        let mut candidates = vec![id_dir.join(&attachment.filename)];

        let decoded = percent_decode_str(&attachment.filename)
            .decode_utf8_lossy()
            .into_owned();
        if decoded != attachment.filename {
            candidates.push(id_dir.join(decoded));
        }
        candidates.push(self.root.join(&attachment.filename));
        candidates
    }
}

#[async_trait]
impl AttachmentStore for FileSystemAttachments {
    async fn locate(&self, attachment: &AttachmentRef) -> Result<PathBuf, AppError> {
        let candidates = self.candidates(attachment);
        for candidate in &candidates {
            match tokio::fs::metadata(candidate).await {
                Ok(meta) if meta.is_file() => return Ok(candidate.clone()),
                Ok(_) => log::debug!("{} is not a file", candidate.display()),
                Err(_) => log::debug!("No attachment at {}", candidate.display()),
            }
        }
        Err(AppError::AttachmentNotFound {
            attachment: format!("{}/{}", attachment.attachment_id, attachment.filename),
            tried: candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_from_source() {
        assert_eq!(
            AttachmentRef::filename_from_source(
                "https://s3.amazonaws.com/secure/abc/My%20Photo.png?X-Amz=1"
            ),
            Some("My Photo.png".to_string())
        );
        assert_eq!(
            AttachmentRef::filename_from_source("files/doc.pdf"),
            Some("doc.pdf".to_string())
        );
        assert_eq!(AttachmentRef::filename_from_source("https://example.com/"), None);
    }

    #[test]
    fn test_candidates_order() {
        let store = FileSystemAttachments::new("/files");
        let attachment = AttachmentRef::new(NodeId::new("f1"), "a%20b.png");
        assert_eq!(
            store.candidates(&attachment),
            vec![
                PathBuf::from("/files/f1/a%20b.png"),
                PathBuf::from("/files/f1/a b.png"),
                PathBuf::from("/files/a%20b.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_locate_falls_back_to_flat_layout() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("x.png"), b"png").unwrap();
        let store = FileSystemAttachments::new(dir.path());

        let found = store
            .locate(&AttachmentRef::new(NodeId::new("f1"), "x.png"))
            .await
            .unwrap();
        assert_eq!(found, dir.path().join("x.png"));

        let missing = store
            .locate(&AttachmentRef::new(NodeId::new("f2"), "y.png"))
            .await;
        assert!(matches!(
            missing,
            Err(AppError::AttachmentNotFound { tried: 2, .. })
        ));
    }
}
