// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Path resolution and plan types are pure; the writer is the only part that
//! performs I/O.

mod attachments;
mod paths;
mod types;
mod writer;

pub use attachments::{AttachmentRef, AttachmentStore, FileSystemAttachments};
pub use paths::{
    get_relative_path, sanitize_segment, transclusion_path, Ancestor, PathResolver, Trailing,
};
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::deliver;
