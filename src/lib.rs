// src/lib.rs
//! notion2obsidian library: converts a Notion record-map export into an Obsidian vault.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `ConversionConfig`, `CommandLineInput`
//! - **Domain model**: `RecordIndex`, `TreeSnapshot`, `BlockRecord`, `RichText`, etc.
//! - **Conversion**: `convert_export`, `convert_record`, `Conversion`
//! - **Output**: `OutputPlan`, `deliver`, `FileSystemAttachments`

mod analytics;
mod config;
pub mod constants;
mod error;
pub mod formatting;
pub mod model;
pub mod output;
mod pipeline;
pub mod types;

// --- Error Handling ---
pub use crate::error::AppError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ConversionConfig};

// --- Domain Model ---
pub use crate::model::{
    BlockKind, BlockRecord, CollectionRecord, RecordIndex, RichText, TreePage, TreeSnapshot,
    ViewRecord,
};

// --- Domain Types ---
pub use crate::types::{Color, NodeId};

// --- Conversion ---
pub use crate::formatting::{
    convert_export, convert_record, Conversion, ConversionReport, SkippedDocument,
};

// --- Output ---
pub use crate::output::{
    deliver, AttachmentRef, AttachmentStore, DeliveryTarget, FileSystemAttachments, OutputPlan,
    OutputReport,
};

// --- Analytics ---
pub use crate::analytics::{measure_index, IndexMeasurement};

// --- Pipeline Traits ---
pub use crate::pipeline::{ExportSource, VaultComposer, VaultDelivery};
