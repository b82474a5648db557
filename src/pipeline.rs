// src/pipeline.rs
//! Pipeline capability traits: the three stages of an export-to-vault run.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::error::AppError;
use crate::formatting::Conversion;
use crate::model::{RecordIndex, TreeSnapshot};
use crate::output::{OutputPlan, OutputReport};

/// Loads an export: the record index and the tree snapshot.
#[async_trait::async_trait]
pub trait ExportSource {
    async fn load(&self) -> Result<(RecordIndex, TreeSnapshot), AppError>;
}

/// Transforms a loaded export into an output plan.
pub trait VaultComposer {
    fn compose(&self, index: &RecordIndex, tree: &TreeSnapshot) -> Result<Conversion, AppError>;
}

/// Executes an output plan against the vault.
#[async_trait::async_trait]
pub trait VaultDelivery {
    async fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError>;
}
