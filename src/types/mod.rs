// src/types/mod.rs
//! Domain newtypes shared by the model and the converters.

use thiserror::Error;

mod colors;
mod ids;

pub use colors::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid record ID format: {0}")]
    InvalidId(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
