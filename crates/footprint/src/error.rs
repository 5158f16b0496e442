//! Library error type.
//!
//! Only contract violations surface here. Degenerate geometry (empty clipped
//! boundaries, zero-length edges) is filtered silently and zero-filled.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An output column already exists and the overwrite policy is `Strict`.
    #[error("column '{0}' already exists and the overwrite policy is strict")]
    ColumnExists(String),
    #[error("column '{column}' is missing on footprint {id}")]
    MissingColumn { column: String, id: usize },
    #[error("height column '{column}' holds non-numeric value {value:?} on footprint {id}")]
    NonNumericHeight {
        column: String,
        id: usize,
        value: String,
    },
    #[error("column '{column}' holds non-numeric value {value:?} on footprint {id}")]
    NonNumericColumn {
        column: String,
        id: usize,
        value: String,
    },
    #[error("buffer distance must be finite and >= 0, got {0}")]
    InvalidBuffer(f64),
    #[error("threshold '{name}' must be finite, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
