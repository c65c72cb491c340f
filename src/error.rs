//! Error types for nearsim.

use thiserror::Error;

use crate::engine::Stage;

/// Errors that abort an analysis run.
///
/// Data-quality conditions such as an empty shingle set are not errors; they
/// surface as [`crate::report::Diagnostic`] notes on the report instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Options rejected before any document was touched.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Fewer than two documents supplied.
    #[error("need at least 2 documents to compare, got {found}")]
    EmptyCollection { found: usize },

    /// The caller's cancel token fired; the run stopped at a stage boundary.
    #[error("run cancelled before {stage:?}")]
    Cancelled { stage: Stage },

    /// A JSON request at the ops boundary had the wrong shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
