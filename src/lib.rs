//! Near-duplicate detection: documents are shingled, sketched into MinHash
//! signatures and banded with LSH, so a collection can be compared without
//! scoring every pair, while a two-document comparison stays exact.

pub mod algo;
pub mod document;
pub mod engine;
pub mod error;
pub mod ops;
pub mod options;
pub mod report;

pub use document::{DocId, Document};
pub use engine::{CancelToken, Pipeline, Stage};
pub use error::{Error, Result};
pub use options::{Options, ShingleType};
pub use report::{AnalysisReport, SimilarityReport};
