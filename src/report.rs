//! Result types returned to the caller.
//!
//! Field names serialise in the client's camelCase (`similarityPercent`,
//! `jaccardPercent`, `candidatePairsFound`, ...).

use std::fmt;

use serde::Serialize;

use crate::document::{DocId, Document};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocRef {
    pub id: DocId,
    pub name: String,
}

impl From<&Document> for DocRef {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id(),
            name: doc.name().to_string(),
        }
    }
}

/// The two documents a report is about, lower id first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairRef {
    pub a: DocRef,
    pub b: DocRef,
}

impl PairRef {
    pub fn new(a: &Document, b: &Document) -> Self {
        let (a, b) = if a.id() <= b.id() { (a, b) } else { (b, a) };
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn ids(&self) -> (DocId, DocId) {
        (self.a.id, self.b.id)
    }
}

/// Similarity of one pair.
///
/// When exact Jaccard was computed, `similarity_percent` holds it and
/// `jaccard_percent` carries the MinHash estimate. When only the estimate was
/// available, both carry the estimate and a note says so.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    pub pair: PairRef,
    pub similarity_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jaccard_percent: Option<f64>,
    pub candidate_pairs_found: usize,
    /// Whether LSH banding flagged this pair.
    pub candidate_pair: bool,
    pub notes: Vec<String>,
}

/// Result of a collection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub documents: usize,
    pub candidate_pairs_found: usize,
    /// Approximate Jaccard at which a pair becomes a candidate half the time.
    pub lsh_threshold: f64,
    pub reports: Vec<SimilarityReport>,
    pub notes: Vec<String>,
}

impl AnalysisReport {
    /// Report for the pair `(a, b)` in either order.
    pub fn find(&self, a: DocId, b: DocId) -> Option<&SimilarityReport> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.reports.iter().find(|r| r.pair.ids() == key)
    }

    /// Drop pair reports below `min_percent`.
    pub fn retain_at_least(&mut self, min_percent: f64) {
        self.reports.retain(|r| r.similarity_percent >= min_percent);
    }
}

/// Non-fatal conditions attached to reports as human-readable notes.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A document produced no shingles.
    EmptyDocument { id: DocId, name: String },
    /// Both shingle sets were empty; similarity is defined as 100.
    EmptyUnion,
    /// Exact Jaccard was skipped; the score is the MinHash estimate.
    ExactSkipped { num_hashes: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyDocument { id, name } => {
                write!(f, "shingle set empty for document {name} ({id})")
            }
            Diagnostic::EmptyUnion => {
                write!(f, "both shingle sets empty; documents treated as identical")
            }
            Diagnostic::ExactSkipped { num_hashes } => write!(
                f,
                "exact Jaccard skipped; similarity estimated from {num_hashes} MinHash slots"
            ),
        }
    }
}

/// Round a `[0, 1]` fraction to a percentage with two decimals.
pub fn to_percent(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounding() {
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(1.0 / 3.0), 33.33);
        assert_eq!(to_percent(0.81818), 81.82);
    }

    #[test]
    fn pair_ref_orders_ids() {
        let a = Document::new(DocId(3), "c", "");
        let b = Document::new(DocId(1), "a", "");
        let pair = PairRef::new(&a, &b);
        assert_eq!(pair.ids(), (DocId(1), DocId(3)));
    }

    #[test]
    fn diagnostic_text() {
        let d = Diagnostic::EmptyDocument {
            id: DocId(2),
            name: "b.txt".into(),
        };
        assert_eq!(d.to_string(), "shingle set empty for document b.txt (#2)");
    }

    #[test]
    fn serialises_client_names() {
        let a = Document::new(DocId(0), "a", "");
        let b = Document::new(DocId(1), "b", "");
        let report = SimilarityReport {
            pair: PairRef::new(&a, &b),
            similarity_percent: 50.0,
            jaccard_percent: None,
            candidate_pairs_found: 0,
            candidate_pair: false,
            notes: vec![],
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["similarityPercent"], 50.0);
        assert!(v.get("jaccardPercent").is_none());
        assert_eq!(v["candidatePairsFound"], 0);
        assert_eq!(v["pair"]["b"]["name"], "b");
    }
}
