//! Run orchestration.
//!
//! A run moves through `Validating -> Shingling -> Sketching -> Banding ->
//! Scoring -> Done`, or lands in `Failed` from any stage. Per-document work
//! fans out on rayon; banding waits for every signature, then a single
//! reducer groups bucket keys. The cancel token is checked at every stage
//! boundary, never mid-document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::algo::lsh::{self, BucketKey, LshIndex};
use crate::algo::minhash::{MinHasher, Signature};
use crate::algo::shingle::{self, ShingleSet};
use crate::algo::similarity::{self, Profile, ScorePath};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::report::{AnalysisReport, Diagnostic, SimilarityReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Validating,
    Shingling,
    Sketching,
    Banding,
    Scoring,
    Done,
    Failed,
}

/// Cooperative cancellation flag shared with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-run intermediate state: one entry per document, in input order.
struct Prepared {
    docs: Vec<Document>,
    shingles: Vec<ShingleSet>,
    signatures: Vec<Signature>,
    keys: Vec<Vec<(usize, BucketKey)>>,
    index: LshIndex,
}

impl Prepared {
    fn profile(&self, i: usize) -> Profile<'_> {
        Profile {
            doc: &self.docs[i],
            shingles: &self.shingles[i],
            signature: &self.signatures[i],
        }
    }

    fn empty_document_notes(&self) -> Vec<String> {
        self.docs
            .iter()
            .zip(&self.shingles)
            .filter(|(_, s)| s.is_empty())
            .map(|(d, _)| {
                Diagnostic::EmptyDocument {
                    id: d.id(),
                    name: d.name().to_string(),
                }
                .to_string()
            })
            .collect()
    }
}

/// Single-shot analysis run.
///
/// Owns its options and everything it computes; nothing survives between
/// calls except the last stage reached.
#[derive(Debug)]
pub struct Pipeline {
    options: Options,
    cancel: CancelToken,
    stage: Stage,
}

impl Pipeline {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            cancel: CancelToken::new(),
            stage: Stage::Validating,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Compare exactly two documents via the exact path.
    ///
    /// The pair is still banded so `candidate_pair` is meaningful, but
    /// `candidate_pairs_found` stays 0: no search took place.
    pub fn compare(&mut self, a: Document, b: Document) -> Result<SimilarityReport> {
        let result = self.prepare(vec![a, b]).and_then(|prepared| {
            self.enter(Stage::Scoring)?;
            let report = self.score_pair(&prepared, 0, 1, ScorePath::Exact, 0);
            self.finish(2, 0);
            Ok(report)
        });
        self.settle(result)
    }

    /// Compare a collection.
    ///
    /// Two documents are scored as a pair. Larger collections score only the
    /// LSH candidate pairs, exactly when the collection fits within
    /// `exact_limit` and from signatures otherwise.
    pub fn analyze(&mut self, docs: Vec<Document>) -> Result<AnalysisReport> {
        let result = self.prepare(docs).and_then(|prepared| {
            self.enter(Stage::Scoring)?;
            let report = self.score_collection(&prepared);
            self.finish(prepared.docs.len(), report.candidate_pairs_found);
            Ok(report)
        });
        self.settle(result)
    }

    fn prepare(&mut self, docs: Vec<Document>) -> Result<Prepared> {
        self.enter(Stage::Validating)?;
        self.options.validate()?;
        if docs.len() < 2 {
            return Err(Error::EmptyCollection { found: docs.len() });
        }

        let opts = self.options.clone();
        let hasher = MinHasher::new(opts.num_hashes, opts.seed);

        self.enter(Stage::Shingling)?;
        debug!(
            documents = docs.len(),
            kind = opts.shingle_type.as_str(),
            k = opts.shingle_size,
            "shingling"
        );
        let shingles: Vec<ShingleSet> = docs
            .par_iter()
            .map(|d| shingle::shingle(d.text(), opts.shingle_type, opts.shingle_size))
            .collect::<Result<_>>()?;
        for (doc, set) in docs.iter().zip(&shingles) {
            if set.is_empty() {
                warn!(document = doc.name(), "empty shingle set");
            }
        }

        self.enter(Stage::Sketching)?;
        let signatures: Vec<Signature> = shingles.par_iter().map(|s| hasher.sketch(s)).collect();

        self.enter(Stage::Banding)?;
        let keys: Vec<Vec<(usize, BucketKey)>> = signatures
            .par_iter()
            .map(|s| lsh::band_keys(s, opts.num_bands, opts.num_rows))
            .collect();
        let index = LshIndex::from_keys(opts.num_bands, keys.iter().cloned().enumerate());
        debug!(
            bands = opts.num_bands,
            rows = opts.num_rows,
            largest_bucket = index.largest_bucket(),
            "banded"
        );

        Ok(Prepared {
            docs,
            shingles,
            signatures,
            keys,
            index,
        })
    }

    fn score_pair(
        &self,
        prepared: &Prepared,
        i: usize,
        j: usize,
        path: ScorePath,
        candidate_pairs_found: usize,
    ) -> SimilarityReport {
        let mut report = similarity::estimate(prepared.profile(i), prepared.profile(j), path);
        report.candidate_pair = lsh::shares_bucket(&prepared.keys[i], &prepared.keys[j]);
        report.candidate_pairs_found = candidate_pairs_found;
        report
    }

    fn score_collection(&self, prepared: &Prepared) -> AnalysisReport {
        let n = prepared.docs.len();
        let mut notes = prepared.empty_document_notes();

        let (pairs, found, path) = if n == 2 {
            (vec![(0, 1)], 0, ScorePath::Exact)
        } else {
            let candidates = prepared.index.candidate_pairs();
            let found = candidates.len();
            let path = if n <= self.options.exact_limit {
                ScorePath::Exact
            } else {
                ScorePath::Estimated
            };
            (candidates, found, path)
        };

        let mut reports: Vec<SimilarityReport> = pairs
            .par_iter()
            .map(|&(i, j)| self.score_pair(prepared, i, j, path, found))
            .collect();

        if n > 2 {
            reports.sort_by(|a, b| {
                b.similarity_percent
                    .partial_cmp(&a.similarity_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.pair.ids().cmp(&b.pair.ids()))
            });
        }

        let threshold = lsh::threshold(self.options.num_bands, self.options.num_rows);
        if n > 2 && found == 0 {
            notes.push(format!(
                "no candidate pairs; LSH threshold is about {:.0}% Jaccard",
                threshold * 100.0
            ));
        }

        AnalysisReport {
            documents: n,
            candidate_pairs_found: found,
            lsh_threshold: threshold,
            reports,
            notes,
        }
    }

    fn enter(&mut self, next: Stage) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled { stage: next });
        }
        debug!(from = ?self.stage, to = ?next, "stage");
        self.stage = next;
        Ok(())
    }

    fn finish(&mut self, documents: usize, candidate_pairs: usize) {
        self.stage = Stage::Done;
        info!(documents, candidate_pairs, "analysis complete");
    }

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!(stage = ?self.stage, error = %e, "run failed");
            self.stage = Stage::Failed;
        }
        result
    }
}
