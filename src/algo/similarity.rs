//! Pair scoring: exact Jaccard over shingle sets, or the MinHash estimate.

use super::minhash::Signature;
use super::shingle::ShingleSet;
use crate::document::Document;
use crate::report::{to_percent, Diagnostic, PairRef, SimilarityReport};

/// Which path scores a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePath {
    /// Full shingle sets are compared; the estimate rides along.
    Exact,
    /// Only signature agreement is used.
    Estimated,
}

/// Everything the estimator needs to know about one document.
#[derive(Debug, Clone, Copy)]
pub struct Profile<'a> {
    pub doc: &'a Document,
    pub shingles: &'a ShingleSet,
    pub signature: &'a Signature,
}

/// `|A ∩ B| / |A ∪ B|`, or `None` when both sets are empty.
pub fn exact_jaccard(a: &ShingleSet, b: &ShingleSet) -> Option<f64> {
    let inter = a.intersection_len(b);
    let union = a.len() + b.len() - inter;
    if union == 0 {
        return None;
    }
    Some(inter as f64 / union as f64)
}

/// Fraction of matching signature slots.
pub fn estimated_jaccard(a: &Signature, b: &Signature) -> f64 {
    a.jaccard(b)
}

/// Score one pair and build its report.
///
/// `candidate_pair` and `candidate_pairs_found` are left for the caller to
/// fill in; they depend on the run, not the pair.
pub fn estimate(a: Profile<'_>, b: Profile<'_>, path: ScorePath) -> SimilarityReport {
    let mut notes: Vec<Diagnostic> = Vec::new();
    for p in [&a, &b] {
        if p.shingles.is_empty() {
            notes.push(Diagnostic::EmptyDocument {
                id: p.doc.id(),
                name: p.doc.name().to_string(),
            });
        }
    }

    let minhash = estimated_jaccard(a.signature, b.signature);

    let (similarity, jaccard) = match path {
        ScorePath::Exact => {
            let exact = exact_jaccard(a.shingles, b.shingles).unwrap_or_else(|| {
                notes.push(Diagnostic::EmptyUnion);
                1.0
            });
            (exact, minhash)
        }
        ScorePath::Estimated => {
            notes.push(Diagnostic::ExactSkipped {
                num_hashes: a.signature.len(),
            });
            (minhash, minhash)
        }
    };

    SimilarityReport {
        pair: PairRef::new(a.doc, b.doc),
        similarity_percent: to_percent(similarity),
        jaccard_percent: Some(to_percent(jaccard)),
        candidate_pairs_found: 0,
        candidate_pair: false,
        notes: notes.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::minhash::MinHasher;
    use crate::algo::shingle::shingle;
    use crate::document::DocId;
    use crate::options::ShingleType;

    struct Fixture {
        doc: Document,
        shingles: ShingleSet,
        signature: Signature,
    }

    impl Fixture {
        fn new(id: usize, text: &str, k: usize, mh: &MinHasher) -> Self {
            let shingles = shingle(text, ShingleType::Char, k).unwrap();
            let signature = mh.sketch(&shingles);
            Self {
                doc: Document::new(DocId(id), format!("doc{id}"), text),
                shingles,
                signature,
            }
        }

        fn profile(&self) -> Profile<'_> {
            Profile {
                doc: &self.doc,
                shingles: &self.shingles,
                signature: &self.signature,
            }
        }
    }

    #[test]
    fn identical_documents_score_100_without_notes() {
        let mh = MinHasher::new(100, 1);
        let a = Fixture::new(0, "the quick brown fox", 5, &mh);
        let b = Fixture::new(1, "the quick brown fox", 5, &mh);
        let r = estimate(a.profile(), b.profile(), ScorePath::Exact);
        assert_eq!(r.similarity_percent, 100.0);
        assert_eq!(r.jaccard_percent, Some(100.0));
        assert!(r.notes.is_empty());
    }

    #[test]
    fn disjoint_documents_score_zero() {
        let mh = MinHasher::new(100, 1);
        let a = Fixture::new(0, "aaaaaaa", 3, &mh);
        let b = Fixture::new(1, "bbbbbbb", 3, &mh);
        let r = estimate(a.profile(), b.profile(), ScorePath::Exact);
        assert_eq!(r.similarity_percent, 0.0);
    }

    #[test]
    fn empty_document_scores_zero_with_note() {
        let mh = MinHasher::new(100, 1);
        let a = Fixture::new(0, "aaaa", 4, &mh);
        let b = Fixture::new(1, "", 4, &mh);
        let r = estimate(a.profile(), b.profile(), ScorePath::Exact);
        assert_eq!(r.similarity_percent, 0.0);
        assert_eq!(r.notes.len(), 1);
        assert!(r.notes[0].contains("doc1"));
    }

    #[test]
    fn two_empty_documents_are_identical() {
        let mh = MinHasher::new(20, 1);
        let a = Fixture::new(0, "", 4, &mh);
        let b = Fixture::new(1, "", 4, &mh);
        let r = estimate(a.profile(), b.profile(), ScorePath::Exact);
        assert_eq!(r.similarity_percent, 100.0);
        assert_eq!(r.jaccard_percent, Some(100.0));
        assert!(r
            .notes
            .iter()
            .any(|n| n == &Diagnostic::EmptyUnion.to_string()));
    }

    #[test]
    fn estimated_path_mirrors_value_and_notes_skip() {
        let mh = MinHasher::new(100, 1);
        let a = Fixture::new(0, "near duplicate text here", 4, &mh);
        let b = Fixture::new(1, "near duplicate text there", 4, &mh);
        let r = estimate(a.profile(), b.profile(), ScorePath::Estimated);
        assert_eq!(r.jaccard_percent, Some(r.similarity_percent));
        assert_eq!(r.notes.len(), 1);
        assert!(r.notes[0].contains("skipped"));
    }

    #[test]
    fn exact_jaccard_is_symmetric() {
        let a: ShingleSet = [1u64, 2, 3, 4].into_iter().collect();
        let b: ShingleSet = [3u64, 4, 5].into_iter().collect();
        assert_eq!(exact_jaccard(&a, &b), exact_jaccard(&b, &a));
        assert_eq!(exact_jaccard(&a, &b), Some(0.4));
    }

    #[test]
    fn exact_jaccard_of_self_is_one() {
        let a: ShingleSet = [7u64, 8].into_iter().collect();
        assert_eq!(exact_jaccard(&a, &a), Some(1.0));
        assert_eq!(exact_jaccard(&ShingleSet::default(), &ShingleSet::default()), None);
    }
}
