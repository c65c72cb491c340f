use serde::Serialize;
use siphasher::sip::SipHasher13;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use super::minhash::Signature;

/// Hash of one band's rows, salted with the band index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BucketKey(pub u64);

/// Split a signature into `bands` chunks of `rows` slots and hash each one.
///
/// Chunk `j` covers slots `[j*rows, (j+1)*rows)`. Slots past `bands * rows`
/// are ignored; a short signature yields fewer bands.
pub fn band_keys(signature: &Signature, bands: usize, rows: usize) -> Vec<(usize, BucketKey)> {
    if rows == 0 {
        return vec![];
    }
    signature
        .as_slice()
        .chunks_exact(rows)
        .take(bands)
        .enumerate()
        .map(|(band_idx, chunk)| (band_idx, hash_band(band_idx, chunk)))
        .collect()
}

/// True when the two key lists collide on at least one band index.
pub fn shares_bucket(a: &[(usize, BucketKey)], b: &[(usize, BucketKey)]) -> bool {
    a.iter().zip(b.iter()).any(|(ka, kb)| ka == kb)
}

/// Jaccard similarity at which a pair has roughly a 50% chance of becoming a
/// candidate: (1/bands)^(1/rows).
pub fn threshold(bands: usize, rows: usize) -> f64 {
    if bands == 0 || rows == 0 {
        return 1.0;
    }
    (1.0 / bands as f64).powf(1.0 / rows as f64)
}

/// Probability that a pair with Jaccard `j` shares at least one band:
/// 1 - (1 - j^rows)^bands.
pub fn candidate_probability(j: f64, bands: usize, rows: usize) -> f64 {
    1.0 - (1.0 - j.powi(rows as i32)).powi(bands as i32)
}

/// Per-band bucket table for one run.
///
/// Each document's keys are computed independently (see [`band_keys`]) and
/// then folded in here by a single reducer.
#[derive(Debug)]
pub struct LshIndex {
    /// band_idx → bucket key → item positions
    buckets: Vec<HashMap<BucketKey, Vec<usize>>>,
}

impl LshIndex {
    pub fn new(bands: usize) -> Self {
        Self {
            buckets: (0..bands).map(|_| HashMap::new()).collect(),
        }
    }

    /// Group every document's keys by `(band, key)`.
    pub fn from_keys<I>(bands: usize, keyed: I) -> Self
    where
        I: IntoIterator<Item = (usize, Vec<(usize, BucketKey)>)>,
    {
        let mut index = Self::new(bands);
        for (item, keys) in keyed {
            index.insert(item, &keys);
        }
        index
    }

    pub fn insert(&mut self, item: usize, keys: &[(usize, BucketKey)]) {
        for &(band_idx, key) in keys {
            if let Some(band) = self.buckets.get_mut(band_idx) {
                band.entry(key).or_default().push(item);
            }
        }
    }

    /// All pairs sharing at least one bucket, deduplicated as `(a, b)` with
    /// `a < b` and sorted.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: HashSet<(usize, usize)> = HashSet::new();

        for bucket_map in &self.buckets {
            for items in bucket_map.values() {
                if items.len() < 2 {
                    continue;
                }
                for i in 0..items.len() {
                    for j in (i + 1)..items.len() {
                        if items[i] == items[j] {
                            continue;
                        }
                        let a = items[i].min(items[j]);
                        let b = items[i].max(items[j]);
                        pairs.insert((a, b));
                    }
                }
            }
        }

        let mut result: Vec<(usize, usize)> = pairs.into_iter().collect();
        result.sort();
        result
    }

    /// Size of the most crowded bucket across all bands.
    pub fn largest_bucket(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| b.values())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

fn hash_band(band_idx: usize, values: &[u64]) -> BucketKey {
    let mut hasher = SipHasher13::new_with_keys(band_idx as u64, 0xCAFEBABE);
    for &v in values {
        v.hash(&mut hasher);
    }
    BucketKey(hasher.finish())
}
