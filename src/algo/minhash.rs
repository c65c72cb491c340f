use serde::{Deserialize, Serialize};

use super::shingle::ShingleSet;

/// Mersenne prime 2^61 - 1; the modulus of the universal hash family.
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// Slot value for a document with no shingles. Never produced by a real hash
/// since every `h_i(x)` is below [`MERSENNE_PRIME`].
pub const EMPTY_SLOT: u64 = u64::MAX;

/// MinHash signature: one minimum hash value per hash function.
///
/// Two signatures from the same [`MinHasher`] estimate Jaccard similarity:
/// J(A,B) ≈ (number of matching positions) / num_hashes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(Vec<u64>);

impl Signature {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// True when every slot holds the empty sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0.iter().all(|&v| v == EMPTY_SLOT)
    }

    /// Number of slots where both signatures hold the same value.
    pub fn matching_slots(&self, other: &Signature) -> usize {
        debug_assert_eq!(self.len(), other.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a == b)
            .count()
    }

    /// Fraction of agreeing slots, in `[0, 1]`.
    pub fn jaccard(&self, other: &Signature) -> f64 {
        let n = self.len().min(other.len());
        if n == 0 {
            return 0.0;
        }
        self.matching_slots(other) as f64 / n as f64
    }
}

impl From<Vec<u64>> for Signature {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}

/// Family of `num_hashes` universal hash functions
/// `h_i(x) = (a_i * x + b_i) mod p`.
///
/// Coefficients are derived from `seed` once and shared by every document in
/// a run. Coefficient `i` depends only on the seed and `i`, so a longer family
/// extends a shorter one with the same seed.
#[derive(Debug, Clone)]
pub struct MinHasher {
    coefficients: Vec<(u64, u64)>,
}

impl MinHasher {
    pub fn new(num_hashes: usize, seed: u64) -> Self {
        let mut rng = CoefficientRng::new(seed);
        let coefficients = (0..num_hashes)
            .map(|_| {
                let a = rng.next() % (MERSENNE_PRIME - 1) + 1;
                let b = rng.next() % MERSENNE_PRIME;
                (a, b)
            })
            .collect();
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[(u64, u64)] {
        &self.coefficients
    }

    /// Compute the signature of a shingle set.
    ///
    /// An empty set yields [`EMPTY_SLOT`] in every position.
    pub fn sketch(&self, shingles: &ShingleSet) -> Signature {
        let mut sig = vec![EMPTY_SLOT; self.coefficients.len()];
        let reduced: Vec<u64> = shingles.iter().map(|x| x % MERSENNE_PRIME).collect();

        for (slot, &(a, b)) in sig.iter_mut().zip(self.coefficients.iter()) {
            for &x in &reduced {
                let h = universal_hash(a, b, x);
                if h < *slot {
                    *slot = h;
                }
            }
        }

        Signature(sig)
    }
}

fn universal_hash(a: u64, b: u64, x: u64) -> u64 {
    ((a as u128 * x as u128 + b as u128) % MERSENNE_PRIME as u128) as u64
}

/// LCG with an output mix so that high and low bits are both usable.
struct CoefficientRng {
    state: u64,
}

impl CoefficientRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next(&mut self) -> u64 {
        // LCG constants from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}
