use siphasher::sip::SipHasher13;
use std::collections::HashSet;
use std::hash::Hasher;

use crate::error::{Error, Result};
use crate::options::ShingleType;

const SHINGLE_KEY0: u64 = 0x736E_6769_6C65_7331;
const SHINGLE_KEY1: u64 = 0x6E65_6172_7369_6D30;

/// Set of hashed k-grams drawn from one document.
///
/// Presence only: repeated shingles collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShingleSet {
    hashes: HashSet<u64>,
}

impl ShingleSet {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.hashes.contains(&hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.hashes.iter().copied()
    }

    /// `|A ∩ B|`, probing the larger set with the smaller.
    pub fn intersection_len(&self, other: &ShingleSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|h| large.contains(*h)).count()
    }

    /// `|A ∪ B|`.
    pub fn union_len(&self, other: &ShingleSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }
}

impl FromIterator<u64> for ShingleSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

/// Shingle `text` and hash every k-gram into a [`ShingleSet`].
pub fn shingle(text: &str, kind: ShingleType, k: usize) -> Result<ShingleSet> {
    if k == 0 {
        return Err(Error::InvalidOptions("shingleSize must be >= 1".into()));
    }
    let grams = match kind {
        ShingleType::Char => char_shingles(text, k),
        ShingleType::Word => {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            word_ngrams(&tokens, k)
        }
    };
    Ok(grams.iter().map(|g| hash_shingle(g)).collect())
}

/// Character k-grams. Text shorter than `k` is one shingle; empty text is none.
pub fn char_shingles(text: &str, k: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![];
    }
    if chars.len() < k {
        return vec![text.to_string()];
    }
    chars.windows(k).map(|w| w.iter().collect()).collect()
}

/// Word k-grams joined by a single space.
///
/// Fewer than `k` tokens yields one shingle holding every token, matching
/// the char-mode rule for short input.
pub fn word_ngrams(tokens: &[&str], k: usize) -> Vec<String> {
    if tokens.is_empty() {
        return vec![];
    }
    if tokens.len() < k {
        return vec![tokens.join(" ")];
    }
    tokens.windows(k).map(|w| w.join(" ")).collect()
}

/// Stable 64-bit hash of a shingle string.
pub fn hash_shingle(gram: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(SHINGLE_KEY0, SHINGLE_KEY1);
    hasher.write(gram.as_bytes());
    hasher.finish()
}
