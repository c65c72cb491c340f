use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_SEED: u64 = 0x5EED_0F_5111_1A12;
const DEFAULT_EXACT_LIMIT: usize = 200;

/// How a document is cut into shingles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShingleType {
    /// Windows of `k` characters.
    #[default]
    Char,
    /// Windows of `k` whitespace-separated tokens.
    Word,
}

impl ShingleType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "char" | "chars" | "character" => Some(Self::Char),
            "word" | "words" | "token" => Some(Self::Word),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Word => "word",
        }
    }
}

/// Per-run configuration.
///
/// Field names on the wire match the client contract (`shingleType`,
/// `numHashes`, ...). `seed` fixes the MinHash coefficient family so two runs
/// with equal options produce bit-identical signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub shingle_type: ShingleType,
    pub shingle_size: usize,
    pub num_hashes: usize,
    pub num_bands: usize,
    pub num_rows: usize,
    pub seed: u64,
    /// Collections up to this size get exact Jaccard on every candidate pair.
    pub exact_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            shingle_type: ShingleType::Char,
            shingle_size: 5,
            num_hashes: 100,
            num_bands: 25,
            num_rows: 4,
            seed: DEFAULT_SEED,
            exact_limit: DEFAULT_EXACT_LIMIT,
        }
    }
}

impl Options {
    /// Check sizes and the `num_bands * num_rows == num_hashes` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.shingle_size == 0 {
            return Err(Error::InvalidOptions("shingleSize must be >= 1".into()));
        }
        if self.num_hashes == 0 {
            return Err(Error::InvalidOptions("numHashes must be >= 1".into()));
        }
        if self.num_bands == 0 || self.num_rows == 0 {
            return Err(Error::InvalidOptions(
                "numBands and numRows must be >= 1".into(),
            ));
        }
        match self.num_bands.checked_mul(self.num_rows) {
            Some(product) if product == self.num_hashes => Ok(()),
            _ => Err(Error::InvalidOptions(format!(
                "numBands * numRows must equal numHashes ({} * {} != {})",
                self.num_bands, self.num_rows, self.num_hashes
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
