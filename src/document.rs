use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a document when it is admitted to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(pub usize);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cleaned document owned by a single run.
///
/// Text is taken as-is; any normalisation happened upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocId,
    name: String,
    text: String,
}

impl Document {
    pub fn new(id: DocId, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
        }
    }

    /// Admit `(name, text)` pairs in order, numbering them from zero.
    pub fn admit<I, N, T>(items: I) -> Vec<Document>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (name, text))| Document::new(DocId(i), name, text))
            .collect()
    }

    pub fn id(&self) -> DocId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
