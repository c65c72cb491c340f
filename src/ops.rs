//! Shared operation wrappers for the CLI and embedding callers.
//!
//! Each `op_*` function takes the JSON request shape a client sends
//! (`{documents: [{name, content}], options: {...}}`), runs one pipeline and
//! returns the report as `serde_json::Value`. Cleaning, when requested, is
//! applied here before documents are admitted to the run.

use serde::Deserialize;
use serde_json::Value;

use crate::algo::normalize;
use crate::document::Document;
use crate::engine::{CancelToken, Pipeline};
use crate::error::{Error, Result};
use crate::options::Options;

#[derive(Debug, Clone, Deserialize)]
pub struct RequestDocument {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "cleanedText")]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cleaning {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestOptions {
    #[serde(flatten)]
    pub options: Options,
    #[serde(default)]
    pub cleaning: Option<Cleaning>,
}

impl RequestOptions {
    pub fn clean_enabled(&self) -> bool {
        self.cleaning.as_ref().is_some_and(|c| c.enabled)
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub documents: Vec<RequestDocument>,
    pub options: RequestOptions,
}

#[derive(Deserialize)]
struct RawRequest {
    documents: Vec<RequestDocument>,
    #[serde(default)]
    options: Value,
}

impl Request {
    /// Parse a request. A malformed envelope is `InvalidRequest`; a malformed
    /// `options` object (negative sizes, unknown shingle type) is
    /// `InvalidOptions`.
    pub fn parse(value: &Value) -> Result<Self> {
        let raw =
            RawRequest::deserialize(value).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let options = if raw.options.is_null() {
            RequestOptions::default()
        } else {
            RequestOptions::deserialize(&raw.options)
                .map_err(|e| Error::InvalidOptions(e.to_string()))?
        };
        Ok(Self {
            documents: raw.documents,
            options,
        })
    }

    /// Admit the request's documents, cleaning them first when asked to.
    pub fn into_documents(self) -> (Options, Vec<Document>) {
        let clean = self.options.clean_enabled();
        let docs = Document::admit(self.documents.into_iter().map(|d| {
            let text = if clean {
                normalize::clean_text(&d.content)
            } else {
                d.content
            };
            (d.name, text)
        }));
        (self.options.options, docs)
    }
}

/// Compare exactly two documents.
pub fn op_check(request: &Value, cancel: &CancelToken) -> Result<Value> {
    let req = Request::parse(request)?;
    req.options.options.validate()?;
    match req.documents.len() {
        2 => {}
        n if n < 2 => return Err(Error::EmptyCollection { found: n }),
        n => {
            return Err(Error::InvalidRequest(format!(
                "exactly two documents must be provided, got {n}"
            )))
        }
    }

    let (options, docs) = req.into_documents();
    let mut docs = docs.into_iter();
    let (Some(a), Some(b)) = (docs.next(), docs.next()) else {
        return Err(Error::EmptyCollection { found: 0 });
    };

    let mut pipeline = Pipeline::new(options).with_cancel(cancel.clone());
    let report = pipeline.compare(a, b)?;
    Ok(serde_json::to_value(report)?)
}

/// Compare every LSH candidate pair in a collection.
///
/// `min_similarity` drops pair reports below that percentage.
pub fn op_analyze(
    request: &Value,
    min_similarity: Option<f64>,
    cancel: &CancelToken,
) -> Result<Value> {
    let req = Request::parse(request)?;
    let (options, docs) = req.into_documents();

    let mut pipeline = Pipeline::new(options).with_cancel(cancel.clone());
    let mut report = pipeline.analyze(docs)?;
    if let Some(min) = min_similarity {
        report.retain_at_least(min);
    }
    Ok(serde_json::to_value(report)?)
}
