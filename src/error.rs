//! Error taxonomy for the library
//!
//! Flattening never fails: shape mismatches are absorbed by policy.
//! Everything that can fail surfaces one of these values so callers can
//! abort the current item or run.

use thiserror::Error;

/// Failures of `reconcile`
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("cannot reconcile an empty record batch")]
    EmptyBatch,

    #[error("sort column '{column}' is absent from every record")]
    Schema { column: String },
}

/// Failures talking to a remote endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures pulling structured data out of a fetched payload
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("preloaded state not found")]
    StateNotFound,

    #[error("could not extract JSON data from the preloaded state script")]
    StateNotParsed,

    #[error("invalid JSON in preloaded state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing expected path '{0}'")]
    MissingPath(String),
}
