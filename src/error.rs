//! Error type shared by the I/O adapters around the analysis core.
//!
//! Classification, context extraction and record assembly never fail; these
//! variants belong to fetching, description generation, configuration and
//! report persistence.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AltTextError>;

#[derive(Debug, Error)]
pub enum AltTextError {
    /// Page could not be retrieved. Passed through to the caller untouched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The description service returned an error or an unusable response.
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("missing env variable: {key}")]
    MissingApiKey { key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
