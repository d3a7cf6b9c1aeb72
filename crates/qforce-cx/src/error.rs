//! Error type for reading CX networks.

use thiserror::Error;

/// Errors raised while reading a CX document.
#[derive(Debug, Error)]
pub enum CxError {
    #[error("invalid CX document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed `{aspect}` aspect: {source}")]
    Aspect {
        aspect: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CxError {
    /// Create a new `Aspect` error for the named aspect.
    pub(crate) fn aspect(aspect: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Aspect {
            aspect: aspect.into(),
            source,
        }
    }
}
