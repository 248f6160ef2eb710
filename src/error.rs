//! Document-level failure taxonomy for normalization.
//!
//! Operation- and schema-level failures never reach this type: they are
//! downgraded to warnings inside the extractors so one malformed fragment
//! degrades that fragment only, never the whole document.

use thiserror::Error;

/// A terminal failure of a single normalization call. No partial canonical
/// model is returned alongside any of these.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The document failed structural validation for a reason other than
    /// unresolved references.
    #[error("invalid specification: {message}")]
    InvalidSpec {
        message: String,
        details: Option<String>,
    },

    /// The document carries no recognizable dialect marker.
    #[error("unsupported specification version: {0}")]
    UnsupportedVersion(String),

    /// Extraction failed at the document level.
    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl NormalizeError {
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        NormalizeError::InvalidSpec {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_spec_with_details(
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        NormalizeError::InvalidSpec {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}
