//! Error types shared by the adapter, decomposition engine, chart plumbing
//! and service client.
//!
//! An absent rendering slot is not an error: renderers skip missing slots
//! and log at debug level.

/// Errors that terminate a render pass or a service call
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    /// A required field of the analysis response is absent or has the wrong shape
    #[error("Malformed analysis result at `{field}`: {reason}")]
    MalformedResult { field: String, reason: String },

    /// Decomposition or request preconditions were violated
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network failure, non-2xx response, or an error envelope from the service
    #[error("Request failed: {0}")]
    Transport(String),

    /// The charting capability rejected a create/destroy call
    #[error("Chart backend error: {0}")]
    Chart(String),
}

impl InsightError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        InsightError::MalformedResult {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
