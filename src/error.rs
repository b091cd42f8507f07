// src/error.rs

//! Unified error handling for the catalog retrieval layer.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// A bounded call did not finish in time
    #[error("Timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Envelope reported failure or did not match the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Valid response, but no record with this id
    #[error("Record not found: {id}")]
    NotFound { id: String },

    /// Primary and secondary both failed for the same call
    #[error("Both sources failed (primary: {primary}; secondary: {secondary})")]
    BothSourcesFailed {
        primary: Box<AppError>,
        secondary: Box<AppError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a not-found error for the given record id.
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Combine the two causes of a failed fallback.
    pub fn both_failed(primary: AppError, secondary: AppError) -> Self {
        Self::BothSourcesFailed {
            primary: Box::new(primary),
            secondary: Box::new(secondary),
        }
    }

    /// Whether the error may be recovered by asking the other source.
    ///
    /// Network failures, bad statuses and malformed envelopes qualify;
    /// a missing record does not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Status { .. }
                | Self::Timeout { .. }
                | Self::Malformed(_)
                | Self::Json(_)
                | Self::Io(_)
        )
    }

    /// Whether the error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(AppError::malformed("success=false").is_transient());
        assert!(AppError::Timeout { after_ms: 3000 }.is_transient());
        assert!(!AppError::not_found(7).is_transient());
        assert!(AppError::not_found(7).is_not_found());
        assert!(!AppError::config("x").is_transient());
    }

    #[test]
    fn test_both_failed_keeps_causes() {
        let err = AppError::both_failed(
            AppError::Status {
                status: 503,
                url: "http://primary/api".into(),
            },
            AppError::malformed("fixture missing"),
        );
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("fixture missing"));

        match err {
            AppError::BothSourcesFailed { primary, secondary } => {
                assert!(matches!(*primary, AppError::Status { status: 503, .. }));
                assert!(matches!(*secondary, AppError::Malformed(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
