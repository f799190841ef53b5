//! Error types for the `RunPod` client.
//!
//! The taxonomy is closed and flat: every failure a caller can observe is one
//! variant of [`Error`], so handling code can match exhaustively instead of
//! string-matching messages. Classification helpers such as
//! [`Error::is_not_found`] are pure functions of the variant (plus the HTTP
//! status for API errors).

use std::time::Duration;

use thiserror::Error as ThisError;

use crate::types::{Job, PodStatus};

/// The error type for all `RunPod` client operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The API returned a non-success status with an error payload.
    #[error("RunPod API error {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message reported by the API.
        message: String,
        /// Additional detail text, when the API provides one.
        details: Option<String>,
        /// Machine-readable error code, when the API provides one.
        code: Option<String>,
    },

    /// A request field failed local validation before any network call.
    #[error("validation error for field '{field}': {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// Why the field was rejected.
        message: String,
        /// The offending value, where useful for diagnostics.
        value: Option<String>,
    },

    /// A transport-level failure (connection refused, DNS, broken body read).
    #[error("network error: {message}")]
    Network {
        /// Description of the failure.
        message: String,
        /// Underlying cause, when one is available.
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation exceeded its time budget.
    #[error("timeout: {operation} timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The budget that was exceeded.
        duration: Duration,
    },

    /// The API rejected the credentials or the key lacks permission.
    #[error("authentication error: {message}")]
    Auth {
        /// Description of the auth failure.
        message: String,
    },

    /// The API throttled the request.
    #[error("rate limit exceeded: {message} (retry after: {retry_after})")]
    RateLimit {
        /// Description of the throttling.
        message: String,
        /// Retry-After hint from the response, or "unknown".
        retry_after: String,
    },

    /// A successful response could not be decoded into the expected shape.
    ///
    /// This signals a local contract bug rather than a server fault and is
    /// never retried.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// The retry budget was spent without a usable response.
    #[error("request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total attempts made, including the first.
        attempts: u32,
        /// The last error observed before giving up.
        source: Box<Error>,
    },

    /// A job reached a terminal state other than `COMPLETED`.
    #[error("job {} ended as {}: {}", .job.id, .job.status, .job.error_text())]
    JobFailed {
        /// The final observed job, including its error text.
        job: Box<Job>,
    },

    /// A pod entered an unrecoverable state while being waited on.
    #[error("pod {pod_id} is in error state: {status}")]
    PodFailed {
        /// The pod being waited on.
        pod_id: String,
        /// The error state it reached.
        status: PodStatus,
    },

    /// The caller's cancellation signal fired.
    #[error("operation cancelled: {operation}")]
    Cancelled {
        /// The operation that was cancelled.
        operation: String,
    },
}

/// Result type alias for `RunPod` client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an API error without details or code.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: None,
            code: None,
        }
    }

    /// Creates a validation error for a field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Creates a validation error that records the offending value.
    #[must_use]
    pub fn validation_with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: Some(value.to_string()),
        }
    }

    /// Creates a network error without an underlying cause.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a network error wrapping its cause.
    #[must_use]
    pub fn network_caused(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a rate-limit error.
    #[must_use]
    pub fn rate_limit(message: impl Into<String>, retry_after: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after: retry_after.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Returns the HTTP status code for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a 404 API error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns true if this is a 400 API error.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Api { status: 400, .. })
    }

    /// Returns true for authentication failures (401 or the auth variant).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. } | Self::Auth { .. })
    }

    /// Returns true if this is a 403 API error.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::Api { status: 403, .. })
    }

    /// Returns true for throttling (429 or the rate-limit variant).
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. } | Self::RateLimit { .. })
    }

    /// Returns true for 5xx API errors.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500 && *status < 600)
    }

    /// Returns true for 4xx API errors.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Returns true if this is a local validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if retrying the request could succeed.
    ///
    /// Network and timeout errors are always retryable; API errors only when
    /// the server reported a 5xx status. Everything else is final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500 && *status < 600,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_predicates() {
        assert!(Error::api(404, "missing").is_not_found());
        assert!(Error::api(400, "bad").is_bad_request());
        assert!(Error::api(401, "no").is_unauthorized());
        assert!(Error::api(403, "no").is_forbidden());
        assert!(Error::api(429, "slow down").is_rate_limited());
        assert!(Error::api(503, "oops").is_server_error());
        assert!(Error::api(418, "teapot").is_client_error());
        assert!(!Error::api(200, "ok?").is_client_error());
    }

    #[test]
    fn test_retryability_classification() {
        assert!(Error::network("connection refused").is_retryable());
        assert!(Error::timeout("GET /pods", Duration::from_secs(30)).is_retryable());
        assert!(Error::api(500, "server error").is_retryable());
        assert!(Error::api(599, "server error").is_retryable());

        assert!(!Error::api(429, "rate limit").is_retryable());
        assert!(!Error::api(404, "missing").is_retryable());
        assert!(!Error::validation("name", "cannot be empty").is_retryable());
        assert!(!Error::auth("invalid key").is_retryable());
        assert!(!Error::decode("unexpected shape").is_retryable());
        assert!(!Error::cancelled("stream").is_retryable());
    }

    #[test]
    fn test_variant_helpers_and_display() {
        let err = Error::validation_with_value("gpuCount", "must be positive", 0);
        assert_eq!(
            err.to_string(),
            "validation error for field 'gpuCount': must be positive"
        );
        match err {
            Error::Validation { value, .. } => assert_eq!(value.as_deref(), Some("0")),
            other => panic!("unexpected variant: {other}"),
        }

        let err = Error::rate_limit("rate limit exceeded", "unknown");
        assert_eq!(
            err.to_string(),
            "rate limit exceeded: rate limit exceeded (retry after: unknown)"
        );
    }

    #[test]
    fn test_retries_exhausted_carries_last_error() {
        let err = Error::RetriesExhausted {
            attempts: 4,
            source: Box::new(Error::network("connection refused")),
        };
        assert!(err.to_string().contains("after 4 attempts"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_retryable());
    }
}
