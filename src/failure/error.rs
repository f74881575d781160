//! The rejection returned to callers of the request facade.

use thiserror::Error;

use crate::failure::classify::ErrorCategory;
use crate::failure::envelope::FailureEnvelope;
use crate::failure::message::{ConflictKind, ErrorMessage};
use crate::session::credentials::CredentialError;

/// Errors returned by the request facade.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The exchange failed and was classified. Navigation side effects (if
    /// any) have already been triggered when the caller sees this.
    #[error("{0}")]
    Rejected(Rejection),

    /// The token supplier failed before anything was dispatched.
    #[error("Request setup failed: {0}")]
    Setup(#[from] CredentialError),

    /// A response was accepted by the per-call status check but is not a
    /// 2xx success.
    #[error("{message} (status {status})")]
    UnexpectedStatus { status: u16, message: String },

    /// Path or headers could not be encoded; nothing was dispatched.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A success body did not match the requested type.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for facade calls.
pub type RequestResult<T> = Result<T, RequestError>;

impl RequestError {
    /// The classified rejection, if this error is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RequestError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.rejection().map(Rejection::category)
    }
}

impl From<Rejection> for RequestError {
    fn from(rejection: Rejection) -> Self {
        RequestError::Rejected(rejection)
    }
}

/// A classified failure, enriched with the resolved message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Rejection {
    category: ErrorCategory,
    envelope: FailureEnvelope,
    message: String,
    error_info: Option<ErrorMessage>,
    trace_id: Option<String>,
}

impl Rejection {
    pub(crate) fn new(
        category: ErrorCategory,
        envelope: FailureEnvelope,
        message: String,
        trace_id: Option<String>,
    ) -> Self {
        Self {
            category,
            envelope,
            message,
            error_info: None,
            trace_id,
        }
    }

    /// Attach the structured error; its message becomes the rejection's.
    pub(crate) fn with_error_info(mut self, info: ErrorMessage) -> Self {
        self.message = info.message.clone();
        self.error_info = Some(info);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured error fields. Present for conflicts, unreachable backends
    /// and unclassified failures, where the caller decides what to show.
    pub fn error_info(&self) -> Option<&ErrorMessage> {
        self.error_info.as_ref()
    }

    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        match self.category {
            ErrorCategory::Conflict => self.error_info.as_ref().and_then(ErrorMessage::conflict_kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.envelope.status()
    }

    /// Trace id used to correlate this failure with server logs.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Path of the request that failed.
    pub fn path(&self) -> &str {
        &self.envelope.path
    }

    pub fn envelope(&self) -> &FailureEnvelope {
        &self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::envelope::HttpFailure;
    use reqwest::header::HeaderMap;

    fn conflict() -> Rejection {
        let envelope = FailureEnvelope::http(
            "/sys/dict/types",
            HttpFailure {
                status: 409,
                headers: HeaderMap::new(),
                body: None,
            },
        );
        Rejection::new(ErrorCategory::Conflict, envelope, "Request failed".into(), Some("t-1".into()))
    }

    #[test]
    fn test_error_info_replaces_message() {
        let rejection = conflict().with_error_info(ErrorMessage {
            message: "Type code already exists".into(),
            code: Some(40904),
            status: Some(409),
            ..Default::default()
        });

        assert_eq!(rejection.message(), "Type code already exists");
        assert_eq!(rejection.conflict_kind(), Some(ConflictKind::AlreadyExists));
        assert_eq!(rejection.status(), Some(409));
        assert_eq!(rejection.trace_id(), Some("t-1"));
        assert_eq!(rejection.path(), "/sys/dict/types");
    }

    #[test]
    fn test_error_display() {
        let err = RequestError::from(conflict());
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.category(), Some(ErrorCategory::Conflict));

        let err = RequestError::UnexpectedStatus {
            status: 304,
            message: "Request failed".into(),
        };
        assert_eq!(err.to_string(), "Request failed (status 304)");
        assert!(err.rejection().is_none());
    }
}
