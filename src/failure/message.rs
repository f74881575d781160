//! Error message resolution.
//!
//! Turns a failure payload into the text a user should see. Resolution is
//! pure and total: a caller-supplied default is returned when nothing better
//! is available.
//!
//! Field priority, first non-empty wins: `detail` → `message` → `title` →
//! default.

use serde::Serialize;

use crate::failure::envelope::{FailureCause, FailureEnvelope};
use crate::failure::problem::{non_empty, ProblemBody};

/// Generic phrase some transports use when a status check fails. It carries
/// no information beyond the status and must not replace a better message.
pub const GENERIC_STATUS_PHRASE: &str = "Request failed with status code";

/// Resolved message plus the structured fields of the failure body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    pub code: Option<i64>,
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ErrorMessage {
    /// Conflict sub-code carried by a 409 body, if any.
    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        self.code.map(ConflictKind::from_code)
    }
}

/// Business sub-codes used by the backend for HTTP 409.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// 40901: the same request was already submitted.
    IdempotentReplay,
    /// 40902
    BusinessRule,
    /// 40903: the resource has children, is referenced, or would form a cycle.
    HasDependents,
    /// 40904: a unique name/URL/URI is already taken.
    AlreadyExists,
    /// 40905: the resource's state does not allow the operation.
    StateInvalid,
    Unrecognized(i64),
}

impl ConflictKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            40901 => ConflictKind::IdempotentReplay,
            40902 => ConflictKind::BusinessRule,
            40903 => ConflictKind::HasDependents,
            40904 => ConflictKind::AlreadyExists,
            40905 => ConflictKind::StateInvalid,
            other => ConflictKind::Unrecognized(other),
        }
    }
}

/// Resolve a message from a failure body.
pub fn resolve(body: Option<&ProblemBody>, default_message: &str) -> String {
    body.and_then(|b| b.detail().or_else(|| b.message()).or_else(|| b.title()))
        .unwrap_or(default_message)
        .to_string()
}

/// Resolve the message and carry the structured fields through.
///
/// `status` prefers the body's own value over the response status.
pub fn resolve_from_failure(failure: &FailureEnvelope, default_message: &str) -> ErrorMessage {
    let body = failure.body();
    ErrorMessage {
        message: resolve(body, default_message),
        code: body.and_then(|b| b.code),
        status: body.and_then(|b| b.status).or(failure.status()),
        detail: body.and_then(|b| b.detail.clone()),
        title: body.and_then(|b| b.title.clone()),
        kind: body.and_then(|b| b.kind.clone()),
    }
}

/// Resolve a message for a failure that may not have a response at all.
///
/// With a response, this is [`resolve`] on its body. Without one, the
/// transport's own message is used unless it is the generic status phrase.
pub fn resolve_from_transport_failure(failure: &FailureEnvelope, default_message: &str) -> String {
    match &failure.cause {
        FailureCause::Http(http) => resolve(http.body.as_ref(), default_message),
        FailureCause::Transport(transport) => match non_empty(transport.message.as_deref()) {
            Some(message) if message.contains(GENERIC_STATUS_PHRASE) => default_message.to_string(),
            Some(message) => message.to_string(),
            None => default_message.to_string(),
        },
    }
}
