//! Response interpretation.
//!
//! # Responsibilities
//! - Split a raw response into accepted payload or failure envelope
//! - Decode accepted 2xx bodies into the caller's type
//! - Log correlation headers of successful responses at debug level
//!
//! # Design Decisions
//! - Acceptance is a per-call predicate, 2xx by default
//! - An empty success body decodes as JSON `null`
//! - Failure bodies are parsed leniently; anything that is not a JSON object
//!   is treated as absent

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::failure::{FailureEnvelope, HttpFailure, ProblemBody, RequestError};
use crate::http::request::{X_REQUEST_ID, X_TRACE_ID};
use crate::http::transport::RawResponse;

/// Default acceptance rule.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// What a response turned out to be for the caller.
#[derive(Debug)]
pub enum Interpreted {
    /// Accepted with a 2xx status.
    Success(RawResponse),
    /// Accepted by the caller's predicate, but not a 2xx status.
    AcceptedNonSuccess(RawResponse),
    /// Not accepted: goes through classification.
    Failed(FailureEnvelope),
}

pub fn interpret(path: &str, response: RawResponse, accept: fn(u16) -> bool) -> Interpreted {
    if accept(response.status) {
        if is_success(response.status) {
            Interpreted::Success(response)
        } else {
            Interpreted::AcceptedNonSuccess(response)
        }
    } else {
        Interpreted::Failed(failure_envelope(path, response))
    }
}

pub fn failure_envelope(path: &str, response: RawResponse) -> FailureEnvelope {
    let body = ProblemBody::from_slice(&response.body);
    FailureEnvelope::http(
        path,
        HttpFailure {
            status: response.status,
            headers: response.headers,
            body,
        },
    )
}

/// Decode an accepted body into the caller's type.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Message for an accepted non-2xx response: the body's `message`, else the
/// configured fallback.
pub fn unexpected_status(response: &RawResponse, fallback: &str) -> RequestError {
    let message = ProblemBody::from_slice(&response.body)
        .and_then(|body| body.message().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string());
    RequestError::UnexpectedStatus {
        status: response.status,
        message,
    }
}

pub fn log_success(method: &str, path: &str, response: &RawResponse) {
    let request_id = header(&response.headers, X_REQUEST_ID);
    let trace_id = header(&response.headers, X_TRACE_ID);
    tracing::debug!(
        method,
        path,
        status = response.status,
        request_id = ?request_id,
        trace_id = ?trace_id,
        "Request succeeded"
    );
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn test_default_acceptance() {
        assert!(matches!(interpret("/a", raw(200, "{}"), is_success), Interpreted::Success(_)));
        assert!(matches!(interpret("/a", raw(204, ""), is_success), Interpreted::Success(_)));
        assert!(matches!(interpret("/a", raw(302, ""), is_success), Interpreted::Failed(_)));
        assert!(matches!(interpret("/a", raw(404, ""), is_success), Interpreted::Failed(_)));
    }

    #[test]
    fn test_custom_acceptance() {
        let accept: fn(u16) -> bool = |status| status < 500;
        assert!(matches!(
            interpret("/a", raw(404, ""), accept),
            Interpreted::AcceptedNonSuccess(_)
        ));
        assert!(matches!(interpret("/a", raw(503, ""), accept), Interpreted::Failed(_)));
    }

    #[test]
    fn test_failure_envelope_parses_problem_body() {
        let envelope = failure_envelope("/sys/dict", raw(409, r#"{"detail": "exists", "code": 40904}"#));
        assert_eq!(envelope.status(), Some(409));
        assert_eq!(envelope.body().and_then(|b| b.detail()), Some("exists"));

        let envelope = failure_envelope("/sys/dict", raw(502, "<html>Bad Gateway</html>"));
        assert!(envelope.body().is_none());
    }

    #[test]
    fn test_decode() {
        let user: User = decode(br#"{"id": 7, "name": "ada"}"#).unwrap();
        assert_eq!(user, User { id: 7, name: "ada".into() });

        let nothing: Option<User> = decode(b"").unwrap();
        assert!(nothing.is_none());
        decode::<()>(b"  ").unwrap();

        assert!(matches!(decode::<User>(b"[1,2]"), Err(RequestError::Decode(_))));
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = unexpected_status(&raw(404, r#"{"message": "no such user"}"#), "Request failed");
        assert!(matches!(
            err,
            RequestError::UnexpectedStatus { status: 404, ref message } if message == "no such user"
        ));

        let err = unexpected_status(&raw(404, ""), "Request failed");
        assert_eq!(err.to_string(), "Request failed (status 404)");
    }
}
