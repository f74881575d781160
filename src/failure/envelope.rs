//! Normalised view of a failed exchange.
//!
//! A failure is either an HTTP response that came back with an error status,
//! or a transport failure where no response exists at all. The two are
//! mutually exclusive by construction.

use reqwest::header::HeaderMap;
use std::fmt;

use crate::failure::problem::ProblemBody;
use crate::http::{TRACE_ID, X_TRACE_ID};

/// A failed exchange together with the path that was requested.
#[derive(Debug, Clone)]
pub struct FailureEnvelope {
    /// Target path of the failed request (as given by the caller).
    pub path: String,
    pub cause: FailureCause,
}

#[derive(Debug, Clone)]
pub enum FailureCause {
    /// The server answered with a status the caller does not accept.
    Http(HttpFailure),
    /// No response was received.
    Transport(TransportFailure),
}

#[derive(Debug, Clone)]
pub struct HttpFailure {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<ProblemBody>,
}

#[derive(Debug, Clone, Default)]
pub struct TransportFailure {
    pub code: Option<TransportCode>,
    pub message: Option<String>,
}

/// Transport-level failure codes that matter for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCode {
    /// The request was aborted because the transport timeout elapsed.
    Timeout,
    /// Generic network-level error (DNS, reset, TLS, ...).
    Network,
    ConnectionRefused,
    Other(String),
}

impl fmt::Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCode::Timeout => write!(f, "ECONNABORTED"),
            TransportCode::Network => write!(f, "ERR_NETWORK"),
            TransportCode::ConnectionRefused => write!(f, "ERR_CONNECTION_REFUSED"),
            TransportCode::Other(code) => write!(f, "{}", code),
        }
    }
}

impl FailureEnvelope {
    pub fn http(path: impl Into<String>, failure: HttpFailure) -> Self {
        Self {
            path: path.into(),
            cause: FailureCause::Http(failure),
        }
    }

    pub fn transport(path: impl Into<String>, failure: TransportFailure) -> Self {
        Self {
            path: path.into(),
            cause: FailureCause::Transport(failure),
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match &self.cause {
            FailureCause::Http(http) => Some(http.status),
            FailureCause::Transport(_) => None,
        }
    }

    /// Structured body, if a response was received and it parsed.
    pub fn body(&self) -> Option<&ProblemBody> {
        match &self.cause {
            FailureCause::Http(http) => http.body.as_ref(),
            FailureCause::Transport(_) => None,
        }
    }

    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        match &self.cause {
            FailureCause::Transport(t) => Some(t),
            FailureCause::Http(_) => None,
        }
    }

    /// Trace id reported by the server in the response headers.
    ///
    /// Header lookup is case-insensitive, so `x-trace-id` also covers
    /// `X-Trace-Id`, and `trace-id` covers `Trace-Id`.
    pub fn response_trace_id(&self) -> Option<&str> {
        let FailureCause::Http(http) = &self.cause else {
            return None;
        };
        [X_TRACE_ID, TRACE_ID]
            .iter()
            .filter_map(|name| http.headers.get(*name))
            .filter_map(|value| value.to_str().ok())
            .find(|value| !value.is_empty())
    }
}
