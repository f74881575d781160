//! Failure classification.
//!
//! # States
//! One [`ErrorCategory`] per failure. Classification is a pure function of
//! the [`FailureEnvelope`]; what each category *does* lives in
//! `navigation::policy`.
//!
//! # Order (first match wins)
//! ```text
//! status present        → 401/400/403/404/500/409 map 1:1, anything else Other
//! no status, transport  → timeout / network / refused code, or a message
//!                         containing "timeout", "Network Error",
//!                         "Failed to fetch"          → NetworkUnavailable
//! otherwise             → Other
//! ```

use std::fmt;

use crate::failure::envelope::{FailureCause, FailureEnvelope, TransportCode};

const NETWORK_MESSAGE_MARKERS: [&str; 3] = ["timeout", "Network Error", "Failed to fetch"];

/// Outcome category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Unauthorized,
    BadRequest,
    Forbidden,
    NotFound,
    ServerError,
    Conflict,
    /// No response was received because the backend is unreachable.
    NetworkUnavailable,
    Other,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCategory::Unauthorized,
            400 => ErrorCategory::BadRequest,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            500 => ErrorCategory::ServerError,
            409 => ErrorCategory::Conflict,
            _ => ErrorCategory::Other,
        }
    }

    /// The HTTP status this category stands for, if it has exactly one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorCategory::Unauthorized => Some(401),
            ErrorCategory::BadRequest => Some(400),
            ErrorCategory::Forbidden => Some(403),
            ErrorCategory::NotFound => Some(404),
            ErrorCategory::ServerError => Some(500),
            ErrorCategory::Conflict => Some(409),
            ErrorCategory::NetworkUnavailable | ErrorCategory::Other => None,
        }
    }

    /// Whether handling this category produces a navigation side effect.
    pub fn navigates(&self) -> bool {
        !matches!(self, ErrorCategory::Conflict | ErrorCategory::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::ServerError => "server_error",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::NetworkUnavailable => "network_unavailable",
            ErrorCategory::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a failure to exactly one category.
pub fn classify(envelope: &FailureEnvelope) -> ErrorCategory {
    match &envelope.cause {
        FailureCause::Http(http) => ErrorCategory::from_status(http.status),
        FailureCause::Transport(transport) => {
            let code_signals = matches!(
                transport.code,
                Some(TransportCode::Timeout | TransportCode::Network | TransportCode::ConnectionRefused)
            );
            let message_signals = transport
                .message
                .as_deref()
                .is_some_and(|m| NETWORK_MESSAGE_MARKERS.iter().any(|marker| m.contains(marker)));

            if code_signals || message_signals {
                ErrorCategory::NetworkUnavailable
            } else {
                ErrorCategory::Other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::envelope::{HttpFailure, TransportFailure};
    use reqwest::header::HeaderMap;

    fn http(status: u16) -> FailureEnvelope {
        FailureEnvelope::http(
            "/x",
            HttpFailure {
                status,
                headers: HeaderMap::new(),
                body: None,
            },
        )
    }

    fn transport(code: Option<TransportCode>, message: Option<&str>) -> FailureEnvelope {
        FailureEnvelope::transport(
            "/x",
            TransportFailure {
                code,
                message: message.map(str::to_string),
            },
        )
    }

    #[test]
    fn test_status_maps_one_to_one() {
        assert_eq!(classify(&http(401)), ErrorCategory::Unauthorized);
        assert_eq!(classify(&http(400)), ErrorCategory::BadRequest);
        assert_eq!(classify(&http(403)), ErrorCategory::Forbidden);
        assert_eq!(classify(&http(404)), ErrorCategory::NotFound);
        assert_eq!(classify(&http(500)), ErrorCategory::ServerError);
        assert_eq!(classify(&http(409)), ErrorCategory::Conflict);
    }

    #[test]
    fn test_unlisted_status_is_other() {
        for status in [302, 405, 422, 429, 502, 503, 504] {
            assert_eq!(classify(&http(status)), ErrorCategory::Other, "status {}", status);
        }
    }

    #[test]
    fn test_transport_codes_mean_network_unavailable() {
        for code in [TransportCode::Timeout, TransportCode::Network, TransportCode::ConnectionRefused] {
            assert_eq!(classify(&transport(Some(code), None)), ErrorCategory::NetworkUnavailable);
        }
    }

    #[test]
    fn test_transport_messages_mean_network_unavailable() {
        for message in ["timeout of 5000ms exceeded", "Network Error", "TypeError: Failed to fetch"] {
            assert_eq!(
                classify(&transport(None, Some(message))),
                ErrorCategory::NetworkUnavailable,
                "message {}",
                message
            );
        }
    }

    #[test]
    fn test_unknown_transport_failure_is_other() {
        assert_eq!(
            classify(&transport(Some(TransportCode::Other("ERR_BAD_OPTION".into())), Some("bad option"))),
            ErrorCategory::Other
        );
        assert_eq!(classify(&transport(None, None)), ErrorCategory::Other);
    }

    #[test]
    fn test_navigating_categories() {
        assert!(ErrorCategory::Unauthorized.navigates());
        assert!(ErrorCategory::NetworkUnavailable.navigates());
        assert!(!ErrorCategory::Conflict.navigates());
        assert!(!ErrorCategory::Other.navigates());
        assert_eq!(ErrorCategory::Forbidden.status(), Some(403));
        assert_eq!(ErrorCategory::Other.status(), None);
    }
}
