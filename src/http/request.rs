//! Outbound requests and the middleware that dresses them.
//!
//! # Responsibilities
//! - Carry method, path, query, body and headers of one call
//! - Stamp the session trace id and a fresh request id on every request
//! - Add `Authorization: Bearer <token>` when the token supplier has one
//!
//! # Design Decisions
//! - Headers are inserted, never appended, so each appears exactly once
//! - The token lookup is awaited before dispatch; a supplier failure is a
//!   setup failure, distinct from any HTTP failure
//! - Caller-supplied headers can never smuggle in an authorization header

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;

use crate::failure::RequestError;
use crate::session::{TokenSupplier, TraceCorrelator};

/// Trace id header (primary name).
pub const X_TRACE_ID: &str = "x-trace-id";
/// Alternate trace id header some backends answer with.
pub const TRACE_ID: &str = "trace-id";
pub const X_REQUEST_ID: &str = "x-request-id";

/// One outbound call. Created per call, decorated once, consumed by dispatch.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Target path relative to the base URL (or an absolute URL).
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<Vec<u8>>,
    pub headers: HeaderMap,
    /// Overrides the transport timeout for this call.
    pub timeout: Option<Duration>,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header_str(X_REQUEST_ID)
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.header_str(X_TRACE_ID)
    }
}

/// Decorates outbound requests with trace and authorization headers.
#[derive(Clone)]
pub struct OutboundMiddleware {
    correlator: Arc<dyn TraceCorrelator>,
    tokens: Arc<dyn TokenSupplier>,
}

impl OutboundMiddleware {
    pub fn new(correlator: Arc<dyn TraceCorrelator>, tokens: Arc<dyn TokenSupplier>) -> Self {
        Self { correlator, tokens }
    }

    pub fn correlator(&self) -> &Arc<dyn TraceCorrelator> {
        &self.correlator
    }

    pub async fn decorate(&self, mut request: OutboundRequest) -> Result<OutboundRequest, RequestError> {
        let trace_id = self.correlator.get_or_create_trace_id();
        let request_id = self.correlator.generate_request_id();
        request
            .headers
            .insert(HeaderName::from_static(X_TRACE_ID), header_value(&trace_id)?);
        request
            .headers
            .insert(HeaderName::from_static(X_REQUEST_ID), header_value(&request_id)?);

        match self.tokens.access_token().await? {
            Some(token) if !token.is_empty() => {
                let value = header_value(&format!("Bearer {}", token))?;
                request.headers.insert(AUTHORIZATION, value);
            }
            _ => {
                request.headers.remove(AUTHORIZATION);
            }
        }

        Ok(request)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RequestError> {
    HeaderValue::from_str(value)
        .map_err(|e| RequestError::InvalidRequest(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CredentialError, SessionTraceCorrelator, SharedToken};
    use futures_util::future::BoxFuture;

    struct FailingTokens;

    impl TokenSupplier for FailingTokens {
        fn access_token(&self) -> BoxFuture<'_, Result<Option<String>, CredentialError>> {
            Box::pin(async { Err(CredentialError::Token("refresh failed".into())) })
        }
    }

    fn middleware(tokens: Arc<dyn TokenSupplier>) -> OutboundMiddleware {
        OutboundMiddleware::new(Arc::new(SessionTraceCorrelator::with_trace_id("trace-1")), tokens)
    }

    #[tokio::test]
    async fn test_headers_with_token() {
        let mw = middleware(Arc::new(SharedToken::new(Some("abc".into()))));
        let request = mw
            .decorate(OutboundRequest::new(Method::GET, "/sys/users"))
            .await
            .unwrap();

        assert_eq!(request.trace_id(), Some("trace-1"));
        assert!(request.request_id().is_some());
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(request.headers.get_all(X_TRACE_ID).iter().count(), 1);
        assert_eq!(request.headers.get_all(X_REQUEST_ID).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        for token in [None, Some(String::new())] {
            let mw = middleware(Arc::new(SharedToken::new(token)));
            let mut request = OutboundRequest::new(Method::GET, "/sys/users");
            request
                .headers
                .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

            let request = mw.decorate(request).await.unwrap();
            assert!(request.headers.get(AUTHORIZATION).is_none());
        }
    }

    #[tokio::test]
    async fn test_caller_trace_headers_are_replaced() {
        let mw = middleware(Arc::new(SharedToken::default()));
        let mut request = OutboundRequest::new(Method::POST, "/sys/users");
        request
            .headers
            .insert(X_TRACE_ID, HeaderValue::from_static("spoofed"));
        request
            .headers
            .append(X_TRACE_ID, HeaderValue::from_static("spoofed-2"));

        let request = mw.decorate(request).await.unwrap();
        assert_eq!(request.headers.get_all(X_TRACE_ID).iter().count(), 1);
        assert_eq!(request.trace_id(), Some("trace-1"));
    }

    #[tokio::test]
    async fn test_request_ids_differ_per_call() {
        let mw = middleware(Arc::new(SharedToken::default()));
        let a = mw.decorate(OutboundRequest::new(Method::GET, "/a")).await.unwrap();
        let b = mw.decorate(OutboundRequest::new(Method::GET, "/b")).await.unwrap();
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.trace_id(), b.trace_id());
    }

    #[tokio::test]
    async fn test_token_failure_is_setup_error() {
        let mw = middleware(Arc::new(FailingTokens));
        let err = mw
            .decorate(OutboundRequest::new(Method::GET, "/sys/users"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Setup(CredentialError::Token(_))));
    }
}
