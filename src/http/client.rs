//! Request facade.
//!
//! Typed verb calls for application code. Each call is decorated, sent, and
//! either unwrapped to its payload or rejected after the failure policy ran.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::failure::{FailureEnvelope, RequestError, RequestResult};
use crate::http::request::{OutboundMiddleware, OutboundRequest};
use crate::http::response::{self, Interpreted};
use crate::http::transport::{ReqwestTransport, Transport, TransportSetupError};
use crate::navigation::{FailurePolicy, NavigationCoordinator};
use crate::observability::metrics::{self, RequestOutcome};
use crate::session::{
    MemoryNavigator, Navigator, NoopTeardown, SessionTeardown, SessionTraceCorrelator,
    SharedToken, TokenSupplier, TraceCorrelator,
};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    /// Which statuses resolve the call. `None` means 2xx only.
    pub accept_status: Option<fn(u16) -> bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn accept_status(mut self, accept: fn(u16) -> bool) -> Self {
        self.accept_status = Some(accept);
        self
    }
}

/// HTTP client for the admin backend.
pub struct AdminClient {
    middleware: OutboundMiddleware,
    transport: Arc<dyn Transport>,
    policy: FailurePolicy,
    request_failed: String,
}

impl AdminClient {
    pub fn builder(config: ClientConfig) -> AdminClientBuilder {
        AdminClientBuilder::new(config)
    }

    pub fn coordinator(&self) -> &Arc<NavigationCoordinator> {
        self.policy.coordinator()
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        self.request::<T, ()>(Method::GET, path, None, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        self.request(Method::POST, path, body, options).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        self.request(Method::PUT, path, body, options).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        self.request(Method::PATCH, path, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        self.request::<T, ()>(Method::DELETE, path, None, options).await
    }

    /// Issue one call and unwrap its payload.
    ///
    /// On rejection every navigation side effect of the failure category has
    /// already been triggered (the debounced login redirect is scheduled, not
    /// yet performed).
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> RequestResult<T> {
        let options = options.unwrap_or_default();
        let method_name = method.as_str().to_string();

        let request = match self.prepare(method, path, body, &options).await {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(method = %method_name, path, error = %e, "Request not dispatched");
                metrics::record_request(&method_name, RequestOutcome::SetupFailure);
                return Err(e);
            }
        };

        tracing::debug!(
            method = %method_name,
            path,
            request_id = ?request.request_id(),
            trace_id = ?request.trace_id(),
            "Dispatching request"
        );

        let raw = match self.transport.send(request).await {
            Ok(raw) => raw,
            Err(failure) => {
                let envelope = FailureEnvelope::transport(path, failure);
                return Err(self.reject(&method_name, envelope).await);
            }
        };

        let accept = options.accept_status.unwrap_or(response::is_success);
        match response::interpret(path, raw, accept) {
            Interpreted::Success(raw) => {
                response::log_success(&method_name, path, &raw);
                metrics::record_request(&method_name, RequestOutcome::Success);
                response::decode(&raw.body)
            }
            Interpreted::AcceptedNonSuccess(raw) => {
                metrics::record_request(&method_name, RequestOutcome::Failure);
                let err = response::unexpected_status(&raw, &self.request_failed);
                tracing::info!(method = %method_name, path, error = %err, "Accepted non-success status");
                Err(err)
            }
            Interpreted::Failed(envelope) => Err(self.reject(&method_name, envelope).await),
        }
    }

    async fn prepare<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> RequestResult<OutboundRequest> {
        let mut request = OutboundRequest::new(method, path);
        request.headers = options.headers.clone();
        request.query = options.query.clone();
        request.timeout = options.timeout;
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| RequestError::InvalidRequest(format!("Body is not serializable: {}", e)))?;
            request.body = Some(bytes);
        }
        self.middleware.decorate(request).await
    }

    async fn reject(&self, method: &str, envelope: FailureEnvelope) -> RequestError {
        metrics::record_request(method, RequestOutcome::Failure);
        self.policy.handle(envelope).await.into()
    }
}

/// Wires an [`AdminClient`] from config and host collaborators.
///
/// Unset collaborators fall back to in-process defaults: a navigator parked
/// at `/`, no token, no teardown, a fresh session trace id and the
/// `reqwest` transport.
pub struct AdminClientBuilder {
    config: ClientConfig,
    navigator: Option<Arc<dyn Navigator>>,
    tokens: Option<Arc<dyn TokenSupplier>>,
    teardown: Option<Arc<dyn SessionTeardown>>,
    correlator: Option<Arc<dyn TraceCorrelator>>,
    transport: Option<Arc<dyn Transport>>,
}

impl AdminClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            navigator: None,
            tokens: None,
            teardown: None,
            correlator: None,
            transport: None,
        }
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn tokens(mut self, tokens: Arc<dyn TokenSupplier>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn teardown(mut self, teardown: Arc<dyn SessionTeardown>) -> Self {
        self.teardown = Some(teardown);
        self
    }

    pub fn correlator(mut self, correlator: Arc<dyn TraceCorrelator>) -> Self {
        self.correlator = Some(correlator);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<AdminClient, TransportSetupError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config.transport)?),
        };
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(MemoryNavigator::new("/")));
        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(SharedToken::default()));
        let teardown = self.teardown.unwrap_or_else(|| Arc::new(NoopTeardown));
        let correlator = self
            .correlator
            .unwrap_or_else(|| Arc::new(SessionTraceCorrelator::new()));

        let coordinator = Arc::new(NavigationCoordinator::new(
            navigator,
            teardown,
            self.config.navigation.clone(),
        ));
        let request_failed = self.config.messages.request_failed.clone();
        let policy = FailurePolicy::new(coordinator, Arc::clone(&correlator), self.config.messages);

        tracing::debug!(
            base_url = %self.config.transport.base_url,
            timeout_ms = self.config.transport.timeout_ms,
            "Admin client ready"
        );

        Ok(AdminClient {
            middleware: OutboundMiddleware::new(correlator, tokens),
            transport,
            policy,
            request_failed,
        })
    }
}
