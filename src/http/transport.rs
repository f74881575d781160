//! Transport seam between the facade and the network.
//!
//! `Transport::send` resolves to the raw response for *any* status; deciding
//! what counts as a failure is the facade's job. It errors only when no
//! response was received.

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::error::Error as StdError;
use thiserror::Error;
use url::Url;

use crate::config::TransportConfig;
use crate::failure::{TransportCode, TransportFailure};
use crate::http::request::OutboundRequest;

/// A response as received, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Sends decorated requests.
pub trait Transport: Send + Sync {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<RawResponse, TransportFailure>>;
}

/// Errors building the production transport.
#[derive(Debug, Error)]
pub enum TransportSetupError {
    #[error("Invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid content type '{0}'")]
    ContentType(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// `reqwest`-backed transport with a base URL and a fixed timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportSetupError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| TransportSetupError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        let content_type = HeaderValue::from_str(&config.content_type)
            .map_err(|_| TransportSetupError::ContentType(config.content_type.clone()))?;
        headers.insert(CONTENT_TYPE, content_type);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL.
    ///
    /// Paths are appended to the base path (`http://h/api/` + `/users` is
    /// `http://h/api/users`); absolute URLs are used as given.
    pub fn resolve_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, url::ParseError> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)?
        } else if path.is_empty() {
            self.base_url.clone()
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?
        };
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportFailure> {
        let url = self
            .resolve_url(&request.path, &request.query)
            .map_err(|e| TransportFailure {
                code: Some(TransportCode::Other("ERR_INVALID_URL".to_string())),
                message: Some(format!("Invalid URL '{}': {}", request.path, e)),
            })?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| failure_from_reqwest(&e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| failure_from_reqwest(&e))?
            .to_vec();

        Ok(RawResponse { status, headers, body })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<RawResponse, TransportFailure>> {
        Box::pin(self.execute(request))
    }
}

/// Map a `reqwest` error onto the transport failure codes.
pub fn failure_from_reqwest(error: &reqwest::Error) -> TransportFailure {
    let code = if error.is_timeout() {
        Some(TransportCode::Timeout)
    } else if error.is_connect() {
        if is_connection_refused(error) {
            Some(TransportCode::ConnectionRefused)
        } else {
            Some(TransportCode::Network)
        }
    } else if error.is_request() || error.is_body() {
        Some(TransportCode::Network)
    } else if error.is_builder() {
        Some(TransportCode::Other("ERR_BAD_OPTION".to_string()))
    } else {
        None
    };

    TransportFailure {
        code,
        message: Some(error.to_string()),
    }
}

fn is_connection_refused(error: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = err.source();
    }
    false
}
