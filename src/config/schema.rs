//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::failure::ErrorCategory;

/// Root configuration for the request pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Transport settings (base URL, timeout).
    pub transport: TransportConfig,

    /// Routes used by the navigation coordinator.
    pub navigation: NavigationConfig,

    /// Fallback messages shown when a failure carries no usable text.
    pub messages: MessageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL every request path is resolved against.
    pub base_url: String,

    /// Total request timeout in milliseconds. Kept short so an unreachable
    /// backend is detected quickly.
    pub timeout_ms: u64,

    /// Default `Content-Type` for every request.
    pub content_type: String,
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000/".to_string(),
            timeout_ms: 5000,
            content_type: "application/json".to_string(),
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub login_route: String,

    /// Route the identity provider redirects back to.
    pub callback_route: String,

    /// Error pages live at `{error_route_prefix}/{status}`.
    pub error_route_prefix: String,

    /// Debounce window for the login redirect in milliseconds.
    pub redirect_delay_ms: u64,

    /// Pause before the 401 hard navigation in milliseconds (0 = none).
    pub unauthorized_delay_ms: u64,
}

impl NavigationConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn unauthorized_delay(&self) -> Duration {
        Duration::from_millis(self.unauthorized_delay_ms)
    }

    /// Dedicated error page for a status, e.g. `/exception/403`.
    pub fn error_route(&self, status: u16) -> String {
        format!("{}/{}", self.error_route_prefix.trim_end_matches('/'), status)
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        path == self.login_route || path == self.callback_route
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_route: "/login".to_string(),
            callback_route: "/callback".to_string(),
            error_route_prefix: "/exception".to_string(),
            redirect_delay_ms: 200,
            unauthorized_delay_ms: 0,
        }
    }
}

/// Fallback messages per outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageConfig {
    pub unauthorized: String,
    pub bad_request: String,
    pub forbidden: String,
    pub not_found: String,
    pub server_error: String,
    pub conflict: String,
    pub network: String,
    /// Used for a non-2xx response that was not treated as an HTTP failure.
    pub request_failed: String,
}

impl MessageConfig {
    pub fn for_category(&self, category: ErrorCategory) -> &str {
        match category {
            ErrorCategory::Unauthorized => &self.unauthorized,
            ErrorCategory::BadRequest => &self.bad_request,
            ErrorCategory::Forbidden => &self.forbidden,
            ErrorCategory::NotFound => &self.not_found,
            ErrorCategory::ServerError => &self.server_error,
            ErrorCategory::Conflict => &self.conflict,
            ErrorCategory::NetworkUnavailable | ErrorCategory::Other => &self.network,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("unauthorized", &self.unauthorized),
            ("bad_request", &self.bad_request),
            ("forbidden", &self.forbidden),
            ("not_found", &self.not_found),
            ("server_error", &self.server_error),
            ("conflict", &self.conflict),
            ("network", &self.network),
            ("request_failed", &self.request_failed),
        ]
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            unauthorized: "Unauthorized access".to_string(),
            bad_request: "Invalid request parameters or format".to_string(),
            forbidden: "You do not have permission to access this resource".to_string(),
            not_found: "The requested resource does not exist".to_string(),
            server_error: "Internal server error".to_string(),
            conflict: "Operation failed".to_string(),
            network: "Network error".to_string(),
            request_failed: "Request failed".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
