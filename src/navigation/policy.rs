//! Per-category failure policy.
//!
//! | Category | Effect | Rejection |
//! |---|---|---|
//! | Unauthorized | full load of the 401 page, or teardown when already terminal | resolved message |
//! | BadRequest / Forbidden / NotFound / ServerError | in-app navigation to the status page (loop guarded) | resolved message |
//! | Conflict | none | message + structured fields |
//! | NetworkUnavailable | debounced login redirect | message + structured fields |
//! | Other | none | message + structured fields |

use std::sync::Arc;

use crate::config::MessageConfig;
use crate::failure::{
    classify, resolve, resolve_from_failure, resolve_from_transport_failure, ErrorCategory,
    FailureEnvelope, Rejection,
};
use crate::navigation::coordinator::NavigationCoordinator;
use crate::navigation::query::ErrorQuery;
use crate::observability::metrics;
use crate::session::TraceCorrelator;

/// `path` reported to the 401 page when the failed request has none.
const UNKNOWN_PATH: &str = "unknown";

/// Classifies failures and executes the policy of their category.
pub struct FailurePolicy {
    coordinator: Arc<NavigationCoordinator>,
    correlator: Arc<dyn TraceCorrelator>,
    messages: MessageConfig,
}

impl FailurePolicy {
    pub fn new(
        coordinator: Arc<NavigationCoordinator>,
        correlator: Arc<dyn TraceCorrelator>,
        messages: MessageConfig,
    ) -> Self {
        Self {
            coordinator,
            correlator,
            messages,
        }
    }

    pub fn coordinator(&self) -> &Arc<NavigationCoordinator> {
        &self.coordinator
    }

    /// Trace id for a failure: the server's, else the session's.
    fn trace_id(&self, envelope: &FailureEnvelope) -> Option<String> {
        envelope
            .response_trace_id()
            .map(str::to_string)
            .or_else(|| self.correlator.current_trace_id())
    }

    /// Run the side effects for `envelope` and build the caller's rejection.
    pub async fn handle(&self, envelope: FailureEnvelope) -> Rejection {
        let category = classify(&envelope);
        let trace_id = self.trace_id(&envelope);
        let default_message = self.messages.for_category(category);
        metrics::record_failure(category);

        match category {
            ErrorCategory::Unauthorized => {
                let message = resolve(envelope.body(), default_message);
                tracing::warn!(
                    path = %envelope.path,
                    trace_id = ?trace_id,
                    "Unauthorized response"
                );
                let path = if envelope.path.is_empty() {
                    UNKNOWN_PATH.to_string()
                } else {
                    envelope.path.clone()
                };
                let query = ErrorQuery {
                    from: self.coordinator.referer(),
                    path: Some(path),
                    message: Some(message.clone()),
                    trace_id: trace_id.clone(),
                };
                self.coordinator.hard_navigate_with_session_clear(&query).await;
                Rejection::new(category, envelope, message, trace_id)
            }

            ErrorCategory::BadRequest
            | ErrorCategory::Forbidden
            | ErrorCategory::NotFound
            | ErrorCategory::ServerError => {
                let status = envelope.status().unwrap_or_default();
                let message = resolve(envelope.body(), default_message);
                if category == ErrorCategory::ServerError {
                    tracing::error!(status, path = %envelope.path, message = %message, trace_id = ?trace_id, "Server error");
                } else {
                    tracing::info!(status, path = %envelope.path, message = %message, trace_id = ?trace_id, "Request rejected");
                }

                let path = if envelope.path.is_empty() {
                    self.coordinator.current_path()
                } else {
                    envelope.path.clone()
                };
                let query = ErrorQuery {
                    from: self.coordinator.referer(),
                    path: Some(path),
                    message: Some(message.clone()),
                    trace_id: trace_id.clone(),
                };
                self.coordinator.navigate_to_error_page(status, &query);
                Rejection::new(category, envelope, message, trace_id)
            }

            ErrorCategory::Conflict => {
                let info = resolve_from_failure(&envelope, default_message);
                tracing::warn!(
                    code = ?info.code,
                    detail = ?info.detail,
                    trace_id = ?trace_id,
                    "Conflict response"
                );
                Rejection::new(category, envelope, info.message.clone(), trace_id).with_error_info(info)
            }

            ErrorCategory::NetworkUnavailable | ErrorCategory::Other => {
                if category == ErrorCategory::NetworkUnavailable {
                    tracing::error!(path = %envelope.path, "Backend unreachable, scheduling login redirect");
                    self.coordinator.schedule_login_redirect();
                }

                let mut info = resolve_from_failure(&envelope, default_message);
                info.message = resolve_from_transport_failure(&envelope, default_message);
                tracing::info!(
                    category = %category,
                    path = %envelope.path,
                    message = %info.message,
                    "Request failed"
                );
                Rejection::new(category, envelope, info.message.clone(), trace_id).with_error_info(info)
            }
        }
    }
}
