//! Metrics collection.
//!
//! # Metrics
//! - `admin_request_requests_total` (counter): requests by method, outcome
//! - `admin_request_failures_total` (counter): classified failures by category
//! - `admin_request_navigations_total` (counter): navigation side effects by kind
//! - `admin_request_redirects_coalesced_total` (counter): pending login
//!   redirects replaced by a newer one
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; the host installs an exporter if it
//!   wants one, otherwise updates are no-ops

use metrics::counter;

use crate::failure::ErrorCategory;

/// Outcome of a facade call, for the request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
    /// The request never left: token supplier failed or request was invalid.
    SetupFailure,
}

impl RequestOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Failure => "failure",
            RequestOutcome::SetupFailure => "setup_failure",
        }
    }
}

/// Kind of navigation side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    ErrorPage,
    Unauthorized,
    LoginRedirect,
    Teardown,
}

impl NavigationKind {
    fn as_str(&self) -> &'static str {
        match self {
            NavigationKind::ErrorPage => "error_page",
            NavigationKind::Unauthorized => "unauthorized",
            NavigationKind::LoginRedirect => "login_redirect",
            NavigationKind::Teardown => "teardown",
        }
    }
}

pub fn record_request(method: &str, outcome: RequestOutcome) {
    counter!(
        "admin_request_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_failure(category: ErrorCategory) {
    counter!("admin_request_failures_total", "category" => category.as_str()).increment(1);
}

pub fn record_navigation(kind: NavigationKind) {
    counter!("admin_request_navigations_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_redirect_coalesced() {
    counter!("admin_request_redirects_coalesced_total").increment(1);
}
