//! Navigation coordinator.
//!
//! Owns the redirect state and performs every navigation the request
//! pipeline triggers.
//!
//! # Login redirect debounce
//! ```text
//! NetworkUnavailable ─┐
//! NetworkUnavailable ─┼─ each one cancels the pending timer and starts a new one
//! NetworkUnavailable ─┘
//!                      └── delay elapses → re-read current route → full load of login
//! ```
//! At most one timer is pending at any time. A burst of failures therefore
//! produces exactly one navigation, timed from the last failure.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::NavigationConfig;
use crate::navigation::query::ErrorQuery;
use crate::observability::metrics::{self, NavigationKind};
use crate::session::{NavigationMode, Navigator, SessionTeardown};

/// What happened when an unauthorized failure was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedOutcome {
    /// Full navigation to the 401 page; teardown is left to that page.
    Navigated,
    /// Already on a terminal page, so the session was torn down in place.
    TornDown,
}

#[derive(Debug, Default)]
struct RedirectState {
    /// Incremented on every schedule; a timer only acts if it still holds
    /// the latest generation.
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Executes navigation side effects with loop guards and debouncing.
pub struct NavigationCoordinator {
    navigator: Arc<dyn Navigator>,
    teardown: Arc<dyn SessionTeardown>,
    config: NavigationConfig,
    redirect: Arc<Mutex<RedirectState>>,
}

impl NavigationCoordinator {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        teardown: Arc<dyn SessionTeardown>,
        config: NavigationConfig,
    ) -> Self {
        Self {
            navigator,
            teardown,
            config,
            redirect: Arc::new(Mutex::new(RedirectState::default())),
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Referer for error pages: the host's referrer, else the current path
    /// unless that is the login or callback route.
    pub fn referer(&self) -> Option<String> {
        self.navigator.referrer().filter(|r| !r.is_empty()).or_else(|| {
            let current = self.navigator.current_path();
            (!self.config.is_auth_route(&current)).then_some(current)
        })
    }

    /// Schedule the debounced login redirect.
    ///
    /// Returns `false` when already on the login or callback route, in which
    /// case nothing is scheduled.
    pub fn schedule_login_redirect(&self) -> bool {
        if self.config.is_auth_route(&self.navigator.current_path()) {
            tracing::debug!("Already on an auth route, login redirect not scheduled");
            return false;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No async runtime, redirecting to login without debounce");
            self.redirect_to_login();
            return true;
        };

        let mut state = self.redirect.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.pending.take() {
            previous.abort();
            metrics::record_redirect_coalesced();
            tracing::debug!("Pending login redirect replaced");
        }
        state.generation += 1;
        let generation = state.generation;

        let slot = Arc::clone(&self.redirect);
        let navigator = Arc::clone(&self.navigator);
        let config = self.config.clone();
        let delay = self.config.redirect_delay();

        // The slot stays locked until the handle is stored, so the timer
        // cannot observe its own slot before it is filled.
        state.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut state = slot.lock().unwrap_or_else(PoisonError::into_inner);
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }

            // The user may have moved since the timer was scheduled.
            let current = navigator.current_path();
            if config.is_auth_route(&current) {
                tracing::debug!(path = %current, "Login redirect dropped, already on an auth route");
                return;
            }
            tracing::info!(from = %current, to = %config.login_route, "Redirecting to login");
            navigator.navigate(&config.login_route, NavigationMode::FullReload);
            metrics::record_navigation(NavigationKind::LoginRedirect);
        }));

        true
    }

    /// Whether a login redirect timer is pending.
    pub fn has_pending_redirect(&self) -> bool {
        self.redirect
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .is_some()
    }

    /// Cancel the pending login redirect, if any.
    pub fn cancel_pending_redirect(&self) -> bool {
        let mut state = self.redirect.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        match state.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn redirect_to_login(&self) {
        self.navigator
            .navigate(&self.config.login_route, NavigationMode::FullReload);
        metrics::record_navigation(NavigationKind::LoginRedirect);
    }

    /// In-app navigation to the dedicated error page for `status`.
    ///
    /// No-op (returns `false`) when already on that page.
    pub fn navigate_to_error_page(&self, status: u16, query: &ErrorQuery) -> bool {
        let route = self.config.error_route(status);
        if self.navigator.current_path() == route {
            tracing::debug!(route = %route, "Already on error page, skipping navigation");
            return false;
        }
        self.navigator.navigate(&query.href(&route), NavigationMode::InApp);
        metrics::record_navigation(NavigationKind::ErrorPage);
        true
    }

    /// Handle session loss.
    ///
    /// Off the terminal routes (login, callback, the 401 page) this is a full
    /// navigation to the 401 page and nothing else: teardown may itself
    /// navigate and would overwrite this one, so it is left to the 401 page.
    /// On a terminal route no navigation is needed and the session is torn
    /// down directly; a teardown failure is logged, never returned.
    pub async fn hard_navigate_with_session_clear(&self, query: &ErrorQuery) -> UnauthorizedOutcome {
        let route = self.config.error_route(401);
        let current = self.navigator.current_path();

        if !self.config.is_auth_route(&current) && current != route {
            let delay = self.config.unauthorized_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tracing::info!(from = %current, "Session lost, loading 401 page");
            self.navigator.navigate(&query.href(&route), NavigationMode::FullReload);
            metrics::record_navigation(NavigationKind::Unauthorized);
            return UnauthorizedOutcome::Navigated;
        }

        tracing::info!(path = %current, "Already on a terminal page, tearing down session");
        if let Err(e) = self.teardown.logout().await {
            tracing::error!(error = %e, "Logout failed");
        }
        metrics::record_navigation(NavigationKind::Teardown);
        UnauthorizedOutcome::TornDown
    }
}

impl Drop for NavigationCoordinator {
    fn drop(&mut self) {
        self.cancel_pending_redirect();
    }
}
