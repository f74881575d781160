//! Route accessor: where the UI currently is and how to move it.

use arc_swap::{ArcSwap, ArcSwapOption};
use std::sync::{Arc, Mutex, PoisonError};

/// How a navigation is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// In-app route push; client state survives.
    InApp,
    /// Full page load; all client state is reset.
    FullReload,
}

/// Read access to the active route plus a navigation primitive.
pub trait Navigator: Send + Sync {
    /// Path of the active route, without query string.
    fn current_path(&self) -> String;

    /// Page the user came from, when the host knows it.
    fn referrer(&self) -> Option<String> {
        None
    }

    fn navigate(&self, href: &str, mode: NavigationMode);
}

/// A navigation that was carried out by a [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRecord {
    pub href: String,
    pub mode: NavigationMode,
}

/// In-memory navigator that records every navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: ArcSwap<String>,
    referrer: ArcSwapOption<String>,
    history: Mutex<Vec<NavigationRecord>>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: ArcSwap::from_pointee(path.into()),
            referrer: ArcSwapOption::empty(),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Move to `path` as if the user navigated there.
    pub fn set_path(&self, path: impl Into<String>) {
        self.current.store(Arc::new(path.into()));
    }

    pub fn set_referrer(&self, referrer: Option<String>) {
        self.referrer.store(referrer.map(Arc::new));
    }

    /// Every navigation so far, oldest first.
    pub fn history(&self) -> Vec<NavigationRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<NavigationRecord> {
        self.history().pop()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current.load().as_ref().clone()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.load_full().map(|r| r.as_ref().clone())
    }

    fn navigate(&self, href: &str, mode: NavigationMode) {
        let path = href.split(['?', '#']).next().unwrap_or(href);
        self.current.store(Arc::new(path.to_string()));
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NavigationRecord {
                href: href.to_string(),
                mode,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_updates_path_and_history() {
        let nav = MemoryNavigator::new("/dashboard");
        assert_eq!(nav.current_path(), "/dashboard");

        nav.navigate("/exception/403?path=%2Fdashboard", NavigationMode::InApp);
        assert_eq!(nav.current_path(), "/exception/403");
        assert_eq!(
            nav.last(),
            Some(NavigationRecord {
                href: "/exception/403?path=%2Fdashboard".into(),
                mode: NavigationMode::InApp,
            })
        );
    }

    #[test]
    fn test_user_navigation_is_not_recorded() {
        let nav = MemoryNavigator::new("/dashboard");
        nav.set_path("/users");
        assert_eq!(nav.current_path(), "/users");
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_referrer() {
        let nav = MemoryNavigator::new("/");
        assert_eq!(nav.referrer(), None);
        nav.set_referrer(Some("https://sso.example.com/".into()));
        assert_eq!(nav.referrer().as_deref(), Some("https://sso.example.com/"));
    }
}
