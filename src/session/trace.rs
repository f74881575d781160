//! Trace correlation ids.
//!
//! The trace id is stable for the lifetime of a session and created lazily;
//! the request id is fresh for every call.

use std::sync::OnceLock;
use uuid::Uuid;

/// Supplies trace and request identifiers.
pub trait TraceCorrelator: Send + Sync {
    /// Session trace id, created on first use.
    fn get_or_create_trace_id(&self) -> String;

    /// A new id for a single outbound call. Never reused.
    fn generate_request_id(&self) -> String;

    /// Session trace id if one has been created.
    fn current_trace_id(&self) -> Option<String>;
}

/// Trace correlator backed by UUID v4 ids.
#[derive(Debug, Default)]
pub struct SessionTraceCorrelator {
    trace_id: OnceLock<String>,
}

impl SessionTraceCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session whose trace id is already known.
    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        let correlator = Self::default();
        let _ = correlator.trace_id.set(trace_id.into());
        correlator
    }
}

impl TraceCorrelator for SessionTraceCorrelator {
    fn get_or_create_trace_id(&self) -> String {
        self.trace_id
            .get_or_init(|| {
                let id = Uuid::new_v4().simple().to_string();
                tracing::debug!(trace_id = %id, "Created session trace id");
                id
            })
            .clone()
    }

    fn generate_request_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn current_trace_id(&self) -> Option<String> {
        self.trace_id.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_trace_id_is_lazy_and_stable() {
        let correlator = SessionTraceCorrelator::new();
        assert_eq!(correlator.current_trace_id(), None);

        let first = correlator.get_or_create_trace_id();
        assert_eq!(correlator.get_or_create_trace_id(), first);
        assert_eq!(correlator.current_trace_id(), Some(first));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let correlator = SessionTraceCorrelator::new();
        let ids: HashSet<_> = (0..100).map(|_| correlator.generate_request_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_resumed_trace_id() {
        let correlator = SessionTraceCorrelator::with_trace_id("abc123");
        assert_eq!(correlator.current_trace_id().as_deref(), Some("abc123"));
        assert_eq!(correlator.get_or_create_trace_id(), "abc123");
    }
}
