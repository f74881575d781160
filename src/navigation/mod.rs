//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! FailureEnvelope
//!     → policy.rs (classify, pick the category's effect, build Rejection)
//!     → coordinator.rs (loop guards, debounced login redirect, 401 handling)
//!     → query.rs (from / path / message / traceId for error pages)
//!     → Navigator (host router)
//! ```
//!
//! # Design Decisions
//! - Classification stays pure; only this subsystem has side effects
//! - The coordinator is an owned value, one per pipeline, never a global
//! - In-app navigation for page-level errors, full load for session loss

pub mod coordinator;
pub mod policy;
pub mod query;

pub use coordinator::{NavigationCoordinator, UnauthorizedOutcome};
pub use policy::FailurePolicy;
pub use query::ErrorQuery;
