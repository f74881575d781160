//! Session collaborators consumed by the request pipeline.
//!
//! # Data Flow
//! ```text
//! trace.rs        → trace id (per session) + request id (per call) → outbound headers
//! credentials.rs  → bearer token → outbound headers
//!                 → logout       ← navigation policy (401 on a terminal page)
//! route.rs        → current path → loop guards, referer
//!                 ← navigation   ← navigation coordinator
//! ```
//!
//! # Design Decisions
//! - Every collaborator is a trait so hosts plug in their own auth and router
//! - Async collaborators return `BoxFuture` to stay object safe

pub mod credentials;
pub mod route;
pub mod trace;

pub use credentials::{CredentialError, NoopTeardown, SessionTeardown, SharedToken, TokenSupplier};
pub use route::{MemoryNavigator, NavigationMode, NavigationRecord, Navigator};
pub use trace::{SessionTraceCorrelator, TraceCorrelator};
