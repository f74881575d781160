//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Request id and trace id are logged as fields on every request event
//! - Metrics are cheap and exporter-agnostic

pub mod logging;
pub mod metrics;
