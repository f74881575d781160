//! Inbound failure handling.
//!
//! # Data Flow
//! ```text
//! non-accepted response / transport error
//!     → envelope.rs (FailureEnvelope: HTTP failure XOR transport failure)
//!     → classify.rs (pure: envelope → ErrorCategory)
//!     → message.rs  (pure: envelope → message / ErrorMessage)
//!     → error.rs    (Rejection handed back to the caller)
//! ```
//!
//! Nothing here has side effects; navigation is driven from the category by
//! the `navigation` subsystem.

pub mod classify;
pub mod envelope;
pub mod error;
pub mod message;
pub mod problem;

pub use classify::{classify, ErrorCategory};
pub use envelope::{FailureCause, FailureEnvelope, HttpFailure, TransportCode, TransportFailure};
pub use error::{Rejection, RequestError, RequestResult};
pub use message::{
    resolve, resolve_from_failure, resolve_from_transport_failure, ConflictKind, ErrorMessage,
};
pub use problem::ProblemBody;
