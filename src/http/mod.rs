//! HTTP request pipeline.
//!
//! # Data Flow
//! ```text
//! AdminClient::get / post / put / patch / delete
//!     → request.rs (trace id, request id, bearer token)
//!     → transport.rs (base URL, timeout, reqwest)
//!     → response.rs (accept by status, decode payload)
//!     → [failure policy classifies and navigates] on rejection
//!     → payload or RequestError to the caller
//! ```
//!
//! # Design Decisions
//! - The transport is a trait so tests and hosts can replace the network
//! - Transport never judges statuses; acceptance is decided per call

pub mod client;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{AdminClient, AdminClientBuilder, RequestOptions};
pub use request::{OutboundMiddleware, OutboundRequest, TRACE_ID, X_REQUEST_ID, X_TRACE_ID};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportSetupError};
