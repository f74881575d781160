//! Admin Request Pipeline Library
//!
//! HTTP client pipeline for an admin backend: outbound decoration, failure
//! classification, error message resolution and navigation side effects.

pub mod config;
pub mod failure;
pub mod http;
pub mod navigation;
pub mod observability;
pub mod session;

pub use config::schema::ClientConfig;
pub use failure::{ErrorCategory, Rejection, RequestError, RequestResult};
pub use http::{AdminClient, RequestOptions};
pub use navigation::NavigationCoordinator;
