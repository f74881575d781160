//! Credential collaborators: the token supplier and the session teardown.
//!
//! Both are asynchronous and may fail. Token acquisition and logout are owned
//! by the host application; this crate only consumes them.

use arc_swap::ArcSwapOption;
use futures_util::future::{self, BoxFuture};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by credential collaborators.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The token could not be obtained or refreshed.
    #[error("Access token unavailable: {0}")]
    Token(String),

    #[error("Logout failed: {0}")]
    Logout(String),
}

/// Supplies the current bearer credential.
pub trait TokenSupplier: Send + Sync {
    /// `Ok(None)` means "no credential", not an error.
    fn access_token(&self) -> BoxFuture<'_, Result<Option<String>, CredentialError>>;
}

/// Tears the session down (clears tokens, ends the login session).
pub trait SessionTeardown: Send + Sync {
    fn logout(&self) -> BoxFuture<'_, Result<(), CredentialError>>;
}

/// Token supplier holding a token the host swaps in and out.
#[derive(Debug, Default)]
pub struct SharedToken {
    token: ArcSwapOption<String>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: ArcSwapOption::new(token.map(Arc::new)),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        self.token.store(Some(Arc::new(token.into())));
    }

    pub fn clear(&self) {
        self.token.store(None);
    }

    pub fn get(&self) -> Option<String> {
        self.token.load_full().map(|t| t.as_ref().clone())
    }
}

impl TokenSupplier for SharedToken {
    fn access_token(&self) -> BoxFuture<'_, Result<Option<String>, CredentialError>> {
        Box::pin(future::ready(Ok(self.get())))
    }
}

/// Teardown that only clears a [`SharedToken`].
impl SessionTeardown for SharedToken {
    fn logout(&self) -> BoxFuture<'_, Result<(), CredentialError>> {
        self.clear();
        Box::pin(future::ready(Ok(())))
    }
}

/// Teardown that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTeardown;

impl SessionTeardown for NoopTeardown {
    fn logout(&self) -> BoxFuture<'_, Result<(), CredentialError>> {
        Box::pin(future::ready(Ok(())))
    }
}
