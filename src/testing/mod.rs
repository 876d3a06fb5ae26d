//! Testing utilities.
//!
//! - [`StaticTokenEndpoint`]: a [`TokenEndpoint`] that issues a fixed token
//!   without contacting a server
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use uaa::testing::StaticTokenEndpoint;
//! use uaa::{UaaClient, UaaCredentials};
//!
//! let endpoint = Arc::new(StaticTokenEndpoint::new("test_token"));
//! let client = UaaClient::builder()
//!     .url("http://localhost:8080/uaa")
//!     .insecure()
//!     .credentials(UaaCredentials::new("admin").with_client_secret("adminsecret"))
//!     .token_endpoint(endpoint.clone())
//!     .build()?;
//! # Ok::<(), uaa::Error>(())
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::{AccessToken, GrantType, TokenEndpoint, TokenFuture, UaaCredentials};

/// Issues the same bearer token on every call and counts the calls.
#[derive(Debug)]
pub struct StaticTokenEndpoint {
    value: String,
    lifetime: Option<TimeDelta>,
    calls: AtomicUsize,
}

impl StaticTokenEndpoint {
    /// Creates an endpoint issuing tokens that never expire.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), lifetime: None, calls: AtomicUsize::new(0) }
    }

    /// Issues tokens expiring `lifetime` after they are handed out.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX));
        self
    }

    /// Returns how many tokens were issued.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn issue(&self) -> AccessToken {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let expires_at = self
            .lifetime
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        AccessToken::new(self.value.clone(), "bearer", expires_at)
    }
}

impl TokenEndpoint for StaticTokenEndpoint {
    fn acquire<'a>(&'a self, _grant: GrantType, _credentials: &'a UaaCredentials) -> TokenFuture<'a> {
        Box::pin(async move { Ok(self.issue()) })
    }

    fn refresh<'a>(
        &'a self,
        _credentials: &'a UaaCredentials,
        _refresh_token: &'a str,
    ) -> TokenFuture<'a> {
        Box::pin(async move { Ok(self.issue()) })
    }
}
