//! The UAA connection.
//!
//! [`UaaClient`] owns the base URL, the HTTP client and the
//! [`TokenManager`](crate::auth::TokenManager) for one UAA server. Resource
//! operations hang off it:
//!
//! - [`UaaClient::clients()`]: OAuth client registrations
//! - [`UaaClient::users()`]: SCIM users
//! - [`UaaClient::groups()`]: SCIM groups and external mappings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uaa::prelude::*;
//!
//! let client = UaaClient::builder()
//!     .url("https://uaa.example.com")
//!     .credentials(UaaCredentials::new("admin").with_client_secret("adminsecret"))
//!     .build()?;
//!
//! let admins = client.users().get_by_name("admin").await?;
//! ```

mod builder;
mod inner;

pub use builder::{ClientBuilder, DEFAULT_TIMEOUT, HasCredentials, HasUrl, NoCredentials, NoUrl};

use std::sync::Arc;

use crate::api::{GroupsClient, OAuthClientsClient, UsersClient};
use crate::auth::{AccessToken, TokenManager, UaaCredentials};
use crate::{Error, Result};

/// Environment variable holding the UAA base URL.
pub const ENV_URL: &str = "UAA_URL";

/// A connection to one UAA server.
///
/// ## Thread Safety
///
/// `UaaClient` is `Clone` and thread-safe. Clones share the HTTP connection
/// pool and the cached access token, so a token refresh triggered through one
/// clone is seen by all of them.
///
/// ## Token Revocation
///
/// A request that fails with
/// [`ErrorKind::Unauthorized`](crate::ErrorKind::Unauthorized) after the
/// client sent a token it considered valid usually means the server revoked
/// it. Call [`invalidate_token`](UaaClient::invalidate_token) and retry once:
///
/// ```rust,ignore
/// let user = match client.users().get_by_name("marissa").await {
///     Err(err) if err.should_refresh_token() => {
///         client.invalidate_token();
///         client.users().get_by_name("marissa").await?
///     }
///     other => other?,
/// };
/// ```
#[derive(Clone)]
pub struct UaaClient {
    inner: Arc<inner::ClientInner>,
}

impl UaaClient {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder<NoUrl, NoCredentials> {
        ClientBuilder::new()
    }

    /// Creates a client from `UAA_URL` and the credential variables read by
    /// [`UaaCredentials::from_env`].
    ///
    /// Plain `http://` URLs are accepted here so local UAA instances work
    /// without extra configuration.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_URL)
            .map_err(|_| Error::configuration(format!("environment variable {} not set", ENV_URL)))?;
        let credentials = UaaCredentials::from_env()?;

        let builder = Self::builder().url(url.clone()).credentials(credentials);
        if url.starts_with("http://") { builder.insecure().build() } else { builder.build() }
    }

    /// Returns the OAuth client registrations API.
    pub fn clients(&self) -> OAuthClientsClient {
        OAuthClientsClient::new(self.clone())
    }

    /// Returns the users API.
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.clone())
    }

    /// Returns the groups API.
    pub fn groups(&self) -> GroupsClient {
        GroupsClient::new(self.clone())
    }

    /// Returns a valid access token, acquiring or refreshing it if needed.
    pub async fn token(&self) -> Result<Arc<AccessToken>> {
        self.inner.tokens.token().await
    }

    /// Drops the cached access token; the next request acquires a new one.
    pub fn invalidate_token(&self) {
        self.inner.tokens.invalidate();
    }

    /// Returns the token manager of this connection.
    pub fn token_manager(&self) -> &TokenManager {
        &self.inner.tokens
    }

    /// Returns the base URL of the client.
    pub fn url(&self) -> &str {
        self.inner.base_url.as_str().trim_end_matches('/')
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    pub(crate) fn inner(&self) -> &inner::ClientInner {
        &self.inner
    }
}

impl std::fmt::Debug for UaaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaClient")
            .field("url", &self.url())
            .field("token_state", &self.inner.tokens.state())
            .finish_non_exhaustive()
    }
}
