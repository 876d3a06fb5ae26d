//! Credential descriptor for UAA authentication.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Result};

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "UAA_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "UAA_CLIENT_SECRET";
/// Environment variable holding the resource owner's user name.
pub const ENV_USER_ID: &str = "UAA_USER_ID";
/// Environment variable holding the resource owner's password.
pub const ENV_PASSWORD: &str = "UAA_PASSWORD";

/// Inert description of who is asking for a token.
///
/// The client id is always required. Which other fields are set decides the
/// OAuth2 grant used (see [`GrantType::select`](super::GrantType::select)):
///
/// - user id **and** password: resource owner password credentials
/// - client secret: client credentials
/// - neither: implicit
///
/// Secrets are zeroed when the value is dropped and redacted from `Debug`.
///
/// ## Example
///
/// ```rust
/// use uaa::{GrantType, UaaCredentials};
///
/// let creds = UaaCredentials::new("admin").with_client_secret("adminsecret");
/// assert_eq!(GrantType::select(&creds).unwrap(), GrantType::ClientCredentials);
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UaaCredentials {
    #[zeroize(skip)]
    client_id: String,
    client_secret: Option<String>,
    #[zeroize(skip)]
    user_id: Option<String>,
    password: Option<String>,
}

impl UaaCredentials {
    /// Creates credentials holding only a client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: None, user_id: None, password: None }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the resource owner's user id and password.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>, password: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.password = Some(password.into());
        self
    }

    /// Reads credentials from `UAA_CLIENT_ID`, `UAA_CLIENT_SECRET`,
    /// `UAA_USER_ID` and `UAA_PASSWORD`.
    ///
    /// Only the client id is required; unset or empty optional variables are
    /// left out.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let client_id = optional(ENV_CLIENT_ID).ok_or_else(|| {
            Error::invalid_credentials(format!("environment variable {} not set", ENV_CLIENT_ID))
        })?;

        Ok(Self {
            client_id,
            client_secret: optional(ENV_CLIENT_SECRET),
            user_id: optional(ENV_USER_ID),
            password: optional(ENV_PASSWORD),
        })
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret, if set.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Returns the resource owner's user id, if set.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the resource owner's password, if set.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for UaaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaaCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
