//! Token endpoint configuration.

use std::time::Duration;

/// Default path of the OAuth2 token endpoint, relative to the UAA URL.
pub const DEFAULT_TOKEN_PATH: &str = "/oauth/token";

/// Default path of the OAuth2 authorization endpoint used by the implicit grant.
pub const DEFAULT_AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Default redirect URI sent with implicit grant requests.
pub const DEFAULT_REDIRECT_URI: &str = "http://uaa.cloudfoundry.com/redirect/cf";

/// Default margin before the nominal expiry at which a token is treated as
/// expired.
pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Configuration for token acquisition and refresh.
///
/// ## Default Values
///
/// - `token_path`: `/oauth/token`
/// - `authorize_path`: `/oauth/authorize`
/// - `redirect_uri`: `http://uaa.cloudfoundry.com/redirect/cf`
/// - `expiry_margin`: 30s
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use uaa::TokenConfig;
///
/// let config = TokenConfig::builder()
///     .expiry_margin(Duration::from_secs(60))
///     .build();
/// assert_eq!(config.token_path, "/oauth/token");
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct TokenConfig {
    /// Path of the token endpoint.
    #[builder(into, default = DEFAULT_TOKEN_PATH.to_string())]
    pub token_path: String,

    /// Path of the authorization endpoint (implicit grant only).
    #[builder(into, default = DEFAULT_AUTHORIZE_PATH.to_string())]
    pub authorize_path: String,

    /// Redirect URI registered for the client (implicit grant only).
    #[builder(into, default = DEFAULT_REDIRECT_URI.to_string())]
    pub redirect_uri: String,

    /// A token is considered expired this long before its nominal expiry.
    #[builder(default = DEFAULT_EXPIRY_MARGIN)]
    pub expiry_margin: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TokenConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expiry margin.
    #[must_use]
    pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = margin;
        self
    }

    /// Sets the redirect URI for the implicit grant.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }
}
