//! Client builder with typestate pattern.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use super::inner::ClientInner;
use crate::{
    Error, Result, UaaClient,
    auth::{HttpTokenEndpoint, TokenEndpoint, TokenManager, UaaCredentials},
    config::{TlsConfig, TokenConfig},
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker type: URL not yet provided.
pub struct NoUrl;

/// Marker type: URL has been provided.
pub struct HasUrl;

/// Marker type: Credentials not yet provided.
pub struct NoCredentials;

/// Marker type: Credentials have been provided.
pub struct HasCredentials;

/// Builder for creating [`UaaClient`] instances.
///
/// Uses the typestate pattern to ensure required configuration
/// (URL and credentials) is provided at compile time.
///
/// ## Required Configuration
///
/// - `url()`: The UAA base URL
/// - `credentials()`: The [`UaaCredentials`] to authenticate with
///
/// ## Optional Configuration
///
/// - `token_config()`: Token endpoint paths and expiry margin
/// - `tls_config()`: Custom TLS settings
/// - `timeout()`: Request timeout (default 30s)
/// - `token_endpoint()`: Replace the HTTP token endpoint
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use uaa::{UaaClient, UaaCredentials};
///
/// let client = UaaClient::builder()
///     .url("https://uaa.example.com")
///     .credentials(UaaCredentials::new("admin").with_client_secret("adminsecret"))
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<(), uaa::Error>(())
/// ```
pub struct ClientBuilder<UrlState, CredentialsState> {
    url: Option<String>,
    credentials: Option<UaaCredentials>,
    token_config: TokenConfig,
    tls_config: TlsConfig,
    timeout: Option<Duration>,
    token_endpoint: Option<Arc<dyn TokenEndpoint>>,
    _url_state: PhantomData<UrlState>,
    _credentials_state: PhantomData<CredentialsState>,
}

impl ClientBuilder<NoUrl, NoCredentials> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            url: None,
            credentials: None,
            token_config: TokenConfig::default(),
            tls_config: TlsConfig::default(),
            timeout: None,
            token_endpoint: None,
            _url_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoUrl, NoCredentials> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ClientBuilder<NoUrl, C> {
    /// Sets the UAA base URL, e.g. `https://login.example.com/uaa`.
    pub fn url(self, url: impl Into<String>) -> ClientBuilder<HasUrl, C> {
        ClientBuilder {
            url: Some(url.into()),
            credentials: self.credentials,
            token_config: self.token_config,
            tls_config: self.tls_config,
            timeout: self.timeout,
            token_endpoint: self.token_endpoint,
            _url_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl<U> ClientBuilder<U, NoCredentials> {
    /// Sets the credentials.
    ///
    /// The grant type is chosen from them on every token acquisition; see
    /// [`GrantType::select`](crate::GrantType::select).
    pub fn credentials(self, credentials: UaaCredentials) -> ClientBuilder<U, HasCredentials> {
        ClientBuilder {
            url: self.url,
            credentials: Some(credentials),
            token_config: self.token_config,
            tls_config: self.tls_config,
            timeout: self.timeout,
            token_endpoint: self.token_endpoint,
            _url_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl<U, C> ClientBuilder<U, C> {
    /// Sets the token configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use uaa::{TokenConfig, UaaClient};
    ///
    /// let builder = UaaClient::builder()
    ///     .token_config(TokenConfig::new().with_expiry_margin(Duration::from_secs(60)));
    /// ```
    #[must_use]
    pub fn token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = config;
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Disables TLS certificate verification and allows HTTP connections.
    ///
    /// **WARNING**: This is insecure and should only be used for local development.
    /// Never use this in production.
    #[must_use]
    pub fn insecure(mut self) -> Self {
        self.tls_config.skip_verification = true;
        self
    }

    /// Sets the request timeout. Token requests use the same timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the HTTP token endpoint.
    ///
    /// Useful for tests, or for tokens issued by something other than the
    /// UAA server the client talks to.
    #[must_use]
    pub fn token_endpoint(mut self, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        self.token_endpoint = Some(endpoint);
        self
    }
}

impl ClientBuilder<HasUrl, HasCredentials> {
    /// Builds the client.
    ///
    /// No request is made here; the first token is acquired by the first
    /// API call.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) if:
    /// - The URL is invalid
    /// - The URL is not HTTPS and `insecure()` was not set
    /// - The TLS configuration cannot be applied
    pub fn build(self) -> Result<UaaClient> {
        let url = self.url.ok_or_else(|| Error::configuration("URL is required"))?;
        let credentials =
            self.credentials.ok_or_else(|| Error::configuration("credentials are required"))?;

        let base_url = url::Url::parse(&url)?;

        if base_url.scheme() != "https" && !self.tls_config.skip_verification {
            return Err(Error::configuration(
                "HTTPS is required. Use .insecure() for development with HTTP.",
            ));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::none());
        let http = self
            .tls_config
            .apply(builder)?
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        let endpoint = match self.token_endpoint {
            Some(endpoint) => endpoint,
            None => Arc::new(HttpTokenEndpoint::new(
                http.clone(),
                base_url.clone(),
                self.token_config.clone(),
            )),
        };

        let tokens = TokenManager::new(credentials, endpoint, self.token_config.expiry_margin);

        tracing::debug!(url = %base_url, "UAA client created");

        Ok(UaaClient::from_inner(ClientInner { base_url, http, tokens }))
    }
}
