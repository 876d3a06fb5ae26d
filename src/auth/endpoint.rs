//! Token endpoint abstraction and its HTTP implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION, USER_AGENT};
use url::Url;
use url::form_urlencoded;

use super::token::TokenResponse;
use super::{AccessToken, GrantType, UaaCredentials};
use crate::config::TokenConfig;
use crate::user_agent::user_agent;
use crate::{Error, Result};

/// Boxed future returned by [`TokenEndpoint`] methods.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<AccessToken>> + Send + 'a>>;

/// Source of access tokens.
///
/// [`HttpTokenEndpoint`] talks to a real UAA server. Implement this trait to
/// plug in another issuer or a test double; the
/// [`TokenManager`](super::TokenManager) only ever sees this trait.
///
/// ## Object Safety
///
/// This trait is object-safe and is used as `Arc<dyn TokenEndpoint>`.
///
/// ## Example
///
/// ```rust
/// use chrono::{TimeDelta, Utc};
/// use uaa::auth::{AccessToken, GrantType, TokenEndpoint, TokenFuture};
/// use uaa::UaaCredentials;
///
/// struct Static;
///
/// impl TokenEndpoint for Static {
///     fn acquire<'a>(&'a self, _: GrantType, _: &'a UaaCredentials) -> TokenFuture<'a> {
///         Box::pin(async {
///             Ok(AccessToken::new("static", "bearer", Utc::now() + TimeDelta::hours(1)))
///         })
///     }
///
///     fn refresh<'a>(&'a self, _: &'a UaaCredentials, _: &'a str) -> TokenFuture<'a> {
///         Box::pin(async {
///             Err(uaa::Error::token_acquisition(GrantType::RefreshToken, "not supported"))
///         })
///     }
/// }
/// ```
pub trait TokenEndpoint: Send + Sync {
    /// Obtains a new token with the given grant.
    ///
    /// Failures are reported as
    /// [`ErrorKind::TokenAcquisition`](crate::ErrorKind::TokenAcquisition)
    /// tagged with `grant`.
    fn acquire<'a>(&'a self, grant: GrantType, credentials: &'a UaaCredentials) -> TokenFuture<'a>;

    /// Exchanges a refresh token for a new token.
    fn refresh<'a>(
        &'a self,
        credentials: &'a UaaCredentials,
        refresh_token: &'a str,
    ) -> TokenFuture<'a>;
}

impl<T: TokenEndpoint + ?Sized> TokenEndpoint for Arc<T> {
    fn acquire<'a>(&'a self, grant: GrantType, credentials: &'a UaaCredentials) -> TokenFuture<'a> {
        (**self).acquire(grant, credentials)
    }

    fn refresh<'a>(
        &'a self,
        credentials: &'a UaaCredentials,
        refresh_token: &'a str,
    ) -> TokenFuture<'a> {
        (**self).refresh(credentials, refresh_token)
    }
}

impl<T: TokenEndpoint + ?Sized> TokenEndpoint for Box<T> {
    fn acquire<'a>(&'a self, grant: GrantType, credentials: &'a UaaCredentials) -> TokenFuture<'a> {
        (**self).acquire(grant, credentials)
    }

    fn refresh<'a>(
        &'a self,
        credentials: &'a UaaCredentials,
        refresh_token: &'a str,
    ) -> TokenFuture<'a> {
        (**self).refresh(credentials, refresh_token)
    }
}

/// Token endpoint of a UAA server.
///
/// - client credentials, password and refresh grants POST a form to
///   `token_path` with HTTP Basic client authentication
/// - the implicit grant POSTs to `authorize_path` and reads the token from
///   the fragment of the redirect `Location`
///
/// The supplied HTTP client must not follow redirects.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    http: reqwest::Client,
    base_url: Url,
    config: TokenConfig,
}

impl HttpTokenEndpoint {
    /// Creates an endpoint for the UAA server at `base_url`.
    pub fn new(http: reqwest::Client, base_url: Url, config: TokenConfig) -> Self {
        Self { http, base_url, config }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    fn basic_auth(credentials: &UaaCredentials) -> String {
        let pair = format!("{}:{}", credentials.client_id(), credentials.client_secret().unwrap_or(""));
        format!("Basic {}", BASE64.encode(pair))
    }

    async fn token_request(
        &self,
        grant: GrantType,
        credentials: &UaaCredentials,
        form: String,
    ) -> Result<AccessToken> {
        let url = self.endpoint_url(&self.config.token_path)?;
        tracing::debug!(grant_type = %grant, url = %url, "requesting access token");

        let issued_at = Utc::now();
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, Self::basic_auth(credentials))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, user_agent())
            .body(form)
            .send()
            .await
            .map_err(|e| request_failed(grant, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(grant, status.as_u16(), &body));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            Error::token_acquisition(grant, "malformed token response").with_source(Error::from(e))
        })?;

        Ok(body.into_token(issued_at))
    }

    async fn implicit(&self, credentials: &UaaCredentials) -> Result<AccessToken> {
        let grant = GrantType::Implicit;
        let url = self.endpoint_url(&self.config.authorize_path)?;
        tracing::debug!(grant_type = %grant, url = %url, "requesting implicit access token");

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "token")
            .append_pair("client_id", credentials.client_id())
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .finish();

        let issued_at = Utc::now();
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(USER_AGENT, user_agent())
            .body(form)
            .send()
            .await
            .map_err(|e| request_failed(grant, e))?;

        let status = response.status();
        if !status.is_redirection() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(grant, status.as_u16(), &body));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::token_acquisition(grant, "redirect without Location header"))?;

        parse_fragment(location)
            .map(|r| r.into_token(issued_at))
            .map_err(|e| Error::token_acquisition(grant, e))
    }
}

impl TokenEndpoint for HttpTokenEndpoint {
    fn acquire<'a>(&'a self, grant: GrantType, credentials: &'a UaaCredentials) -> TokenFuture<'a> {
        Box::pin(async move {
            match grant {
                GrantType::ClientCredentials => {
                    let form = form_urlencoded::Serializer::new(String::new())
                        .append_pair("grant_type", grant.as_str())
                        .finish();
                    self.token_request(grant, credentials, form).await
                },
                GrantType::Password => {
                    let form = form_urlencoded::Serializer::new(String::new())
                        .append_pair("grant_type", grant.as_str())
                        .append_pair("username", credentials.user_id().unwrap_or_default())
                        .append_pair("password", credentials.password().unwrap_or_default())
                        .finish();
                    self.token_request(grant, credentials, form).await
                },
                GrantType::Implicit => self.implicit(credentials).await,
                GrantType::RefreshToken => Err(Error::token_acquisition(
                    grant,
                    "refresh_token is not an acquisition grant",
                )),
            }
        })
    }

    fn refresh<'a>(
        &'a self,
        credentials: &'a UaaCredentials,
        refresh_token: &'a str,
    ) -> TokenFuture<'a> {
        Box::pin(async move {
            let grant = GrantType::RefreshToken;
            let form = form_urlencoded::Serializer::new(String::new())
                .append_pair("grant_type", grant.as_str())
                .append_pair("refresh_token", refresh_token)
                .finish();
            self.token_request(grant, credentials, form).await
        })
    }
}

fn request_failed(grant: GrantType, err: reqwest::Error) -> Error {
    let cause = Error::from(err);
    Error::token_acquisition(grant, format!("token endpoint unreachable: {}", cause.message()))
        .with_source(cause)
}

fn rejected(grant: GrantType, status: u16, body: &str) -> Error {
    Error::token_acquisition(grant, format!("token endpoint returned HTTP {}", status))
        .with_status(status)
        .with_source(Error::from_status(status, body))
}

/// Reads a token response from the fragment of an implicit grant redirect.
fn parse_fragment(location: &str) -> std::result::Result<TokenResponse, String> {
    let url = Url::parse(location).map_err(|e| format!("invalid redirect location: {}", e))?;
    let fragment = url.fragment().unwrap_or_default();

    let mut access_token = None;
    let mut token_type = None;
    let mut expires_in = None;
    let mut refresh_token = None;
    let mut scope = None;
    let mut error = None;

    for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "token_type" => token_type = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "scope" => scope = Some(value.into_owned()),
            "error_description" => error = Some(value.into_owned()),
            "error" if error.is_none() => error = Some(value.into_owned()),
            _ => {},
        }
    }

    if let Some(error) = error {
        return Err(format!("authorization endpoint returned error: {}", error));
    }

    let access_token = access_token.ok_or("redirect location carries no access_token")?;

    Ok(TokenResponse {
        access_token,
        token_type: token_type.unwrap_or_else(|| "bearer".to_string()),
        expires_in,
        refresh_token,
        scope,
    })
}
