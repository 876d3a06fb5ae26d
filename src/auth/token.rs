//! Access tokens and token endpoint responses.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// An OAuth2 access token issued by UAA.
///
/// Tokens are owned by the [`TokenManager`](super::TokenManager) and handed
/// out behind an `Arc`; a refresh replaces the whole token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    token_type: String,
    expires_at: DateTime<Utc>,
    refresh_token: Option<String>,
    scope: Vec<String>,
}

impl AccessToken {
    /// Creates a token.
    pub fn new(
        value: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value: value.into(),
            token_type: token_type.into(),
            expires_at,
            refresh_token: None,
            scope: Vec::new(),
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the granted scopes.
    #[must_use]
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the raw token value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the token type, usually `bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the nominal expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the refresh token, if one was issued.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the granted scopes.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Returns `true` if the token is expired at `now`, treating it as
    /// expired `margin` before its nominal expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        let deadline = self.expires_at.checked_sub_signed(margin).unwrap_or(DateTime::<Utc>::MIN_UTC);
        now >= deadline
    }

    /// Returns the `Authorization` header value: `<token_type> <value>`.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// JSON body returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated scope list.
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Converts the response into a token, computing the expiry from the
    /// instant the request was sent.
    ///
    /// A missing `expires_in` means the token does not expire.
    pub fn into_token(self, issued_at: DateTime<Utc>) -> AccessToken {
        let expires_at = self
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        AccessToken {
            value: self.access_token,
            token_type: self.token_type,
            expires_at,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            scope: self
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}
