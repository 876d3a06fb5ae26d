//! OAuth2 grant strategy selection.

use std::fmt;

use super::UaaCredentials;
use crate::{Error, Result};

/// OAuth2 grant used to obtain an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum GrantType {
    /// `client_credentials`: the client acts on its own behalf.
    ClientCredentials,
    /// `password`: resource owner password credentials.
    Password,
    /// `implicit`: token issued from the authorization endpoint.
    Implicit,
    /// `refresh_token`: renewal of a token issued by another grant.
    ///
    /// Never returned by [`GrantType::select`]; it only tags refresh failures.
    RefreshToken,
}

impl GrantType {
    /// Returns the wire name of the grant.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::ClientCredentials => "client_credentials",
            GrantType::Password => "password",
            GrantType::Implicit => "implicit",
            GrantType::RefreshToken => "refresh_token",
        }
    }

    /// Returns `true` if tokens issued by this grant may carry a usable
    /// refresh token.
    pub fn supports_refresh(&self) -> bool {
        matches!(self, GrantType::Password | GrantType::RefreshToken)
    }

    /// Selects the grant for the given credentials.
    ///
    /// | user id + password | client secret | grant |
    /// |---|---|---|
    /// | both set | any | [`Password`](GrantType::Password) |
    /// | not both | set | [`ClientCredentials`](GrantType::ClientCredentials) |
    /// | not both | unset | [`Implicit`](GrantType::Implicit) |
    ///
    /// Blank strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCredentials`](crate::ErrorKind::InvalidCredentials)
    /// if the client id is blank.
    pub fn select(credentials: &UaaCredentials) -> Result<GrantType> {
        if !has_text(Some(credentials.client_id())) {
            return Err(Error::invalid_credentials("client id is required"));
        }

        if has_text(credentials.user_id()) && has_text(credentials.password()) {
            Ok(GrantType::Password)
        } else if has_text(credentials.client_secret()) {
            Ok(GrantType::ClientCredentials)
        } else {
            Ok(GrantType::Implicit)
        }
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
