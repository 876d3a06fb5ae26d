//! OAuth client registrations.

use serde::{Deserialize, Serialize};

use super::{PagedResult, segment};
use crate::client::UaaClient;
use crate::filter::FilterRequest;
use crate::{Error, Result};

/// Grant types a registered client may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UaaTokenGrantType {
    /// `authorization_code`
    AuthorizationCode,
    /// `implicit`
    Implicit,
    /// `password`
    Password,
    /// `client_credentials`
    ClientCredentials,
    /// `refresh_token`
    RefreshToken,
}

/// An OAuth client registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UaaClientDetails {
    /// The client id.
    pub client_id: String,
    /// The client secret. Only sent on create; never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_validity: Option<u64>,
    /// Refresh token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_validity: Option<u64>,
    /// Scopes the client may request on behalf of users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
    /// Resource ids the client's tokens are valid for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_ids: Vec<String>,
    /// Authorities granted to the client itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,
    /// Grant types the client may use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorized_grant_types: Vec<UaaTokenGrantType>,
    /// Registered redirect URIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirect_uri: Vec<String>,
}

impl UaaClientDetails {
    /// Creates a registration with only a client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), ..Default::default() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretChange<'a> {
    old_secret: &'a str,
    secret: &'a str,
}

/// Client for OAuth client registrations (`/oauth/clients`).
///
/// Access via [`UaaClient::clients()`].
///
/// ## Example
///
/// ```rust,ignore
/// use uaa::api::{UaaClientDetails, UaaTokenGrantType};
///
/// let mut details = UaaClientDetails::new("my-app");
/// details.client_secret = Some("s3cret".into());
/// details.authorized_grant_types = vec![UaaTokenGrantType::ClientCredentials];
///
/// let created = client.clients().create(&details).await?;
/// ```
#[derive(Clone)]
pub struct OAuthClientsClient {
    client: UaaClient,
}

impl OAuthClientsClient {
    pub(crate) fn new(client: UaaClient) -> Self {
        Self { client }
    }

    /// Registers a client.
    pub async fn create(&self, details: &UaaClientDetails) -> Result<UaaClientDetails> {
        require_client_id(&details.client_id)?;
        self.client.inner().post("/oauth/clients", details).await
    }

    /// Gets a registration by client id.
    pub async fn get(&self, client_id: &str) -> Result<UaaClientDetails> {
        require_client_id(client_id)?;
        let path = format!("/oauth/clients/{}", segment(client_id));
        self.client.inner().get(&path).await
    }

    /// Replaces a registration. The secret cannot be changed this way; use
    /// [`change_secret`](Self::change_secret).
    pub async fn update(&self, details: &UaaClientDetails) -> Result<UaaClientDetails> {
        require_client_id(&details.client_id)?;
        let path = format!("/oauth/clients/{}", segment(&details.client_id));
        self.client.inner().put(&path, details, None).await
    }

    /// Deletes a registration.
    pub async fn delete(&self, client_id: &str) -> Result<()> {
        require_client_id(client_id)?;
        let path = format!("/oauth/clients/{}", segment(client_id));
        self.client.inner().delete(&path).await
    }

    /// Lists registrations matching a filter.
    pub async fn list(&self, request: &FilterRequest) -> Result<PagedResult<UaaClientDetails>> {
        self.client.inner().search("/oauth/clients", request).await
    }

    /// Changes a client's secret.
    pub async fn change_secret(&self, client_id: &str, old_secret: &str, new_secret: &str) -> Result<()> {
        require_client_id(client_id)?;
        let path = format!("/oauth/clients/{}/secret", segment(client_id));
        let body = SecretChange { old_secret, secret: new_secret };
        self.client.inner().put_discard(&path, &body).await
    }
}

fn require_client_id(client_id: &str) -> Result<()> {
    if client_id.trim().is_empty() {
        return Err(Error::invalid_argument("client_id must not be empty"));
    }
    Ok(())
}

impl std::fmt::Debug for OAuthClientsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientsClient").finish_non_exhaustive()
    }
}
