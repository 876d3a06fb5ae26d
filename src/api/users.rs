//! SCIM users.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PagedResult, ScimMeta, ScimValue, UaaGroupMember, if_match, segment};
use crate::client::UaaClient;
use crate::filter::{FilterRequest, FilterRequestBuilder};
use crate::{Error, Result};

/// A user's name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    /// Full name for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
}

impl UserName {
    /// Creates a name from given and family name.
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self { formatted: None, family_name: Some(family_name.into()), given_name: Some(given_name.into()) }
    }
}

/// A SCIM user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UaaUser {
    /// Server-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
    /// Schemas of the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    /// Login name.
    #[serde(default)]
    pub user_name: String,
    /// Name parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    /// Initial password. Only sent on create; never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Email addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ScimValue>,
    /// Phone numbers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<ScimValue>,
    /// Groups the user belongs to. Read-only.
    #[serde(default, skip_serializing)]
    pub groups: Vec<UaaGroupMember>,
    /// Whether the account is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Whether the email address is verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Identity provider the user comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl UaaUser {
    /// Creates a user with only a login name.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self { user_name: user_name.into(), ..Default::default() }
    }

    /// Returns the primary email address, or the first one.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| e.primary == Some(true))
            .or_else(|| self.emails.first())
            .map(|e| e.value.as_str())
    }
}

impl fmt::Debug for UaaUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaaUser")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("emails", &self.emails)
            .field("active", &self.active)
            .field("origin", &self.origin)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
}

/// Client for SCIM users (`/Users`).
///
/// Access via [`UaaClient::users()`].
///
/// ## Example
///
/// ```rust,ignore
/// use uaa::api::{ScimValue, UaaUser, UserName};
///
/// let mut user = UaaUser::new("marissa");
/// user.name = Some(UserName::new("Marissa", "Bloggs"));
/// user.emails = vec![ScimValue::primary("marissa@example.com")];
/// user.password = Some("koala".into());
///
/// let created = client.users().create(&user).await?;
/// client.users().change_password(created.id.as_deref().unwrap(), "wombat").await?;
/// ```
#[derive(Clone)]
pub struct UsersClient {
    client: UaaClient,
}

impl UsersClient {
    pub(crate) fn new(client: UaaClient) -> Self {
        Self { client }
    }

    /// Creates a user.
    pub async fn create(&self, user: &UaaUser) -> Result<UaaUser> {
        if user.user_name.trim().is_empty() {
            return Err(Error::invalid_argument("user_name must not be empty"));
        }
        self.client.inner().post("/Users", user).await
    }

    /// Replaces a user. The request carries the user's `meta.version` as
    /// `If-Match`, so it fails with
    /// [`ErrorKind::Conflict`](crate::ErrorKind::Conflict) if the user changed
    /// on the server in the meantime.
    pub async fn update(&self, user: &UaaUser) -> Result<UaaUser> {
        let id = require_id(user.id.as_deref())?;
        let path = format!("/Users/{}", segment(id));
        let version = if_match(user.meta.as_ref());
        self.client.inner().put(&path, user, Some(&version)).await
    }

    /// Deletes a user.
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let id = require_id(Some(user_id))?;
        self.client.inner().delete(&format!("/Users/{}", segment(id))).await
    }

    /// Sets a user's password.
    pub async fn change_password(&self, user_id: &str, new_password: &str) -> Result<()> {
        let id = require_id(Some(user_id))?;
        let path = format!("/Users/{}/password", segment(id));
        self.client.inner().put_discard(&path, &PasswordChange { password: new_password }).await
    }

    /// Gets a user by login name.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) if no
    /// user has that name.
    pub async fn get_by_name(&self, user_name: &str) -> Result<UaaUser> {
        let request = FilterRequestBuilder::new().equals("userName", user_name)?.build()?;
        let page: PagedResult<UaaUser> = self.client.inner().search("/Users", &request).await?;
        page.into_first().ok_or_else(|| Error::not_found(format!("no user named {}", user_name)))
    }

    /// Resolves a login name to a user id.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) if no user has
    ///   that name
    /// - [`ErrorKind::Lookup`](crate::ErrorKind::Lookup) if the search
    ///   failed; the cause is available through `source()`
    pub async fn user_id_by_name(&self, user_name: &str) -> Result<String> {
        let request = FilterRequestBuilder::new()
            .equals("userName", user_name)?
            .attributes(["id"])?
            .build()?;

        let page: PagedResult<IdOnly> = self
            .client
            .inner()
            .search("/Users", &request)
            .await
            .map_err(|err| Error::lookup(format!("user id lookup for {} failed", user_name), err))?;

        page.into_first()
            .map(|user| user.id)
            .ok_or_else(|| Error::not_found(format!("no user named {}", user_name)))
    }

    /// Lists users matching a filter.
    pub async fn list(&self, request: &FilterRequest) -> Result<PagedResult<UaaUser>> {
        self.client.inner().search("/Users", request).await
    }
}

fn require_id(id: Option<&str>) -> Result<&str> {
    id.filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::invalid_argument("user id must not be empty"))
}

impl fmt::Debug for UsersClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersClient").finish_non_exhaustive()
    }
}
