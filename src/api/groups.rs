//! SCIM groups and external group mappings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PagedResult, SCIM_CORE_SCHEMA, ScimMeta, if_match, segment};
use crate::client::UaaClient;
use crate::filter::{FilterRequest, FilterRequestBuilder};
use crate::{Error, Result};

/// A member of a group, or a group a user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UaaGroupMember {
    /// Id of the member user or group.
    pub value: String,
    /// `USER` or `GROUP` for group members; `DIRECT` or `INDIRECT` for a
    /// user's groups.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
    /// Identity provider of the member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Display name, as returned in a user's group list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Legacy member authorities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,
}

impl UaaGroupMember {
    /// Creates a user member.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self { value: user_id.into(), member_type: Some("USER".into()), ..Default::default() }
    }
}

/// A SCIM group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UaaGroup {
    /// Server-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
    /// Schemas of the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    /// Group name, e.g. `cloud_controller.admin`.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<UaaGroupMember>,
}

impl UaaGroup {
    /// Creates a group with only a display name.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self { display_name: display_name.into(), ..Default::default() }
    }
}

/// How an external group mapping names its UAA group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingIdentifier {
    /// By group id.
    GroupId,
    /// By group display name.
    DisplayName,
}

impl MappingIdentifier {
    /// Returns the JSON attribute and path segment for this identifier.
    pub fn json_key(&self) -> &'static str {
        match self {
            MappingIdentifier::GroupId => "groupId",
            MappingIdentifier::DisplayName => "displayName",
        }
    }
}

impl fmt::Display for MappingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

/// A mapping from an external (e.g. LDAP) group to a UAA group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMapping {
    /// Id of the UAA group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Display name of the UAA group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// External group, e.g. an LDAP DN.
    #[serde(default)]
    pub external_group: String,
    /// Identity provider of the external group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Resource metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
    /// Schemas of the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
}

impl GroupMapping {
    /// Returns how this mapping identifies its group, preferring the id.
    pub fn identifier(&self) -> Option<(MappingIdentifier, &str)> {
        non_blank(&self.group_id)
            .map(|id| (MappingIdentifier::GroupId, id))
            .or_else(|| non_blank(&self.display_name).map(|name| (MappingIdentifier::DisplayName, name)))
    }
}

/// Client for SCIM groups (`/Groups`) and external group mappings
/// (`/Groups/External`).
///
/// Access via [`UaaClient::groups()`].
///
/// ## Example
///
/// ```rust,ignore
/// use uaa::api::{MappingIdentifier, UaaGroup};
///
/// let group = client.groups().create(&UaaGroup::new("reports.read")).await?;
/// let id = group.id.as_deref().unwrap_or_default();
///
/// client.groups().update_name(id, "reports.view").await?;
/// client
///     .groups()
///     .create_mapping(MappingIdentifier::GroupId, id, "cn=analysts,ou=groups,dc=example,dc=com")
///     .await?;
/// ```
#[derive(Clone)]
pub struct GroupsClient {
    client: UaaClient,
}

impl GroupsClient {
    pub(crate) fn new(client: UaaClient) -> Self {
        Self { client }
    }

    /// Creates a group.
    ///
    /// The core SCIM schema is set on the request regardless of
    /// `group.schemas`.
    pub async fn create(&self, group: &UaaGroup) -> Result<UaaGroup> {
        if group.display_name.trim().is_empty() {
            return Err(Error::invalid_argument("display_name must not be empty"));
        }

        let mut request = group.clone();
        request.schemas = vec![SCIM_CORE_SCHEMA.to_string()];
        self.client.inner().post("/Groups", &request).await
    }

    /// Deletes a group.
    pub async fn delete(&self, group_id: &str) -> Result<()> {
        let id = require(group_id, "group id")?;
        self.client.inner().delete(&format!("/Groups/{}", segment(id))).await
    }

    /// Gets a group by id.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) if no group has
    ///   that id
    /// - [`ErrorKind::Lookup`](crate::ErrorKind::Lookup) if the search
    ///   failed
    pub async fn get(&self, group_id: &str) -> Result<UaaGroup> {
        let id = require(group_id, "group id")?;
        let request = FilterRequestBuilder::new().equals("id", id)?.build()?;

        let page: PagedResult<UaaGroup> = self
            .client
            .inner()
            .search("/Groups", &request)
            .await
            .map_err(|err| Error::lookup(format!("group lookup for {} failed", id), err))?;

        page.into_first().ok_or_else(|| Error::not_found(format!("no group with id {}", id)))
    }

    /// Renames a group.
    ///
    /// Reads the group first and sends its version as `If-Match`, so a
    /// concurrent change fails with
    /// [`ErrorKind::Conflict`](crate::ErrorKind::Conflict).
    pub async fn update_name(&self, group_id: &str, new_name: &str) -> Result<UaaGroup> {
        let new_name = require(new_name, "group name")?;
        let mut group = self.get(group_id).await?;
        group.display_name = new_name.to_string();

        let id = group.id.clone().unwrap_or_else(|| group_id.to_string());
        let version = if_match(group.meta.as_ref());
        self.client.inner().put(&format!("/Groups/{}", segment(&id)), &group, Some(&version)).await
    }

    /// Lists groups matching a filter.
    pub async fn list(&self, request: &FilterRequest) -> Result<PagedResult<UaaGroup>> {
        self.client.inner().search("/Groups", request).await
    }

    /// Maps an external group to a UAA group.
    pub async fn create_mapping(
        &self,
        identifier: MappingIdentifier,
        group: &str,
        external_group: &str,
    ) -> Result<GroupMapping> {
        let group = require(group, identifier.json_key())?;
        let external_group = require(external_group, "external group")?;

        let mut body = Map::new();
        body.insert("schemas".into(), Value::from(vec![SCIM_CORE_SCHEMA]));
        body.insert(identifier.json_key().into(), Value::from(group));
        body.insert("externalGroup".into(), Value::from(external_group));

        self.client.inner().post("/Groups/External", &body).await
    }

    /// Removes an external group mapping.
    ///
    /// The group is addressed by id when the mapping has one, otherwise by
    /// display name.
    pub async fn delete_mapping(&self, mapping: &GroupMapping) -> Result<()> {
        let (identifier, group) = mapping
            .identifier()
            .ok_or_else(|| Error::invalid_argument("mapping has neither group id nor display name"))?;
        let external_group = require(&mapping.external_group, "external group")?;

        let mut path = format!(
            "/Groups/External/{}/{}/externalGroup/{}",
            identifier,
            segment(group),
            segment(external_group)
        );
        if let Some(origin) = mapping.origin.as_deref().filter(|o| !o.is_empty()) {
            path.push_str("/origin/");
            path.push_str(&segment(origin));
        }

        self.client.inner().delete(&path).await
    }

    /// Lists external group mappings matching a filter.
    pub async fn list_mappings(&self, request: &FilterRequest) -> Result<PagedResult<GroupMapping>> {
        self.client.inner().search("/Groups/External", request).await
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn require<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{} must not be empty", what)));
    }
    Ok(value)
}

impl fmt::Debug for GroupsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupsClient").finish_non_exhaustive()
    }
}
