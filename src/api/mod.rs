//! UAA resource APIs.
//!
//! Sub-clients are reached from a [`UaaClient`](crate::UaaClient):
//!
//! - [`OAuthClientsClient`]: OAuth client registrations (`/oauth/clients`)
//! - [`UsersClient`]: SCIM users (`/Users`)
//! - [`GroupsClient`]: SCIM groups and external group mappings (`/Groups`)
//!
//! Every list operation takes a [`FilterRequest`](crate::filter::FilterRequest)
//! and returns a [`PagedResult`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use uaa::filter::FilterRequestBuilder;
//!
//! let request = FilterRequestBuilder::new()
//!     .starts_with("userName", "adm")?
//!     .count(50)?
//!     .build()?;
//!
//! let users = client.users().list(&request).await?;
//! for user in &users.resources {
//!     println!("{}", user.user_name);
//! }
//! ```

mod clients;
mod groups;
mod users;

pub use clients::{OAuthClientsClient, UaaClientDetails, UaaTokenGrantType};
pub use groups::{GroupMapping, GroupsClient, MappingIdentifier, UaaGroup, UaaGroupMember};
pub use users::{UaaUser, UserName, UsersClient};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core SCIM schema URN sent with group resources.
pub const SCIM_CORE_SCHEMA: &str = "urn:scim:schemas:core:1.0";

/// One page of a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// The resources in this page.
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
    /// 1-based index of the first resource in this page.
    #[serde(default)]
    pub start_index: u32,
    /// Page size used by the server.
    #[serde(default)]
    pub items_per_page: u32,
    /// Number of resources matching the filter across all pages.
    #[serde(default)]
    pub total_results: u64,
    /// Schemas of the result envelope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
}

impl<T> PagedResult<T> {
    /// Returns `true` if this page holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the number of resources in this page.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if resources beyond this page match the filter.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.start_index.max(1)) - 1 + self.resources.len() as u64;
        seen < self.total_results
    }

    /// Returns the first resource, if any.
    pub fn first(&self) -> Option<&T> {
        self.resources.first()
    }

    /// Consumes the page and returns its first resource.
    pub fn into_first(self) -> Option<T> {
        self.resources.into_iter().next()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            start_index: 1,
            items_per_page: 0,
            total_results: 0,
            schemas: Vec::new(),
        }
    }
}

/// SCIM resource metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    /// Resource version, sent back as `If-Match` on updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Value of an `If-Match` header for a resource with the given metadata.
///
/// Resources without a known version match any version.
pub(crate) fn if_match(meta: Option<&ScimMeta>) -> String {
    meta.and_then(|m| m.version).map_or_else(|| "*".to_string(), |v| v.to_string())
}

/// A multi-valued SCIM attribute entry, such as an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimValue {
    /// The value.
    pub value: String,
    /// Whether this is the primary entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

impl ScimValue {
    /// Creates a non-primary entry.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), primary: None }
    }

    /// Creates a primary entry.
    pub fn primary(value: impl Into<String>) -> Self {
        Self { value: value.into(), primary: Some(true) }
    }
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
