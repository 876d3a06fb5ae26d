//! Prelude module for convenient imports.
//!
//! ```rust
//! use uaa::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and its builder
//! - Error types
//! - Credentials and grant types
//! - Filter construction
//! - Resource models

pub use crate::{
    api::{
        GroupMapping, MappingIdentifier, PagedResult, ScimValue, UaaClientDetails, UaaGroup,
        UaaGroupMember, UaaTokenGrantType, UaaUser, UserName,
    },
    auth::{AccessToken, GrantType, UaaCredentials},
    client::{ClientBuilder, UaaClient},
    config::{TlsConfig, TokenConfig},
    error::{Error, ErrorKind, Result},
    filter::{Combinator, FilterRequest, FilterRequestBuilder, Operation},
};
