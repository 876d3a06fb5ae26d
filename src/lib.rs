//! # UAA Rust Client
//!
//! Rust client for the Cloud Foundry UAA identity service.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uaa::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), uaa::Error> {
//!     // Create client
//!     let client = UaaClient::builder()
//!         .url("https://uaa.example.com")
//!         .credentials(UaaCredentials::new("admin").with_client_secret("adminsecret"))
//!         .build()?;
//!
//!     // Find users whose name starts with "adm"
//!     let request = FilterRequestBuilder::new()
//!         .starts_with("userName", "adm")?
//!         .count(20)?
//!         .build()?;
//!
//!     for user in client.users().list(&request).await?.resources {
//!         println!("{}", user.user_name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Grant selection**: the grant type follows from the credentials. A user
//!   and password select `password`, a client secret selects
//!   `client_credentials`, a bare client id selects `implicit`.
//! - **One token per connection**: a [`UaaClient`] and its clones share one
//!   cached token. Concurrent callers that find it expired trigger exactly one
//!   renewal.
//! - **Filters**: [`FilterRequestBuilder`](filter::FilterRequestBuilder) is a
//!   single-use, stack-based builder producing SCIM filter text and
//!   pagination parameters.
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;

// Resource APIs
pub mod api;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

mod user_agent;

// Re-export main types at crate root for convenience
pub use client::{ClientBuilder, UaaClient};
pub use error::{Error, ErrorKind, Result};

// Re-export auth types
pub use auth::{AccessToken, GrantType, TokenManager, UaaCredentials};

// Re-export config types
pub use config::{TlsConfig, TokenConfig};

// Re-export filter types
pub use filter::{FilterRequest, FilterRequestBuilder, Operation};
