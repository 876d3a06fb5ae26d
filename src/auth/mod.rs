//! OAuth2 authentication against UAA.
//!
//! - [`UaaCredentials`]: client id/secret and optional resource owner login
//! - [`GrantType`]: grant selected from the credentials
//! - [`AccessToken`]: an issued token
//! - [`TokenEndpoint`]: where tokens come from; [`HttpTokenEndpoint`] is the
//!   UAA implementation
//! - [`TokenManager`]: caches the token and renews it once per expiry
//!
//! Most applications never touch these directly: [`UaaClient`](crate::UaaClient)
//! owns a [`TokenManager`] and attaches the token to every request.
//!
//! ```rust
//! use uaa::{GrantType, UaaCredentials};
//!
//! let implicit = UaaCredentials::new("cf");
//! let client = UaaCredentials::new("admin").with_client_secret("adminsecret");
//! let password = UaaCredentials::new("app")
//!     .with_client_secret("appclientsecret")
//!     .with_user("marissa", "koala");
//!
//! assert_eq!(GrantType::select(&implicit).unwrap(), GrantType::Implicit);
//! assert_eq!(GrantType::select(&client).unwrap(), GrantType::ClientCredentials);
//! assert_eq!(GrantType::select(&password).unwrap(), GrantType::Password);
//! ```

mod credentials;
mod endpoint;
mod grant;
mod manager;
mod token;

pub use credentials::UaaCredentials;
pub use endpoint::{HttpTokenEndpoint, TokenEndpoint, TokenFuture};
pub use grant::GrantType;
pub use manager::{TokenManager, TokenState};
pub use token::AccessToken;
