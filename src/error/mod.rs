//! Error types for the UAA client.
//!
//! All fallible operations return [`Error`], categorized by [`ErrorKind`].
//! The kinds split into three families:
//!
//! - **Credential/token errors**: [`ErrorKind::InvalidCredentials`],
//!   [`ErrorKind::TokenAcquisition`]
//! - **Filter builder misuse**: [`ErrorKind::BuilderReuse`],
//!   [`ErrorKind::InsufficientOperands`], [`ErrorKind::EmptyStack`],
//!   [`ErrorKind::InvalidArgument`]
//! - **Transport errors** from the request executor (HTTP status, network)
//!
//! Transport errors are kept distinct so callers can decide whether to
//! drop the cached token and retry once:
//!
//! ```rust,ignore
//! match uaa.users().get_by_name("bob").await {
//!     Err(e) if e.should_refresh_token() => {
//!         uaa.invalidate_token();
//!         uaa.users().get_by_name("bob").await?
//!     }
//!     other => other?,
//! };
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for UAA client operations.
pub type Result<T> = std::result::Result<T, Error>;
