//! Error kind enumeration for categorizing client errors.

/// Categorization of client errors.
///
/// This enum provides a stable interface for matching on error types.
///
/// ## Families
///
/// | ErrorKind              | Origin          | Action                        |
/// |------------------------|-----------------|-------------------------------|
/// | `InvalidCredentials`   | token manager   | Fix credentials               |
/// | `TokenAcquisition`     | token endpoint  | Retry the whole operation     |
/// | `BuilderReuse`         | filter builder  | Programmer error              |
/// | `InsufficientOperands` | filter builder  | Programmer error              |
/// | `EmptyStack`           | filter builder  | Programmer error              |
/// | `InvalidArgument`      | either          | Fix input                     |
/// | `Lookup`               | resource lookup | Inspect `source()`            |
/// | `Unauthorized`         | HTTP 401        | Invalidate token, retry once  |
/// | `Connection`/`Timeout` | network         | Retry with backoff            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The credential descriptor has no client id.
    ///
    /// **Not retriable.** Fix the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The token endpoint was unreachable or rejected the grant.
    ///
    /// The attempted grant type is available via
    /// [`Error::grant_type()`](crate::Error::grant_type).
    #[error("token acquisition failed")]
    TokenAcquisition,

    /// A filter builder was used after `build()`.
    #[error("filter builder already built")]
    BuilderReuse,

    /// `and()`/`or()` was called with fewer than two pending operations.
    #[error("insufficient operands")]
    InsufficientOperands,

    /// `precedence()` was called with no pending operation.
    #[error("empty operation stack")]
    EmptyStack,

    /// Invalid argument, either rejected locally or by the server (HTTP 400).
    #[error("invalid argument")]
    InvalidArgument,

    /// An internal lookup (for example a user id by user name) failed.
    ///
    /// The underlying error is available via `source()`.
    #[error("lookup failed")]
    Lookup,

    /// Authentication failed (HTTP 401).
    ///
    /// Usually means the token was revoked server-side.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid token but insufficient scope (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Requested resource was not found (HTTP 404 or an empty lookup).
    #[error("not found")]
    NotFound,

    /// Conflict with existing resource state (HTTP 409, 412).
    ///
    /// A 412 means the `If-Match` version is stale: re-fetch and retry.
    #[error("conflict")]
    Conflict,

    /// Rate limit exceeded (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable (HTTP 503).
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out.
    #[error("timeout")]
    Timeout,

    /// Internal server error (HTTP 5xx).
    #[error("internal error")]
    Internal,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// Configuration error (invalid URL, missing credentials).
    #[error("configuration error")]
    Configuration,

    /// Generic transport error that fits no more specific category.
    #[error("transport error")]
    Transport,

    /// Response could not be parsed or was malformed.
    #[error("invalid response")]
    InvalidResponse,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// ```rust
    /// use uaa::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::BuilderReuse.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
                | ErrorKind::TokenAcquisition
        )
    }

    /// Returns `true` for misuse of the filter builder.
    #[inline]
    pub fn is_builder_misuse(&self) -> bool {
        matches!(
            self,
            ErrorKind::BuilderReuse | ErrorKind::InsufficientOperands | ErrorKind::EmptyStack
        )
    }

    /// Returns `true` if the error came from the HTTP layer rather than from
    /// credential handling or filter construction.
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::RateLimited
                | ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::Internal
                | ErrorKind::Connection
                | ErrorKind::Transport
                | ErrorKind::InvalidResponse
        )
    }

    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 | 412 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if status >= 500 => ErrorKind::Internal,
            _ => ErrorKind::Transport,
        }
    }
}
