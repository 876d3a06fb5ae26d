//! Main error type for the UAA client.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;
use crate::auth::GrantType;

/// The primary error type for UAA client operations.
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── grant_type: Option       (grant attempted, for token errors)
/// ├── status: Option           (HTTP status, for transport errors)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use uaa::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::TokenAcquisition => {
///             println!("token endpoint rejected {:?}", err.grant_type());
///         }
///         ErrorKind::Unauthorized => {
///             println!("token revoked, refresh and retry once");
///         }
///         kind if kind.is_builder_misuse() => {
///             println!("bug in filter construction: {}", err);
///         }
///         _ => {
///             println!("error: {}", err);
///         }
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,

    message: Cow<'static, str>,

    /// Grant type in use when a token request failed.
    grant_type: Option<GrantType>,

    /// HTTP status code, when the error came from a response.
    status: Option<u16>,

    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// ```rust
    /// use uaa::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidArgument, "count must be positive");
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            grant_type: None,
            status: None,
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the grant type that was being attempted, for token errors.
    #[inline]
    pub fn grant_type(&self) -> Option<GrantType> {
        self.grant_type
    }

    /// Returns the HTTP status code, if the error came from a response.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns `true` if this error is generally safe to retry.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Returns `true` when the server rejected a token that the client
    /// considered valid.
    ///
    /// Callers may invalidate the cached token and retry the operation once.
    /// A [`Lookup`](ErrorKind::Lookup) error answers for the failure it wraps.
    pub fn should_refresh_token(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
            || self.wrapped().is_some_and(Error::should_refresh_token)
    }

    fn wrapped(&self) -> Option<&Error> {
        self.source.as_deref()?.downcast_ref::<Error>()
    }

    /// Sets the grant type attempted.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = Some(grant_type);
        self
    }

    /// Sets the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates an invalid credentials error.
    pub fn invalid_credentials(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Creates a token acquisition error for the given grant.
    pub fn token_acquisition(
        grant_type: GrantType,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::TokenAcquisition, message).with_grant_type(grant_type)
    }

    /// Creates a builder reuse error.
    pub fn builder_reuse() -> Self {
        Self::new(ErrorKind::BuilderReuse, "builder cannot be used after build()")
    }

    /// Creates an insufficient operands error.
    pub fn insufficient_operands(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InsufficientOperands, message)
    }

    /// Creates an empty stack error.
    pub fn empty_stack(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::EmptyStack, message)
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Creates a lookup error wrapping the failure that caused it.
    ///
    /// Token acquisition and credential errors are returned unchanged.
    pub fn lookup(message: impl Into<Cow<'static, str>>, cause: Error) -> Self {
        match cause.kind {
            ErrorKind::TokenAcquisition | ErrorKind::InvalidCredentials => cause,
            _ => Self::new(ErrorKind::Lookup, message).with_source(cause),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates an error from a non-success HTTP status and response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = ErrorKind::from_http_status(status);
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };
        Self::new(kind, message).with_status(status)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(grant_type) = self.grant_type {
            write!(f, " (grant_type: {})", grant_type)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection
        } else if err.is_decode() {
            ErrorKind::InvalidResponse
        } else {
            ErrorKind::Transport
        };
        let status = err.status().map(|s| s.as_u16());
        let mut error = Error::new(kind, format!("request failed: {}", err));
        error.status = status;
        error.with_source(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}
