//! TLS configuration for secure connections.

use std::path::PathBuf;

use crate::Error;

/// Configuration for TLS/SSL connections.
///
/// By default, the client uses system root certificates and validates
/// server certificates. UAA deployments commonly sit behind a private CA;
/// add it here.
///
/// ## Example: Custom CA
///
/// ```rust
/// use uaa::TlsConfig;
///
/// let config = TlsConfig::builder()
///     .ca_cert_file("/path/to/ca.crt")
///     .build();
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// Custom CA certificate file path.
    #[builder(into)]
    pub ca_cert_file: Option<PathBuf>,

    /// Custom CA certificate PEM data.
    #[builder(into)]
    pub ca_cert_pem: Option<String>,

    /// Whether to skip certificate verification.
    ///
    /// **WARNING**: This is insecure and should only be used for local development.
    #[builder(default = false)]
    pub skip_verification: bool,
}

impl TlsConfig {
    /// Creates an insecure TLS config that skips verification.
    ///
    /// **WARNING**: This makes connections vulnerable to man-in-the-middle attacks.
    /// Only use this for local development with self-signed certificates.
    pub fn insecure() -> Self {
        Self::builder().skip_verification(true).build()
    }

    /// Returns `true` if custom CA is configured.
    pub fn has_custom_ca(&self) -> bool {
        self.ca_cert_file.is_some() || self.ca_cert_pem.is_some()
    }

    /// Applies this configuration to an HTTP client builder.
    #[cfg(any(feature = "rustls", feature = "native-tls"))]
    pub(crate) fn apply(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, Error> {
        if let Some(path) = &self.ca_cert_file {
            let pem = std::fs::read(path).map_err(|e| {
                Error::configuration(format!("cannot read CA file {}: {}", path.display(), e))
                    .with_source(e)
            })?;
            builder = builder.add_root_certificate(parse_certificate(&pem)?);
        }

        if let Some(pem) = &self.ca_cert_pem {
            builder = builder.add_root_certificate(parse_certificate(pem.as_bytes())?);
        }

        if self.skip_verification {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder)
    }

    /// Applies this configuration to an HTTP client builder.
    #[cfg(not(any(feature = "rustls", feature = "native-tls")))]
    pub(crate) fn apply(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, Error> {
        if self.has_custom_ca() {
            return Err(Error::configuration(
                "custom CA certificates require the 'rustls' or 'native-tls' feature",
            ));
        }
        Ok(builder)
    }
}

#[cfg(any(feature = "rustls", feature = "native-tls"))]
fn parse_certificate(pem: &[u8]) -> Result<reqwest::Certificate, Error> {
    reqwest::Certificate::from_pem(pem)
        .map_err(|e| Error::configuration(format!("invalid CA certificate: {}", e)).with_source(e))
}
